use super::open_app;
use crate::{
    libs::{
        formatter,
        messages::Message,
        task::{Task, TaskPriority, TaskStatus},
        view::View,
    },
    msg_bail_anyhow, msg_error, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: Option<TaskCommand>,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    List {
        #[arg(short, long)]
        assignee: Option<String>,
        /// Pending, "In Progress" or Completed
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },
    Add {
        title: String,
        #[arg(short, long)]
        assignee: String,
        /// YYYY-MM-DD or YYYY-MM-DDTHH:MM
        #[arg(long)]
        due: String,
        #[arg(short, long, default_value = "Medium")]
        priority: TaskPriority,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(long, default_value = "admin")]
        created_by: String,
    },
    Status {
        id: u32,
        status: TaskStatus,
    },
    Delete {
        id: u32,
    },
}

pub fn cmd(args: TaskArgs) -> Result<()> {
    match args.command {
        Some(TaskCommand::List { assignee, status }) => handle_list(assignee, status),
        Some(TaskCommand::Add {
            title,
            assignee,
            due,
            priority,
            description,
            created_by,
        }) => {
            let due_date = parse_due(&due)?;
            handle_add(Task::new(&title, &description, &assignee, priority, due_date, &created_by))
        }
        Some(TaskCommand::Status { id, status }) => handle_status(id, status),
        Some(TaskCommand::Delete { id }) => handle_delete(id),
        None => handle_list(None, None),
    }
}

fn handle_list(assignee: Option<String>, status: Option<TaskStatus>) -> Result<()> {
    let app = open_app()?;
    let tasks: Vec<Task> = app
        .tasks
        .all()
        .into_iter()
        .filter(|task| assignee.as_deref().map_or(true, |a| task.assigned_to == a))
        .filter(|task| status.map_or(true, |s| task.status == s))
        .collect();

    if tasks.is_empty() {
        msg_info!(Message::NoTasksFound);
        return Ok(());
    }

    msg_print!(Message::TasksHeader, true);
    View::tasks(&tasks)
}

fn handle_add(task: Task) -> Result<()> {
    let mut app = open_app()?;
    if !app.users.exists(&task.assigned_to) {
        msg_warning!(Message::TaskUnknownAssignee(task.assigned_to.clone()));
    }

    let id = app.tasks.create(task)?;
    msg_success!(Message::TaskCreated(id));
    Ok(())
}

fn handle_status(id: u32, status: TaskStatus) -> Result<()> {
    let mut app = open_app()?;
    match app.tasks.set_status(id, status) {
        Ok(()) => msg_success!(Message::TaskStatusUpdated(id, status.to_string())),
        Err(e) if e.is_not_found() => msg_error!(Message::TaskNotFound(id)),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn handle_delete(id: u32) -> Result<()> {
    let mut app = open_app()?;
    match app.tasks.delete(id) {
        Ok(_) => msg_success!(Message::TaskDeleted(id)),
        Err(e) if e.is_not_found() => msg_error!(Message::TaskNotFound(id)),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// A bare date means the end of that day.
fn parse_due(value: &str) -> Result<NaiveDateTime> {
    if let Some(due) = formatter::parse_timestamp(value) {
        return Ok(due);
    }
    match formatter::parse_date(value).and_then(|date| date.and_hms_opt(23, 59, 59)) {
        Some(due) => Ok(due),
        None => msg_bail_anyhow!(Message::InvalidDueDate(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn bare_due_date_is_end_of_day() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(parse_due("2025-06-01").unwrap(), expected);
        assert_eq!(parse_due("2025-06-01T09:30").unwrap(), expected.date().and_hms_opt(9, 30, 0).unwrap());
        assert!(parse_due("tomorrow").is_err());
    }
}

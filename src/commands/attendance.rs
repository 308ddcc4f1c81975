use super::open_app;
use crate::{
    libs::{attendance::Attendance, formatter, messages::Message, view::View},
    msg_bail_anyhow, msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct AttendanceArgs {
    #[command(subcommand)]
    command: Option<AttendanceCommand>,
}

#[derive(Debug, Subcommand)]
enum AttendanceCommand {
    /// Record attendance, replacing any earlier record for the same day
    Mark {
        employee: String,
        /// YYYY-MM-DD, today when omitted
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        absent: bool,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    Unmark {
        employee: String,
        #[arg(short, long)]
        date: Option<String>,
    },
    List {
        #[arg(short, long)]
        employee: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
    },
}

pub fn cmd(args: AttendanceArgs) -> Result<()> {
    match args.command {
        Some(AttendanceCommand::Mark {
            employee,
            date,
            absent,
            notes,
        }) => {
            let date = resolve_date(date.as_deref())?;
            handle_mark(Attendance::new(&employee, date, !absent, &notes))
        }
        Some(AttendanceCommand::Unmark { employee, date }) => handle_unmark(employee, resolve_date(date.as_deref())?),
        Some(AttendanceCommand::List { employee, date }) => {
            let date = match date {
                Some(date) => Some(resolve_date(Some(&date))?),
                None => None,
            };
            handle_list(employee, date)
        }
        None => handle_list(None, None),
    }
}

fn handle_mark(record: Attendance) -> Result<()> {
    let mut app = open_app()?;
    let employee = record.employee.clone();
    let date = formatter::format_date(&record.date);

    app.attendance.mark(record)?;
    msg_success!(Message::AttendanceMarked(employee, date));
    Ok(())
}

fn handle_unmark(employee: String, date: NaiveDate) -> Result<()> {
    let mut app = open_app()?;
    match app.attendance.unmark(&employee, date) {
        Ok(_) => msg_success!(Message::AttendanceUnmarked(employee, formatter::format_date(&date))),
        Err(e) if e.is_not_found() => msg_error!(Message::AttendanceNotFound(employee, formatter::format_date(&date))),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn handle_list(employee: Option<String>, date: Option<NaiveDate>) -> Result<()> {
    let app = open_app()?;
    let mut records: Vec<Attendance> = app
        .attendance
        .all()
        .into_iter()
        .filter(|record| employee.as_deref().map_or(true, |e| record.employee == e))
        .filter(|record| date.map_or(true, |d| record.date == d))
        .collect();
    records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.employee.cmp(&b.employee)));

    if records.is_empty() {
        msg_info!(Message::NoAttendanceFound);
        return Ok(());
    }

    msg_print!(Message::AttendanceHeader, true);
    View::attendance(&records)
}

fn resolve_date(value: Option<&str>) -> Result<NaiveDate> {
    let Some(value) = value else {
        return Ok(formatter::now().date());
    };
    match formatter::parse_date(value) {
        Some(date) => Ok(date),
        None => msg_bail_anyhow!(Message::InvalidDate(value.to_string())),
    }
}

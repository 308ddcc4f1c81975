use crate::libs::formatter;
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.chars().filter(|c| !c.is_whitespace() && *c != '-' && *c != '_').collect();
        match normalized.to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "inprogress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(format!("unknown task status, expected one of: {}", join(&TaskStatus::ALL))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::High, TaskPriority::Medium, TaskPriority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "High",
            TaskPriority::Medium => "Medium",
            TaskPriority::Low => "Low",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(TaskPriority::High),
            "medium" => Ok(TaskPriority::Medium),
            "low" => Ok(TaskPriority::Low),
            _ => Err(format!("unknown task priority, expected one of: {}", join(&TaskPriority::ALL))),
        }
    }
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// A unit of work assigned to an employee.
///
/// `id` is 0 until the task store assigns one. The creation timestamp is
/// fixed when the task is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub assigned_to: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: NaiveDateTime,
    pub created_by: String,
    created_at: NaiveDateTime,
}

impl Task {
    pub fn new(title: &str, description: &str, assigned_to: &str, priority: TaskPriority, due_date: NaiveDateTime, created_by: &str) -> Self {
        Self::with_created_at(title, description, assigned_to, priority, due_date, created_by, formatter::now())
    }

    pub fn with_created_at(
        title: &str,
        description: &str,
        assigned_to: &str,
        priority: TaskPriority,
        due_date: NaiveDateTime,
        created_by: &str,
        created_at: NaiveDateTime,
    ) -> Self {
        Task {
            id: 0,
            title: title.to_string(),
            description: description.to_string(),
            assigned_to: assigned_to.to_string(),
            status: TaskStatus::Pending,
            priority,
            due_date,
            created_by: created_by.to_string(),
            created_at,
        }
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub(crate) fn set_created_at(&mut self, created_at: NaiveDateTime) {
        self.created_at = created_at;
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.is_completed() && self.due_date < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn status_text_matches_the_file_format() {
        assert_eq!(TaskStatus::InProgress.to_string(), "In Progress");
        assert_eq!("In Progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("Blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<TaskPriority>(), Ok(TaskPriority::High));
        assert!("urgent".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn new_tasks_are_pending() {
        let due = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(17, 0, 0).unwrap();
        let task = Task::new("Count stock", "", "jdoe", TaskPriority::Low, due, "admin");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.id, 0);
        assert!(task.is_overdue(due + chrono::Duration::minutes(1)));
        assert!(!task.is_overdue(due));
    }
}

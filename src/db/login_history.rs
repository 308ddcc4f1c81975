//! Append-only log of login attempts.
//!
//! Nothing in the application reads this file back; it exists for auditing.
//! A failure to append is logged and never blocks a login.

use super::codec::DELIMITER;
use crate::libs::formatter;
use chrono::NaiveDateTime;
use csv::{Terminator, WriterBuilder};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const LOGIN_HISTORY_FILE_NAME: &str = "login_history.csv";
const HEADER: [&str; 3] = ["Username", "LoginTime", "Status"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStatus {
    Success,
    FailedLocked,
    FailedInvalidPassword,
    FailedUnknownUser,
}

impl LoginStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginStatus::Success => "SUCCESS",
            LoginStatus::FailedLocked => "FAILED_LOCKED",
            LoginStatus::FailedInvalidPassword => "FAILED_INVALID_PASSWORD",
            LoginStatus::FailedUnknownUser => "FAILED_UNKNOWN_USER",
        }
    }
}

impl fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct LoginHistory {
    path: PathBuf,
}

impl LoginHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LoginHistory { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one attempt, writing the header first if the file is new.
    pub fn record(&self, username: &str, at: NaiveDateTime, status: LoginStatus) {
        if let Err(e) = self.append(username, at, status) {
            warn!(path = %self.path.display(), error = %e, "failed to append login history");
        }
    }

    fn append(&self, username: &str, at: NaiveDateTime, status: LoginStatus) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let is_new = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new()
            .delimiter(DELIMITER)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(file);
        if is_new {
            writer.write_record(HEADER)?;
        }
        writer.write_record([username, &formatter::format_timestamp(&at), status.as_str()])?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn appends_after_a_single_header() {
        let dir = tempfile::tempdir().unwrap();
        let history = LoginHistory::new(dir.path().join(LOGIN_HISTORY_FILE_NAME));
        let at = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap().and_hms_opt(8, 0, 0).unwrap();

        history.record("admin", at, LoginStatus::Success);
        history.record("jdoe", at, LoginStatus::FailedLocked);

        let contents = fs::read_to_string(history.path()).unwrap();
        assert_eq!(
            contents,
            "Username,LoginTime,Status\nadmin,2025-01-02T08:00:00,SUCCESS\njdoe,2025-01-02T08:00:00,FAILED_LOCKED\n"
        );
    }
}

//! Error types shared by the record codecs, the stores and authentication.
//!
//! None of these errors is fatal. Codec failures are logged and skipped while
//! loading, store failures are returned from the mutating operation that
//! caused them, and authentication failures describe why a login was refused.

use chrono::NaiveDateTime;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A record that could not be converted to or from its text form.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot encode {field}: {reason}")]
    Unencodable { field: &'static str, reason: String },

    #[error("malformed line: {0}")]
    Csv(#[from] csv::Error),
}

impl CodecError {
    pub fn invalid(field: &'static str, value: &str, reason: impl ToString) -> Self {
        CodecError::InvalidField {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failures reported by the mutating operations of a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a record with key {0} already exists")]
    DuplicateKey(String),

    #[error("no record with key {0}")]
    NotFound(String),

    /// The backing file exists but could not be read when the store was
    /// loaded, so writing would replace data that was never seen.
    #[error("{} could not be read, refusing to overwrite it", .0.display())]
    Unreadable(PathBuf),

    #[error("no ids left to assign")]
    IdsExhausted,

    #[error("failed to save {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: PersistenceFailure,
    },
}

/// Underlying cause of a failed save.
#[derive(Debug, Error)]
pub enum PersistenceFailure {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::DuplicateKey(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Reasons a login or account operation was refused.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. The two are not distinguished.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("account is locked")]
    Locked { until: Option<NaiveDateTime> },

    #[error(transparent)]
    Store(#[from] StoreError),
}

//! Engine error types

use thiserror::Error;

/// Failure reported by `finish_editing`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The engine refused the edits (e.g. outstanding validation errors)
    #[error("{0}")]
    Rejected(String),
    /// The backing store failed to persist the edits
    #[error("{0}")]
    Store(String),
}

/// Errors raised while loading a dataset definition
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid dataset json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("record {record} references unknown record {target}")]
    UnknownAssociation { record: String, target: String },
    #[error("field {field} of record {record} has an invalid value: {reason}")]
    InvalidValue {
        record: String,
        field: String,
        reason: String,
    },
    #[error("duplicate record id {0}")]
    DuplicateRecord(String),
    #[error("dataset contains no records")]
    Empty,
}

//! Error types for the logbook engine.
//!
//! Reconciliation itself is total and never fails; these errors only come
//! from validating input and reading logbook files.

use crate::RecordId;
use thiserror::Error;

/// All possible errors from the logbook engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("duplicate record id: {0}")]
    DuplicateId(RecordId),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

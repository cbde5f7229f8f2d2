//! Error types for storage, transport and the sync protocol.

use std::fmt;

/// Failure of the local storage collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Engine error: {0}")]
    Engine(#[from] logbook_engine::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Failure reported by the remote transport.
///
/// Every variant except [`TransportError::Unexpected`] is a recoverable,
/// specific failure; `Unexpected` covers anything the transport could not
/// classify.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Credentials rejected by server")]
    BadCredentials,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Unexpected transport failure: {0}")]
    Unexpected(String),
}

impl TransportError {
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, TransportError::Unexpected(_))
    }
}

/// Why a synchronization attempt stopped.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("No sync credentials configured")]
    MissingCredentials,

    #[error("Authentication failed: {0}")]
    Authentication(TransportError),

    #[error("Remote error: {0}")]
    Remote(#[from] TransportError),

    #[error("Local storage error: {0}")]
    Local(#[from] StoreError),
}

impl SyncError {
    /// The caller-visible outcome class of this error.
    pub fn outcome(&self) -> SyncOutcome {
        match self {
            SyncError::MissingCredentials | SyncError::Authentication(_) => {
                SyncOutcome::AuthenticationFailed
            }
            SyncError::Remote(_) => SyncOutcome::RemoteError,
            SyncError::Local(_) => SyncOutcome::LocalError,
        }
    }
}

/// Outcome of a sync attempt as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Ok,
    /// Credentials missing or rejected; retrying needs user action
    AuthenticationFailed,
    /// Transport or server failure; the whole protocol may be retried later
    RemoteError,
    /// Local storage failure
    LocalError,
}

impl<T> From<&std::result::Result<T, SyncError>> for SyncOutcome {
    fn from(result: &std::result::Result<T, SyncError>) -> Self {
        match result {
            Ok(_) => SyncOutcome::Ok,
            Err(err) => err.outcome(),
        }
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SyncOutcome::Ok => "ok",
            SyncOutcome::AuthenticationFailed => "authentication failed",
            SyncOutcome::RemoteError => "remote error",
            SyncOutcome::LocalError => "local error",
        };
        f.write_str(text)
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Result type alias for the sync protocol.
pub type Result<T> = std::result::Result<T, SyncError>;

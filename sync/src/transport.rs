//! Remote server collaborator.
//!
//! The orchestrator never talks to the network directly. A [`Transport`]
//! opens an authenticated [`RemoteSession`], and every remote call of one
//! protocol run goes through that session.

use crate::error::TransportResult;
use async_trait::async_trait;
use logbook_engine::{Checksum, FlightRecord, ManifestEntry, RecordId};
use std::fmt;

/// Username and password for the sync server.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Opens authenticated sessions against the sync server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Authenticate and open a session.
    ///
    /// Rejected credentials are reported as
    /// [`crate::error::TransportError::BadCredentials`].
    async fn login(&self, credentials: &Credentials) -> TransportResult<Box<dyn RemoteSession>>;
}

/// One authenticated session with the sync server.
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Identifier and timestamp of every record the server holds.
    async fn fetch_manifest(&self) -> TransportResult<Vec<ManifestEntry>>;

    /// Content checksum of the server's logbook.
    async fn fetch_checksum(&self) -> TransportResult<Checksum>;

    async fn fetch_records_by_id(&self, ids: &[RecordId]) -> TransportResult<Vec<FlightRecord>>;

    async fn push_records(&self, records: &[FlightRecord]) -> TransportResult<()>;

    /// End the session. Called exactly once per session.
    async fn close(&self) -> TransportResult<()>;
}

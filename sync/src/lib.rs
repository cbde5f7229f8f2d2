//! # logbook-sync
//!
//! Keeps a local flight logbook in step with a sync server.
//!
//! The reconciliation algorithms live in `logbook-engine`; this crate wires
//! them to storage and to the network:
//!
//! - [`SyncOrchestrator`] runs the two-way sync protocol against a
//!   [`LocalStore`] and a [`Transport`].
//! - [`logbook`] holds the local maintenance flows (import, duplicate
//!   cleanup, export, status).
//! - [`SqliteStore`] and [`MemoryStore`] are the bundled stores. The
//!   transport is supplied by the embedding application.

pub mod config;
pub mod db;
pub mod error;
pub mod logbook;
pub mod orchestrator;
pub mod session;
pub mod store;
pub mod transport;

pub use config::{Config, ConfigError};
pub use db::SqliteStore;
pub use error::{StoreError, SyncError, SyncOutcome, TransportError};
pub use logbook::{ImportReport, LogbookStatus};
pub use orchestrator::{SyncOrchestrator, SyncReport};
pub use session::SessionGuard;
pub use store::{LocalStore, MemoryStore};
pub use transport::{Credentials, RemoteSession, Transport};

//! Two-way synchronization between the local store and the sync server.
//!
//! A protocol run logs in, optionally short-circuits on matching checksums,
//! fetches both manifests concurrently, renumbers local records whose ids
//! the server has already handed out, then pulls and pushes whatever is
//! missing or stale on either side.

use crate::error::{Result, SyncError, TransportError};
use crate::session::SessionGuard;
use crate::store::LocalStore;
use crate::transport::{Credentials, RemoteSession, Transport};
use logbook_engine::{Checksum, FlightRecord, Manifest, RecordId, TransferPlan};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Whether a run may stop early when both sides have the same checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncMode {
    IfNotSynced,
    Forced,
}

/// What a completed protocol run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Checksums matched, nothing was transferred
    pub skipped: bool,
    /// Local records moved to a fresh id: `(old, new)`
    pub renumbered: Vec<(RecordId, RecordId)>,
    pub pulled: usize,
    pub pushed: usize,
}

impl SyncReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

/// Drives the sync protocol over a local store and a remote transport.
pub struct SyncOrchestrator<S, T> {
    store: Arc<S>,
    transport: Arc<T>,
    credentials: Option<Credentials>,
    run_lock: Mutex<()>,
}

impl<S, T> SyncOrchestrator<S, T>
where
    S: LocalStore,
    T: Transport,
{
    pub fn new(store: Arc<S>, transport: Arc<T>, credentials: Option<Credentials>) -> Self {
        Self {
            store,
            transport,
            credentials,
            run_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Replace the credentials used by later runs.
    pub fn set_credentials(&mut self, credentials: Option<Credentials>) {
        self.credentials = credentials;
    }

    /// Run the protocol unless the local and remote checksums already match.
    pub async fn synchronize_if_not_synced(&self) -> Result<SyncReport> {
        self.run(SyncMode::IfNotSynced).await
    }

    /// Run the full protocol regardless of checksums.
    pub async fn force_sync(&self) -> Result<SyncReport> {
        self.run(SyncMode::Forced).await
    }

    async fn run(&self, mode: SyncMode) -> Result<SyncReport> {
        // One protocol run at a time per orchestrator
        let _running = self.run_lock.lock().await;

        let credentials = self
            .credentials
            .as_ref()
            .ok_or(SyncError::MissingCredentials)?;

        let guard = SessionGuard::login(self.transport.as_ref(), credentials)
            .await
            .map_err(|err| match err {
                TransportError::BadCredentials => SyncError::Authentication(err),
                other => SyncError::Remote(other),
            })?;

        let result = self.run_protocol(guard.session(), mode).await;
        guard.close().await;

        match &result {
            Ok(report) if report.skipped => {
                tracing::info!("Logbook already in sync");
            }
            Ok(report) => {
                tracing::info!(
                    renumbered = report.renumbered.len(),
                    pulled = report.pulled,
                    pushed = report.pushed,
                    "Sync completed"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, outcome = %err.outcome(), "Sync failed");
            }
        }

        result
    }

    async fn run_protocol(
        &self,
        session: &dyn RemoteSession,
        mode: SyncMode,
    ) -> Result<SyncReport> {
        if mode == SyncMode::IfNotSynced && self.checksums_match(session).await? {
            return Ok(SyncReport::skipped());
        }

        let (local_records, remote_entries) = tokio::try_join!(
            async { self.store.get_all_records().await.map_err(SyncError::from) },
            async { session.fetch_manifest().await.map_err(SyncError::from) },
        )?;
        let remote = Manifest::new(remote_entries);

        let renumbered = self
            .repair_collisions(&local_records, remote.highest_id())
            .await?;
        let local = if renumbered.is_empty() {
            Manifest::from_records(&local_records)
        } else {
            Manifest::from_records(&self.store.get_all_records().await?)
        };

        let plan = TransferPlan::compute(&local, &remote);
        tracing::debug!(
            to_pull = plan.to_pull.len(),
            to_push = plan.to_push.len(),
            "Computed transfer plan"
        );

        let pulled = self.pull(session, &plan.to_pull).await?;
        let pushed = self.push(session, &plan.to_push).await?;

        Ok(SyncReport {
            skipped: false,
            renumbered,
            pulled,
            pushed,
        })
    }

    async fn checksums_match(&self, session: &dyn RemoteSession) -> Result<bool> {
        let local = Checksum::of(&self.store.get_all_records().await?);
        let remote = session.fetch_checksum().await?;
        tracing::debug!(%local, %remote, "Compared checksums");
        Ok(local == remote)
    }

    /// Move unacknowledged local records off ids the server may already use.
    ///
    /// Any unacknowledged record with an id at or below the server's highest
    /// id is treated as a collision, even when the server has no record
    /// under that exact id. The moved copy is saved before the original is
    /// deleted, so a failure in between leaves both. A later run finds the
    /// copy above the server's ids and only deletes the leftover original.
    async fn repair_collisions(
        &self,
        local: &[FlightRecord],
        remote_highest: RecordId,
    ) -> Result<Vec<(RecordId, RecordId)>> {
        let mut moved: Vec<&FlightRecord> = local
            .iter()
            .filter(|r| r.unknown_to_server && r.id > remote_highest)
            .collect();
        let mut renumbered = Vec::new();

        for record in local
            .iter()
            .filter(|r| r.unknown_to_server && r.id <= remote_highest)
        {
            let earlier_copy = moved.iter().position(|copy| copy.content_eq(record));
            let new_id = match earlier_copy {
                Some(index) => moved.swap_remove(index).id,
                None => {
                    let new_id = self.store.allocate_next_id(remote_highest).await?;
                    self.store.save_records(&[record.with_id(new_id)]).await?;
                    new_id
                }
            };
            self.store
                .delete_records_hard(std::slice::from_ref(record))
                .await?;

            tracing::debug!(old_id = record.id, new_id, "Renumbered colliding record");
            renumbered.push((record.id, new_id));
        }

        Ok(renumbered)
    }

    async fn pull(&self, session: &dyn RemoteSession, ids: &[RecordId]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let records: Vec<_> = session
            .fetch_records_by_id(ids)
            .await?
            .iter()
            .map(FlightRecord::acknowledged)
            .collect();
        self.store.save_records(&records).await?;

        Ok(records.len())
    }

    async fn push(&self, session: &dyn RemoteSession, ids: &[RecordId]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let records: Vec<_> = self
            .store
            .get_records_by_id(ids)
            .await?
            .iter()
            .map(FlightRecord::acknowledged)
            .collect();
        session.push_records(&records).await?;
        self.store.save_records(&records).await?;

        Ok(records.len())
    }
}

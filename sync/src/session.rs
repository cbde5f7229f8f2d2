//! Scoped ownership of an authenticated remote session.

use crate::error::TransportResult;
use crate::transport::{Credentials, RemoteSession, Transport};
use std::sync::Arc;

/// Closes the wrapped session when the protocol run ends.
///
/// Normal exit paths call [`SessionGuard::close`]. If the guard is dropped
/// with the session still open (the run was cancelled or panicked), the
/// close is spawned on the current tokio runtime instead.
pub struct SessionGuard {
    session: Arc<dyn RemoteSession>,
    open: bool,
}

impl SessionGuard {
    /// Log in through `transport` and guard the resulting session.
    pub async fn login<T>(transport: &T, credentials: &Credentials) -> TransportResult<Self>
    where
        T: Transport + ?Sized,
    {
        let session = transport.login(credentials).await?;
        Ok(Self::new(session))
    }

    pub fn new(session: Box<dyn RemoteSession>) -> Self {
        Self {
            session: Arc::from(session),
            open: true,
        }
    }

    /// The guarded session.
    pub fn session(&self) -> &dyn RemoteSession {
        self.session.as_ref()
    }

    /// Close the session now. Close failures are logged, not returned,
    /// so they never mask the outcome of the run.
    pub async fn close(mut self) {
        self.open = false;
        if let Err(err) = self.session.close().await {
            tracing::warn!(error = %err, "Failed to close remote session");
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if !self.open {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::debug!("Session dropped while open, closing in background");
                let session = Arc::clone(&self.session);
                handle.spawn(async move {
                    if let Err(err) = session.close().await {
                        tracing::warn!(error = %err, "Failed to close remote session");
                    }
                });
            }
            Err(_) => {
                tracing::warn!("Session dropped outside a runtime, left open");
            }
        }
    }
}

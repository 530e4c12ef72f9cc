//! Live view of the authenticated session.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use supplyline_backend::{AuthApi, Identity};
use supplyline_core::ClientResult;

/// Process-wide source of "who is signed in right now".
///
/// Connecting performs one current-identity fetch and registers on the auth
/// service's identity-change channel; afterwards every login, logout or token
/// refresh replaces the held value synchronously. The store and its clones
/// are readers only; the auth backend is the channel's single writer.
/// Dropping a clone unregisters it, so a discarded owner cannot be mutated
/// by late notifications.
#[derive(Clone)]
pub struct SessionStore {
    auth: Arc<dyn AuthApi>,
    rx: watch::Receiver<Option<Identity>>,
}

impl SessionStore {
    /// Subscribe to the auth service and settle the initial identity.
    ///
    /// Suspends until the current-identity fetch resolves. A failed fetch is
    /// logged and treated as signed-out; the subscription still catches the
    /// next change.
    pub async fn connect(auth: Arc<dyn AuthApi>) -> Self {
        let rx = auth.subscribe();
        if let Err(err) = auth.current_identity().await {
            tracing::warn!("initial identity fetch failed, starting signed out: {err}");
        }
        Self { auth, rx }
    }

    /// The identity as of the latest notification.
    pub fn current(&self) -> Option<Identity> {
        self.rx.borrow().clone()
    }

    pub fn signed_in(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// A fresh receiver for dependents that re-run on identity changes.
    pub fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.rx.clone()
    }

    /// The identity-change stream as a `Stream` (yields the current value
    /// first, then every replacement).
    pub fn changes(&self) -> WatchStream<Option<Identity>> {
        WatchStream::new(self.rx.clone())
    }

    /// Wait for the next replacement and return it.
    pub async fn changed(&mut self) -> Option<Identity> {
        // A closed channel means the backend is gone; report signed-out.
        let _ = self.rx.changed().await;
        self.current()
    }

    /// The underlying auth service, for sign-in/out flows.
    pub fn auth(&self) -> Arc<dyn AuthApi> {
        self.auth.clone()
    }

    /// End the session. The removal arrives back through the change channel.
    pub async fn sign_out(&self) -> ClientResult<()> {
        self.auth.sign_out().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplyline_backend::MemoryBackend;

    #[tokio::test]
    async fn connect_resolves_the_existing_session() {
        let backend = Arc::new(MemoryBackend::new());
        backend.register_user("ops@example.com", "hunter2");
        backend.sign_in("ops@example.com", "hunter2").await.unwrap();

        let session = SessionStore::connect(backend).await;
        assert_eq!(
            session.current().map(|identity| identity.email),
            Some("ops@example.com".to_string())
        );
    }

    #[tokio::test]
    async fn notifications_replace_the_held_identity() {
        let backend = Arc::new(MemoryBackend::new());
        backend.register_user("ops@example.com", "hunter2");

        let mut session = SessionStore::connect(backend.clone()).await;
        assert!(!session.signed_in());

        backend.sign_in("ops@example.com", "hunter2").await.unwrap();
        assert!(session.changed().await.is_some());

        session.sign_out().await.unwrap();
        assert_eq!(session.changed().await, None);
    }

    #[tokio::test]
    async fn clones_observe_independently() {
        let backend = Arc::new(MemoryBackend::new());
        backend.register_user("ops@example.com", "hunter2");
        let session = SessionStore::connect(backend.clone()).await;

        let mut for_guard = session.clone();
        backend.sign_in("ops@example.com", "hunter2").await.unwrap();
        assert!(for_guard.changed().await.is_some());
        // The original clone sees the same latest value without consuming
        // anything from the other.
        assert!(session.signed_in());
    }
}

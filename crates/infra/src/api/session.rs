//! Session context shared by the request pipeline and the auth façade
//!
//! Owns the credential store and coordinates everything that changes it:
//! login, refresh, logout and expiry. Each change bumps a generation counter
//! and is announced on a broadcast channel so the presentation layer can
//! react (e.g. send the user back to login on [`SessionEvent::Expired`])
//! without the data layer knowing about navigation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use maintrack_common::{CredentialPair, TokenKey, TokenStore, TokenStoreError};
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{info, warn};

const EVENT_CAPACITY: usize = 16;

/// Credential lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Credentials were stored after a successful login
    LoggedIn,
    /// The access credential was replaced by a refresh
    Refreshed,
    /// Authentication was lost; credentials have been cleared
    Expired { reason: String },
    /// The user logged out
    LoggedOut,
}

/// Shared authentication state
pub struct Session {
    store: Arc<dyn TokenStore>,
    generation: AtomicU64,
    refresh_gate: Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, generation: AtomicU64::new(0), refresh_gate: Mutex::new(()), events }
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Receive every event emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Incremented on every credential change made through this session.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub async fn access_token(&self) -> Result<Option<String>, TokenStoreError> {
        self.store.access_token().await
    }

    pub async fn refresh_token(&self) -> Result<Option<String>, TokenStoreError> {
        self.store.refresh_token().await
    }

    /// Generation and access credential as seen by an outgoing request.
    ///
    /// The generation is read first, so a change landing in between makes
    /// the snapshot look stale rather than fresh.
    pub(crate) async fn snapshot(&self) -> Result<(u64, Option<String>), TokenStoreError> {
        let generation = self.generation();
        let access = self.store.access_token().await?;
        Ok((generation, access))
    }

    /// Store a freshly issued pair.
    pub async fn establish(&self, pair: &CredentialPair) -> Result<(), TokenStoreError> {
        self.store.save(pair).await?;
        self.bump();
        info!("session established");
        self.emit(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Replace the access credential, and the refresh credential when the
    /// server rotated it.
    pub(crate) async fn refreshed(
        &self,
        access: &str,
        rotated_refresh: Option<&str>,
    ) -> Result<(), TokenStoreError> {
        self.store.replace_access(access).await?;
        if let Some(refresh) = rotated_refresh {
            self.store.set(TokenKey::Refresh, refresh).await?;
        }
        self.bump();
        info!(rotated = rotated_refresh.is_some(), "access credential refreshed");
        self.emit(SessionEvent::Refreshed);
        Ok(())
    }

    /// Forget the credentials at the user's request.
    pub async fn end(&self) -> Result<(), TokenStoreError> {
        self.store.clear().await?;
        self.bump();
        info!("session ended");
        self.emit(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Forget the credentials after authentication was lost.
    ///
    /// Always emits [`SessionEvent::Expired`]; a failure to clear the store
    /// is logged and does not hide the expiry.
    pub(crate) async fn expire(&self, reason: &str) {
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "failed to clear credentials after session expiry");
        }
        self.bump();
        warn!(reason, "session expired");
        self.emit(SessionEvent::Expired { reason: reason.to_string() });
    }

    /// Serializes refresh attempts.
    pub(crate) async fn refresh_gate(&self) -> MutexGuard<'_, ()> {
        self.refresh_gate.lock().await
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("generation", &self.generation())
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use maintrack_common::auth::MemoryTokenStore;

    use super::*;

    fn session() -> Session {
        Session::new(Arc::new(MemoryTokenStore::new()))
    }

    #[tokio::test]
    async fn establish_stores_pair_and_announces_login() {
        let session = session();
        let mut events = session.subscribe();

        session.establish(&CredentialPair::new("A1", "R1")).await.unwrap();

        assert_eq!(session.access_token().await.unwrap().as_deref(), Some("A1"));
        assert_eq!(session.refresh_token().await.unwrap().as_deref(), Some("R1"));
        assert_eq!(session.generation(), 1);
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);
    }

    #[tokio::test]
    async fn refreshed_keeps_refresh_unless_rotated() {
        let session = session();
        session.establish(&CredentialPair::new("A1", "R1")).await.unwrap();

        session.refreshed("A2", None).await.unwrap();
        let pair = session.store().load().await.unwrap().unwrap();
        assert_eq!((pair.access.as_str(), pair.refresh.as_str()), ("A2", "R1"));

        session.refreshed("A3", Some("R2")).await.unwrap();
        let pair = session.store().load().await.unwrap().unwrap();
        assert_eq!((pair.access.as_str(), pair.refresh.as_str()), ("A3", "R2"));
        assert_eq!(session.generation(), 3);
    }

    #[tokio::test]
    async fn expire_clears_and_reports_reason() {
        let session = session();
        session.establish(&CredentialPair::new("A1", "R1")).await.unwrap();
        let mut events = session.subscribe();

        session.expire("refresh rejected").await;

        assert!(session.store().load().await.unwrap().is_none());
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::Expired { reason: "refresh rejected".into() }
        );
    }

    #[tokio::test]
    async fn end_clears_and_announces_logout() {
        let session = session();
        session.establish(&CredentialPair::new("A1", "R1")).await.unwrap();
        let mut events = session.subscribe();

        session.end().await.unwrap();

        assert!(session.access_token().await.unwrap().is_none());
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedOut);
    }

    #[tokio::test]
    async fn emitting_without_subscribers_is_fine() {
        let session = session();
        session.expire("nobody listening").await;
        assert_eq!(session.generation(), 1);
    }
}

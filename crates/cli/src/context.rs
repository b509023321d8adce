//! Application context - wires configuration, credentials and API façades

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use maintrack_domain::ClientConfig;
use maintrack_infra::{config, open_token_store, ApiClient, AuthApi, MaintenanceApi, Session, SessionEvent};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

/// Everything a command needs
pub struct AppContext {
    pub config: ClientConfig,
    pub session: Arc<Session>,
    pub auth: AuthApi,
    pub requests: MaintenanceApi,
}

impl AppContext {
    /// Load configuration (file, then environment) and build the stack.
    pub fn load(config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = config::load_with(config_path).context("failed to load configuration")?;
        Self::from_config(config)
    }

    pub fn from_config(config: ClientConfig) -> anyhow::Result<Self> {
        let store = open_token_store(&config.storage).context("failed to open credential store")?;
        let session = Arc::new(Session::new(store));
        let client = Arc::new(
            ApiClient::new(config.api.clone(), session.clone())
                .context("failed to build API client")?,
        );

        debug!(base_url = %config.api.base_url, backend = %config.storage.backend, "context ready");

        Ok(Self {
            auth: AuthApi::new(client.clone()),
            requests: MaintenanceApi::new(client),
            session,
            config,
        })
    }

    /// Start collecting session events emitted by the next commands.
    pub fn watch_session(&self) -> SessionWatch {
        SessionWatch { events: self.session.subscribe() }
    }
}

/// Buffered view of session events for a short-lived process
pub struct SessionWatch {
    events: broadcast::Receiver<SessionEvent>,
}

impl SessionWatch {
    /// Reason of the last expiry seen since the watch started, if any.
    pub fn expired(&mut self) -> Option<String> {
        let mut reason = None;
        loop {
            match self.events.try_recv() {
                Ok(SessionEvent::Expired { reason: why }) => reason = Some(why),
                Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty | TryRecvError::Closed) => return reason,
            }
        }
    }
}

//! Application state.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::{ServerError, ServerResult};
use crate::gateway::PortalGateway;
use crate::session::{SessionContext, SessionId, SessionRegistry};

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// Data gateway, built once at startup.
    pub gateway: PortalGateway,
    /// Live browser sessions.
    pub sessions: RwLock<SessionRegistry>,
}

impl AppState {
    /// Creates new application state.
    pub fn new(config: Config, gateway: PortalGateway) -> Self {
        let sessions = SessionRegistry::new(config.session_user());
        Self {
            config,
            gateway,
            sessions: RwLock::new(sessions),
        }
    }

    /// Runs `f` against a session under the registry's write lock.
    pub async fn update_session<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut SessionContext) -> R,
    ) -> ServerResult<R> {
        let mut sessions = self.sessions.write().await;
        let context = sessions.get_mut(id).ok_or(ServerError::SessionNotFound)?;
        Ok(f(context))
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<AppState>;

/// Creates shared state from config and gateway.
pub fn create_shared_state(config: Config, gateway: PortalGateway) -> SharedState {
    Arc::new(AppState::new(config, gateway))
}

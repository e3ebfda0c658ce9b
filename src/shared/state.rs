use std::sync::Arc;

use crate::config::AppConfig;
use crate::directory::UserDirectory;
use crate::security::JwtManager;
use crate::tickets::service::TicketService;

/// Shared application state: the explicit store objects owned by the
/// application root and handed to handlers by reference, no ambient
/// singletons.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub tickets: TicketService,
    pub directory: UserDirectory,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let jwt = Arc::new(JwtManager::from_secret(&config.auth.jwt_secret)?);

        Ok(Self {
            config,
            tickets: TicketService::new(),
            directory: UserDirectory::new(),
            jwt,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("tickets", &"TicketService")
            .field("directory", &"UserDirectory")
            .field("jwt", &"Arc<JwtManager>")
            .finish()
    }
}

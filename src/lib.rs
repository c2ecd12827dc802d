pub mod admin;
pub mod api;
pub mod browse;
pub mod cli;
pub mod config;
pub mod models;
pub mod registration;
pub mod session;
pub mod storage;

use std::sync::Arc;
use tracing::info;

use api::{ApiClient, ApiError};
use config::Config;
use models::LocationUpdate;
use session::{Preferences, SessionStore};
use storage::{FileStore, KeyValueStore};

/// Everything a view needs, built once at startup.
///
/// Views borrow the context; the API client and storage are shared, and the
/// session is only changed through [`SessionStore`]'s own operations.
pub struct AppContext {
    pub config: Config,
    pub api: Arc<ApiClient>,
    pub session: SessionStore,
    pub preferences: Preferences,
}

impl AppContext {
    /// Build the context over the configured on-disk storage
    pub fn init(config: Config, api_url: &str) -> Result<Self, ApiError> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.storage.path()));
        Self::with_storage(config, api_url, storage)
    }

    pub fn with_storage(
        config: Config,
        api_url: &str,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let api = Arc::new(ApiClient::new(api_url, &config.http)?);
        let session = SessionStore::hydrate(api.clone(), storage.clone());
        let preferences = Preferences::new(storage);

        info!(api_url = api.base_url(), authenticated = session.is_authenticated(), "Client initialized");
        Ok(Self {
            config,
            api,
            session,
            preferences,
        })
    }

    /// Send the user's position and, once the backend accepts it, record it
    /// on the session.
    pub async fn update_location(&self, update: &LocationUpdate) -> Result<(), ApiError> {
        update.coordinates().validate().map_err(ApiError::Validation)?;
        let token = self.session.require_token()?;
        self.api.update_location(&token, update).await?;
        self.session.apply_location(update)
    }

    /// Tear down the context. Persisted state is already on disk.
    pub fn shutdown(self) {
        let authenticated = self.session.is_authenticated();
        drop(self);
        info!(authenticated, "Client shut down");
    }
}

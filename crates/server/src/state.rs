//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::config::CanteenConfig;
use crate::services::auth::{self, AuthError};
use crate::services::sms::SmsClient;
use crate::store::{Store, StoreError};

/// Error initializing the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error("failed to hash admin password: {0}")]
    AdminPassword(#[from] AuthError),
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: the JSON document store, the SMS client, and
/// configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CanteenConfig,
    store: Store,
    sms: SmsClient,
}

impl AppState {
    /// Create a new application state, opening (and on first run seeding)
    /// the document store.
    ///
    /// # Errors
    ///
    /// Returns an error if the admin password cannot be hashed or the store
    /// file cannot be opened.
    pub async fn new(config: CanteenConfig) -> Result<Self, StateInitError> {
        let admin_hash = auth::hash_password(config.admin_password.expose_secret())?;
        let store = Store::open(&config.db_file, &admin_hash).await?;
        let sms = SmsClient::new(config.sms_api_key.clone(), config.shop.name.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner { config, store, sms }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &CanteenConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get a reference to the SMS client.
    #[must_use]
    pub fn sms(&self) -> &SmsClient {
        &self.inner.sms
    }
}

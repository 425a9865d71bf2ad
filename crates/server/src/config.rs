//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CANTEEN_TOKEN_SECRET` - Bearer token signing secret (min 32 chars)
//!
//! ## Optional
//! - `CANTEEN_HOST` - Bind address (default: 127.0.0.1)
//! - `CANTEEN_PORT` - Listen port (default: 4000)
//! - `CANTEEN_BASE_URL` - Public URL for QR codes (default: http://{host}:{port})
//! - `CANTEEN_DB_FILE` - Path to the JSON document file (default: canteen-db.json)
//! - `CANTEEN_ADMIN_PASSWORD` - First-run admin password (default: admin123)
//! - `SHOP_UPI_ID` - UPI VPA payments are addressed to (default: yourshop@upi)
//! - `SHOP_NAME` - Display name on payment links and SMS (default: College Canteen)
//! - `FAST2SMS_API_KEY` - Fast2SMS API key; SMS is skipped when unset

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Canteen server configuration.
#[derive(Debug, Clone)]
pub struct CanteenConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL encoded into the ordering-page QR
    pub base_url: String,
    /// Path to the persisted JSON document
    pub db_file: PathBuf,
    /// Bearer token signing secret
    pub token_secret: SecretString,
    /// Password for the seeded admin account (used on first run only)
    pub admin_password: SecretString,
    /// Shop identity shown on payment links and SMS
    pub shop: ShopConfig,
    /// Fast2SMS API key; notifications are skipped when unset
    pub sms_api_key: Option<SecretString>,
}

/// The shop's public identity.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// UPI VPA that payment links are addressed to
    pub upi_id: String,
    /// Display name on payment links and SMS signatures
    pub name: String,
}

impl CanteenConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the token secret is too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("CANTEEN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CANTEEN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CANTEEN_PORT", "4000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CANTEEN_PORT".to_string(), e.to_string()))?;
        let base_url =
            get_optional_env("CANTEEN_BASE_URL").unwrap_or_else(|| format!("http://{host}:{port}"));
        let db_file = PathBuf::from(get_env_or_default("CANTEEN_DB_FILE", "canteen-db.json"));

        let token_secret = get_required_secret("CANTEEN_TOKEN_SECRET")?;
        validate_token_secret(&token_secret, "CANTEEN_TOKEN_SECRET")?;

        let admin_password =
            SecretString::from(get_env_or_default("CANTEEN_ADMIN_PASSWORD", "admin123"));

        let shop = ShopConfig {
            upi_id: get_env_or_default("SHOP_UPI_ID", "yourshop@upi"),
            name: get_env_or_default("SHOP_NAME", "College Canteen"),
        };
        let sms_api_key = get_optional_env("FAST2SMS_API_KEY").map(SecretString::from);

        Ok(Self {
            host,
            port,
            base_url,
            db_file,
            token_secret,
            admin_password,
            shop,
            sms_api_key,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the token secret meets minimum length requirements.
fn validate_token_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

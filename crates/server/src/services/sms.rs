//! Order-ready SMS notifications via Fast2SMS.
//!
//! Delivery is strictly best-effort: callers spawn it off the request path
//! and only log the outcome. Without an API key the client logs and skips,
//! which keeps local development working with zero setup.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

use canteen_core::Phone;

const FAST2SMS_URL: &str = "https://www.fast2sms.com/dev/bulkV2";

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("sms request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-success HTTP status.
    #[error("sms gateway returned {0}")]
    Gateway(reqwest::StatusCode),
}

#[derive(Serialize)]
struct BulkV2Request<'a> {
    route: &'static str,
    message: &'a str,
    language: &'static str,
    flash: u8,
    numbers: &'a str,
}

/// Fast2SMS client. Cheap to clone; holds a shared `reqwest::Client`.
#[derive(Clone)]
pub struct SmsClient {
    http: reqwest::Client,
    api_key: Option<SecretString>,
    shop_name: String,
}

impl SmsClient {
    #[must_use]
    pub fn new(api_key: Option<SecretString>, shop_name: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            shop_name,
        }
    }

    /// Tell a customer their order is ready for collection.
    ///
    /// With no API key configured this logs and returns `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns `SmsError` if the gateway request fails or answers with a
    /// non-success status.
    pub async fn send_ready_notice(
        &self,
        phone: &Phone,
        name: &str,
        token_number: u32,
    ) -> Result<(), SmsError> {
        let Some(api_key) = &self.api_key else {
            tracing::info!(
                token_number,
                "no SMS API key configured, skipping ready notice"
            );
            return Ok(());
        };

        let message = format!(
            "Hi {name}, your canteen order Token #{token_number} is ready! \
             Please collect it. - {}",
            self.shop_name
        );

        let response = self
            .http
            .post(FAST2SMS_URL)
            .header("authorization", api_key.expose_secret())
            .json(&BulkV2Request {
                route: "q",
                message: &message,
                language: "english",
                flash: 0,
                numbers: phone.as_str(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SmsError::Gateway(response.status()));
        }

        tracing::info!(token_number, "ready notice sent");
        Ok(())
    }
}

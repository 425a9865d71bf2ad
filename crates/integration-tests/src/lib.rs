//! Integration test harness for the canteen server.
//!
//! Each test spawns the full application in-process on an ephemeral port
//! with a fresh temporary document file, then drives it over HTTP exactly
//! as the frontend would. No external services are needed: SMS is
//! unconfigured (and therefore skipped) and the store is a throwaway file
//! removed when the context drops.
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestContext::spawn().await;
//! let resp = ctx.client.get(ctx.url("/health")).send().await.unwrap();
//! assert_eq!(resp.status(), 200);
//! ```

#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use secrecy::SecretString;
use serde_json::{Value, json};

use canteen_server::config::{CanteenConfig, ShopConfig};
use canteen_server::{AppState, app};

/// Seeded admin credentials (first-run defaults).
pub const ADMIN_PHONE: &str = "0000000000";
pub const ADMIN_PASSWORD: &str = "admin123";

static NEXT_DB: AtomicU32 = AtomicU32::new(0);

/// A running server instance plus an HTTP client pointed at it.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    db_path: PathBuf,
}

impl TestContext {
    /// Spawn the server on an ephemeral port with a fresh document file.
    ///
    /// # Panics
    ///
    /// Panics if the server fails to start; tests cannot proceed without it.
    pub async fn spawn() -> Self {
        let db_path = std::env::temp_dir().join(format!(
            "canteen-integration-{}-{}.json",
            std::process::id(),
            NEXT_DB.fetch_add(1, Ordering::Relaxed),
        ));

        let config = CanteenConfig {
            host: std::net::IpAddr::from([127, 0, 0, 1]),
            port: 0,
            base_url: "http://127.0.0.1:4000".to_string(),
            db_file: db_path.clone(),
            token_secret: SecretString::from("integration-test-secret-0123456789abcdef"),
            admin_password: SecretString::from(ADMIN_PASSWORD),
            shop: ShopConfig {
                upi_id: "canteen@upi".to_string(),
                name: "College Canteen".to_string(),
            },
            sms_api_key: None,
        };

        let state = AppState::new(config)
            .await
            .expect("failed to initialize application state");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().expect("listener has no local addr");

        let router = app(state);
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("server task failed");
        });

        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
            db_path,
        }
    }

    /// Absolute URL for a path on this instance.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Log in and return a bearer token for the given credentials.
    ///
    /// # Panics
    ///
    /// Panics if the login request fails or returns no token.
    pub async fn login(&self, phone: &str, password: &str) -> String {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "phone": phone, "password": password }))
            .send()
            .await
            .expect("login request failed");
        assert_eq!(resp.status(), 200, "login rejected");

        let body: Value = resp.json().await.expect("login response is not JSON");
        body["token"]
            .as_str()
            .expect("login response has no token")
            .to_owned()
    }

    /// Bearer token for the seeded admin account.
    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_PHONE, ADMIN_PASSWORD).await
    }

    /// Place a guest order and return the response body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or is rejected.
    pub async fn place_guest_order(&self, name: &str, phone: &str, items: Value) -> Value {
        let resp = self
            .client
            .post(self.url("/orders/guest"))
            .json(&json!({ "name": name, "phone": phone, "items": items }))
            .send()
            .await
            .expect("guest order request failed");
        assert_eq!(resp.status(), 200, "guest order rejected");
        resp.json().await.expect("order response is not JSON")
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

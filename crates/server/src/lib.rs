//! Canteen ordering server.
//!
//! A small campus-canteen ordering service: guests browse the menu and
//! place orders against a daily token counter, pay over a UPI deep link,
//! and poll for status; the shopkeeper logs in to confirm payments, mark
//! orders ready (which fires an SMS), and hand them over.
//!
//! # Architecture
//!
//! - Axum HTTP API consumed by a separate frontend
//! - One JSON document on disk behind a mutex; every request serializes
//!   through it
//! - Stateless HMAC-signed bearer tokens; no session store
//! - Fast2SMS for ready notifications, fire-and-forget

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::CanteenConfig;
pub use state::AppState;

/// Build the application router.
///
/// CORS is wide open: the API is consumed from whatever origin the
/// frontend is served on, including LAN addresses reached via the printed
/// QR code.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            status = response.status().as_u16(),
                            latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                            "request completed"
                        );
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

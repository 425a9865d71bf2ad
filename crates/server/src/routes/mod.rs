//! HTTP route handlers for the canteen server.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Health check
//!
//! # Auth
//! POST   /auth/register               - Create a customer account
//! POST   /auth/login                  - Exchange phone + password for a token
//!
//! # Menu
//! GET    /menu                        - List items (?available=true filters)
//! POST   /menu                        - Add item (admin)
//! PUT    /menu/{id}                   - Edit item (admin)
//! DELETE /menu/{id}                   - Remove item (admin)
//!
//! # Orders
//! POST   /orders/guest                - Place a guest order
//! GET    /orders/status/{id}          - Public status poll
//! GET    /orders/qr                   - Ordering-page QR (?host overrides)
//! GET    /orders                      - Active orders (admin)
//! GET    /orders/mine                 - Own recent orders (requires auth)
//! PUT    /orders/{id}/confirm-payment - Record payment (admin)
//! PUT    /orders/{id}/ready           - Mark ready + SMS (admin)
//! PUT    /orders/{id}/collected       - Mark handed over (admin)
//! ```

pub mod auth;
pub mod menu;
pub mod orders;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(menu::list).post(menu::create))
        .route("/menu/{id}", put(menu::update).delete(menu::delete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::list_active))
        .route("/orders/guest", post(orders::guest_create))
        .route("/orders/status/{id}", get(orders::status))
        .route("/orders/qr", get(orders::qr))
        .route("/orders/mine", get(orders::mine))
        .route("/orders/{id}/confirm-payment", put(orders::confirm_payment))
        .route("/orders/{id}/ready", put(orders::ready))
        .route("/orders/{id}/collected", put(orders::collected))
}

/// Assemble all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(menu_routes())
        .merge(order_routes())
}

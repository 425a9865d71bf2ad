//! Order placement, polling, and dashboard handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use canteen_core::{MenuItemId, OrderId, OrderStatus, PaymentStatus, Phone, UserId};

use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireUser};
use crate::models::{Order, OrderLine, OrderStatusView, OrderWithContact};
use crate::services::upi;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GuestOrderRequest {
    pub name: String,
    pub phone: String,
    pub items: Vec<RequestedLine>,
    /// Free-text note carried into the UPI transaction note.
    #[serde(default)]
    pub note: Option<String>,
}

/// One requested line: a menu item id and a quantity. Name and price are
/// resolved server-side so a tampered client cannot set its own prices.
#[derive(Debug, Deserialize)]
pub struct RequestedLine {
    pub id: MenuItemId,
    pub qty: u32,
}

/// A created order plus everything the guest needs to pay for it.
#[derive(Debug, Serialize)]
pub struct GuestOrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub upi_link: String,
    pub upi_id: String,
}

#[derive(Debug, Deserialize)]
pub struct QrQuery {
    /// Overrides the configured base URL, for printing a QR that points at
    /// a LAN address.
    pub host: Option<String>,
}

/// `POST /orders/guest` - Place an order without an account.
///
/// # Errors
///
/// Returns 400 for an empty name, a malformed phone, an empty item list, a
/// zero quantity, or a reference to an unknown or unavailable menu item.
pub async fn guest_create(
    State(state): State<AppState>,
    Json(body): Json<GuestOrderRequest>,
) -> Result<Json<GuestOrderResponse>, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }
    let phone =
        Phone::parse(&body.phone).map_err(|e| AppError::BadRequest(e.to_string()))?;
    if body.items.is_empty() {
        return Err(AppError::BadRequest("items are required".to_owned()));
    }

    let lines = resolve_lines(&state, &body.items).await?;
    let order = state
        .store()
        .create_order(
            UserId::GUEST,
            lines,
            Some((body.name.trim().to_owned(), phone)),
        )
        .await?;

    let shop = &state.config().shop;
    let upi_link = upi::payment_link(
        &shop.upi_id,
        &shop.name,
        order.total,
        order.token_number,
        body.note.as_deref().unwrap_or(""),
    );

    tracing::info!(
        order_id = %order.id,
        token_number = order.token_number,
        "guest order placed"
    );
    Ok(Json(GuestOrderResponse {
        order,
        upi_link,
        upi_id: shop.upi_id.clone(),
    }))
}

/// Resolve requested lines against the current menu, rejecting unknown or
/// unavailable items.
async fn resolve_lines(
    state: &AppState,
    requested: &[RequestedLine],
) -> Result<Vec<OrderLine>, AppError> {
    let menu = state.store().menu().await;

    requested
        .iter()
        .map(|line| {
            if line.qty == 0 {
                return Err(AppError::BadRequest(
                    "quantity must be at least 1".to_owned(),
                ));
            }
            let item = menu
                .iter()
                .find(|item| item.id == line.id && item.available)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("menu item {} is not available", line.id))
                })?;
            Ok(OrderLine {
                id: item.id,
                name: item.name.clone(),
                price: item.price,
                qty: line.qty,
            })
        })
        .collect()
}

/// `GET /orders/status/{id}` - Public order-status poll.
///
/// # Errors
///
/// Returns 404 for an unknown id.
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderStatusView>, AppError> {
    let order = state
        .store()
        .order_by_id(OrderId::new(id))
        .await
        .ok_or(AppError::NotFound("order"))?;

    Ok(Json(OrderStatusView::from(&order)))
}

/// `GET /orders/qr` - QR code for the ordering page, as an SVG data URL.
///
/// # Errors
///
/// Returns 500 if the URL cannot be encoded.
pub async fn qr(
    State(state): State<AppState>,
    Query(query): Query<QrQuery>,
) -> Result<Json<Value>, AppError> {
    let host = query
        .host
        .unwrap_or_else(|| state.config().base_url.clone());
    let url = format!("{}/order", host.trim_end_matches('/'));
    let qr = crate::services::qr::ordering_page_qr(&url)?;

    Ok(Json(json!({ "qr": qr, "url": url })))
}

/// `GET /orders` - Active orders for the dashboard (admin).
pub async fn list_active(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<OrderWithContact>> {
    Json(state.store().active_orders().await)
}

/// `GET /orders/mine` - The caller's ten most recent orders.
pub async fn mine(
    RequireUser(claims): RequireUser,
    State(state): State<AppState>,
) -> Json<Vec<Order>> {
    Json(state.store().user_orders(claims.id).await)
}

/// `PUT /orders/{id}/confirm-payment` - Record a payment as received
/// (admin). Idempotent.
///
/// # Errors
///
/// Returns 404 for an unknown id.
pub async fn confirm_payment(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    state
        .store()
        .set_payment_status(OrderId::new(id), PaymentStatus::Paid)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// `PUT /orders/{id}/ready` - Mark an order ready and notify the customer
/// (admin).
///
/// The SMS runs as a detached task after the transition is persisted;
/// delivery failure is logged and never surfaces here.
///
/// # Errors
///
/// Returns 404 for an unknown id.
pub async fn ready(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let id = OrderId::new(id);
    let order = state
        .store()
        .order_with_contact(id)
        .await
        .ok_or(AppError::NotFound("order"))?;

    state
        .store()
        .set_order_status(id, OrderStatus::Ready)
        .await?;

    let token_number = order.order.token_number;
    if let Some(phone) = order.user_phone {
        let sms = state.sms().clone();
        let name = order.user_name.unwrap_or_else(|| "customer".to_owned());
        tokio::spawn(async move {
            if let Err(err) = sms.send_ready_notice(&phone, &name, token_number).await {
                tracing::warn!(order_id = %id, error = %err, "ready SMS failed");
            }
        });
    } else {
        tracing::info!(order_id = %id, "no contact phone on order, skipping SMS");
    }

    Ok(Json(json!({ "success": true, "token_number": token_number })))
}

/// `PUT /orders/{id}/collected` - Mark an order as handed over (admin).
///
/// No prior-state check: any order can be force-collected by id.
///
/// # Errors
///
/// Returns 404 for an unknown id.
pub async fn collected(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    state
        .store()
        .set_order_status(OrderId::new(id), OrderStatus::Collected)
        .await?;

    Ok(Json(json!({ "success": true })))
}

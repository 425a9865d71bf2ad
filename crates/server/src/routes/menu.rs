//! Menu catalog handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use canteen_core::MenuItemId;

use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::MenuItem;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// With `?available=true`, hide unavailable items (the guest-facing
    /// view). The raw catalog is the default.
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub price: Decimal,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub available: bool,
}

/// `GET /menu` - List menu items, optionally filtered to available ones.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<MenuItem>> {
    let mut items = state.store().menu().await;
    if query.available == Some(true) {
        items.retain(|item| item.available);
    }
    Json(items)
}

/// `POST /menu` - Add a menu item (admin).
///
/// # Errors
///
/// Returns 400 for an empty name or negative price.
pub async fn create(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateItemRequest>,
) -> Result<Json<MenuItem>, AppError> {
    validate_item(&body.name, body.price)?;

    let category = body.category.as_deref().unwrap_or("General");
    let item = state
        .store()
        .add_menu_item(body.name.trim(), body.price, category)
        .await?;

    tracing::info!(item_id = %item.id, "menu item added");
    Ok(Json(item))
}

/// `PUT /menu/{id}` - Overwrite a menu item (admin).
///
/// # Errors
///
/// Returns 400 for invalid fields, 404 for an unknown id.
pub async fn update(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<Value>, AppError> {
    validate_item(&body.name, body.price)?;

    state
        .store()
        .update_menu_item(
            MenuItemId::new(id),
            body.name.trim(),
            body.price,
            &body.category,
            body.available,
        )
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// `DELETE /menu/{id}` - Remove a menu item (admin). Idempotent.
///
/// # Errors
///
/// Returns 500 if persisting fails.
pub async fn delete(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    state.store().delete_menu_item(MenuItemId::new(id)).await?;
    Ok(Json(json!({ "success": true })))
}

fn validate_item(name: &str, price: Decimal) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }
    if price < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "price must be non-negative".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_rejects_blank_name() {
        assert!(validate_item("  ", Decimal::from(10)).is_err());
    }

    #[test]
    fn test_validate_item_rejects_negative_price() {
        assert!(validate_item("Samosa", Decimal::from(-1)).is_err());
        assert!(validate_item("Samosa", Decimal::ZERO).is_ok());
    }
}

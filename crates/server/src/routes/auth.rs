//! Registration and login handlers.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::error::AppError;
use crate::services::auth::{self, Session};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// `POST /auth/register` - Create a customer account.
///
/// # Errors
///
/// Returns 400 for missing fields or a malformed phone, 409 if the phone
/// already has an account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<Session>, AppError> {
    if body.name.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest(
            "name, phone and password are required".to_owned(),
        ));
    }

    let session = auth::register(
        state.store(),
        &state.config().token_secret,
        body.name.trim(),
        &body.phone,
        &body.password,
    )
    .await?;

    tracing::info!(user_id = %session.user.id, "account registered");
    Ok(Json(session))
}

/// `POST /auth/login` - Exchange phone + password for a bearer token.
///
/// # Errors
///
/// Returns 401 for an unknown phone or wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Session>, AppError> {
    let session = auth::login(
        state.store(),
        &state.config().token_secret,
        &body.phone,
        &body.password,
    )
    .await?;

    tracing::info!(user_id = %session.user.id, "login");
    Ok(Json(session))
}

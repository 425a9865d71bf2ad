//! Authentication extractors for route handlers.
//!
//! Bearer tokens are verified statelessly against the configured secret;
//! there is no session store to consult.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use canteen_core::Role;

use crate::error::AppError;
use crate::services::auth::{self, Claims};
use crate::state::AppState;

/// Extractor that requires a valid bearer token from any account.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_orders(
///     RequireUser(claims): RequireUser,
/// ) -> impl IntoResponse {
///     format!("orders for {}", claims.name)
/// }
/// ```
pub struct RequireUser(pub Claims);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_bearer(parts, state)?;
        Ok(Self(claims))
    }
}

/// Extractor that requires a valid bearer token with the admin role.
///
/// Returns 401 for a missing or invalid token and 403 for a valid token
/// belonging to a non-admin account.
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_bearer(parts, state)?;
        if claims.role != Role::Admin {
            return Err(AppError::Forbidden);
        }
        Ok(Self(claims))
    }
}

/// Pull the bearer token out of the `Authorization` header and verify it.
fn verify_bearer(parts: &Parts, state: &AppState) -> Result<Claims, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let claims = auth::verify_token(token, &state.config().token_secret)?;
    Ok(claims)
}

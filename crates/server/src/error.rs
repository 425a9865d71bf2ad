//! Unified request error with HTTP status mapping.
//!
//! Every handler returns `Result<_, AppError>`; the `IntoResponse` impl
//! turns the error into a `{"error": "..."}` JSON body with the right
//! status. Internal failures are logged in full and reported to the client
//! as a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::qr::QrError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Qr(#[from] QrError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("missing or invalid authorization header")]
    Unauthorized,

    #[error("admin access required")]
    Forbidden,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Store(err) => store_status(err),
            Self::Auth(err) => auth_status(err),
            Self::Qr(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::DuplicatePhone => StatusCode::CONFLICT,
        StoreError::Io(_) | StoreError::Malformed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn auth_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::TokenExpired => {
            StatusCode::UNAUTHORIZED
        }
        AuthError::PhoneTaken => StatusCode::CONFLICT,
        AuthError::InvalidPhone(_) => StatusCode::BAD_REQUEST,
        AuthError::PasswordHash | AuthError::TokenEncode => StatusCode::INTERNAL_SERVER_ERROR,
        AuthError::Store(inner) => store_status(inner),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

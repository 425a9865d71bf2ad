//! Authentication error types.

use thiserror::Error;

use canteen_core::PhoneError;

use crate::store::StoreError;

/// Errors from registration, login, and token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong phone or password. Deliberately indistinguishable so a login
    /// probe cannot enumerate accounts.
    #[error("invalid phone or password")]
    InvalidCredentials,

    /// Registration with a phone that already has an account.
    #[error("an account with this phone already exists")]
    PhoneTaken,

    /// The submitted phone does not parse.
    #[error(transparent)]
    InvalidPhone(#[from] PhoneError),

    /// Hashing or verifying a password failed internally.
    #[error("password hashing failed")]
    PasswordHash,

    /// The bearer token is missing, malformed, or has a bad signature.
    #[error("invalid token")]
    InvalidToken,

    /// The bearer token's signature is valid but it has expired.
    #[error("token expired")]
    TokenExpired,

    /// Serializing claims into a token failed.
    #[error("failed to encode token")]
    TokenEncode,

    #[error(transparent)]
    Store(#[from] StoreError),
}

//! Phone + password authentication and signed bearer tokens.
//!
//! Passwords are hashed with Argon2id. Session tokens are self-contained:
//! base64url-encoded JSON claims followed by a hex HMAC-SHA256 signature
//! over the encoded payload, keyed by the configured secret. The server
//! keeps no session state; a token is valid until its `exp` passes.

pub mod error;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use canteen_core::{Phone, Role, UserId};

use crate::models::PublicUser;
use crate::store::Store;

pub use error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime: seven days.
const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// The identity a bearer token carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub name: String,
    pub phone: Phone,
    pub role: Role,
    /// Expiry as a Unix timestamp (seconds).
    pub exp: i64,
}

impl Claims {
    fn for_user(user: &crate::models::User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            phone: user.phone.clone(),
            role: user.role,
            exp: chrono::Utc::now().timestamp() + TOKEN_TTL_SECS,
        }
    }
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if the hasher fails internally.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Check a password against a stored Argon2 hash string.
///
/// A malformed stored hash counts as a mismatch rather than a server error;
/// the caller cannot act on the distinction.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Sign claims into a bearer token: `base64url(json).hex(hmac)`.
///
/// # Errors
///
/// Returns `AuthError::TokenEncode` if the claims fail to serialize or the
/// secret is unusable as an HMAC key.
pub fn sign_token(claims: &Claims, secret: &SecretString) -> Result<String, AuthError> {
    let json = serde_json::to_vec(claims).map_err(|_| AuthError::TokenEncode)?;
    let payload = URL_SAFE_NO_PAD.encode(json);

    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|_| AuthError::TokenEncode)?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(format!("{payload}.{signature}"))
}

/// Verify a bearer token's signature and expiry, returning its claims.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` for any structural or signature
/// problem, `AuthError::TokenExpired` when only the expiry fails.
pub fn verify_token(token: &str, secret: &SecretString) -> Result<Claims, AuthError> {
    let (payload, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;

    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|_| AuthError::InvalidToken)?;
    mac.update(payload.as_bytes());
    let expected = hex::decode(signature).map_err(|_| AuthError::InvalidToken)?;
    mac.verify_slice(&expected)
        .map_err(|_| AuthError::InvalidToken)?;

    let json = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AuthError::InvalidToken)?;
    let claims: Claims = serde_json::from_slice(&json).map_err(|_| AuthError::InvalidToken)?;

    if claims.exp <= chrono::Utc::now().timestamp() {
        return Err(AuthError::TokenExpired);
    }
    Ok(claims)
}

/// A successful registration or login: the bearer token plus the public
/// view of the account.
#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

/// Register a new customer account.
///
/// # Errors
///
/// Returns `AuthError::InvalidPhone` for a bad phone, `AuthError::PhoneTaken`
/// if the phone already has an account, or a hashing/store error.
pub async fn register(
    store: &Store,
    secret: &SecretString,
    name: &str,
    phone: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let phone = Phone::parse(phone)?;

    // Phone uniqueness is enforced inside the store's critical section,
    // not checked here ahead of the (slow) hash.
    let hash = hash_password(password)?;
    let user = match store.create_user(name, phone, hash, Role::User).await {
        Ok(user) => user,
        Err(crate::store::StoreError::DuplicatePhone) => return Err(AuthError::PhoneTaken),
        Err(err) => return Err(err.into()),
    };

    let token = sign_token(&Claims::for_user(&user), secret)?;
    Ok(Session {
        token,
        user: PublicUser::from(&user),
    })
}

/// Log in with phone and password.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` for an unknown phone or a wrong
/// password, without distinguishing the two.
pub async fn login(
    store: &Store,
    secret: &SecretString,
    phone: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let phone = Phone::parse(phone).map_err(|_| AuthError::InvalidCredentials)?;
    let user = store
        .find_user_by_phone(&phone)
        .await
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    let token = sign_token(&Claims::for_user(&user), secret)?;
    Ok(Session {
        token,
        user: PublicUser::from(&user),
    })
}

//! Admin session gate.
//!
//! One configured admin, a bcrypt password hash and stateless HS256 tokens.
//! The token travels in the `admin_token` cookie or an `Authorization:
//! Bearer` header.

pub mod session;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{AppError, Result};

pub use session::{
    authenticate, clear_cookie, session_cookie, token_from_headers, AdminSession, COOKIE_NAME,
};

pub const ADMIN_ROLE: &str = "admin";

/// Message for every failed login, whichever half was wrong.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn issue_token(auth: &AuthConfig, email: &str) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: email.to_lowercase(),
        email: email.to_string(),
        role: ADMIN_ROLE.to_string(),
        exp: (now + auth.token_ttl).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Store(format!("failed to sign session token: {e}")))
}

/// Checks signature and expiry.
pub fn verify_token(auth: &AuthConfig, token: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "session token rejected");
        AppError::Auth("Invalid or expired session".to_string())
    })
}

/// Compares the submitted credentials with the configured admin.
///
/// The bcrypt comparison always runs, so a wrong email costs as much as a
/// wrong password.
pub async fn check_credentials(auth: &AuthConfig, email: &str, password: &str) -> Result<()> {
    let email_matches = email.trim().eq_ignore_ascii_case(&auth.admin_email);
    let password = password.to_string();
    let hash = auth.admin_password_hash.clone();

    // bcrypt is CPU-bound; keep it off the async workers.
    let password_matches = tokio::task::spawn_blocking(move || {
        bcrypt::verify(&password, &hash).unwrap_or(false)
    })
    .await
    .map_err(|e| AppError::Store(format!("password check task failed: {e}")))?;

    if email_matches && password_matches {
        Ok(())
    } else {
        tracing::warn!(email = %email, "failed admin login");
        Err(AppError::Auth(INVALID_CREDENTIALS.to_string()))
    }
}

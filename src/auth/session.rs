use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration;

use super::{verify_token, Claims};
use crate::config::AuthConfig;
use crate::error::AppError;
use crate::state::AppState;

pub const COOKIE_NAME: &str = "admin_token";

/// Session token from the `admin_token` cookie, falling back to a bearer
/// header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = CookieJar::from_headers(headers)
        .get(COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

fn build_cookie(auth: &AuthConfig, value: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, value))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .secure(auth.secure_cookie)
        .build()
}

pub fn session_cookie(auth: &AuthConfig, token: &str) -> Cookie<'static> {
    let max_age = Duration::seconds(auth.token_ttl.num_seconds());
    build_cookie(auth, token.to_string(), max_age)
}

/// Expired, empty `admin_token`; tells the browser to drop the session.
pub fn clear_cookie(auth: &AuthConfig) -> Cookie<'static> {
    build_cookie(auth, String::new(), Duration::ZERO)
}

/// Claims of the request's session token; `Auth` if absent or invalid.
pub fn authenticate(headers: &HeaderMap, auth: &AuthConfig) -> Result<Claims, AppError> {
    let token = token_from_headers(headers)
        .ok_or_else(|| AppError::Auth("Authentication required".to_string()))?;
    verify_token(auth, &token)
}

/// Extractor for admin-only handlers. Rejects with 401 before the handler
/// body runs.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Claims);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, state.auth()).map(AdminSession)
    }
}

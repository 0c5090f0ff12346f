/**
 * Authentication Routes
 * Admin login, session verification and logout
 */
use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use super::extract::JsonBody;
use crate::auth::{self, AdminSession};
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserInfo,
    /// Same token as the cookie, for clients that send a bearer header.
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub authenticated: bool,
    pub user: UserInfo,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let auth_config = state.auth();
    auth::check_credentials(auth_config, &payload.email, &payload.password).await?;

    let token = auth::issue_token(auth_config, &auth_config.admin_email)?;
    let cookie = auth::session_cookie(auth_config, &token);
    tracing::info!(email = %auth_config.admin_email, "admin logged in");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            user: UserInfo {
                email: auth_config.admin_email.clone(),
                role: auth::ADMIN_ROLE.to_string(),
            },
            token,
        }),
    ))
}

/// GET /api/auth/verify
pub async fn verify(AdminSession(claims): AdminSession) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        authenticated: true,
        user: UserInfo {
            email: claims.email,
            role: claims.role,
        },
    })
}

/// POST /api/auth/logout
/// Always succeeds; the token itself stays valid until it expires.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(auth::clear_cookie(state.auth())),
        Json(super::SuccessResponse::ok()),
    )
}

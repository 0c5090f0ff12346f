//! Runtime configuration, read from the environment (optionally via `.env`).
//!
//! Admin credentials and the token secret have no defaults: if any of them is
//! missing the service refuses to start.

use std::{path::PathBuf, time::Duration};

use crate::error::{AppError, Result};

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Admin session token lifetime.
pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub admin_email: String,
    /// bcrypt hash of the admin password.
    pub admin_password_hash: String,
    pub token_ttl: chrono::Duration,
    /// Adds `Secure` to the session cookie.
    pub secure_cookie: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub database_url: Option<String>,
    pub auth: AuthConfig,
    pub store_timeout: Duration,
    pub upload_dir: PathBuf,
    /// Prefix for public upload URLs, e.g. `https://cdn.example.com`. Empty
    /// means URLs are relative (`/uploads/...`).
    pub public_base_url: String,
    pub notify_webhook_url: Option<String>,
    pub revalidate_url: Option<String>,
    pub revalidate_secret: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| {
            get(key).ok_or_else(|| {
                AppError::Config(format!("{key} must be set; refusing to start without it"))
            })
        };

        let environment = get("ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        let is_production = environment == "production";

        let jwt_secret = require("JWT_SECRET")?;
        if is_production && jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT_SECRET must be at least {MIN_PRODUCTION_SECRET_LEN} characters in production"
            )));
        }

        let admin_email = require("ADMIN_EMAIL")?;
        if !admin_email.contains('@') {
            return Err(AppError::Config("ADMIN_EMAIL is not an email address".into()));
        }

        let admin_password_hash = require("ADMIN_PASSWORD_HASH")?;
        if !admin_password_hash.starts_with("$2") {
            return Err(AppError::Config(
                "ADMIN_PASSWORD_HASH must be a bcrypt hash (use the hash-password binary)".into(),
            ));
        }

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("PORT is not a valid port: {raw}")))?,
            None => DEFAULT_PORT,
        };

        let store_timeout_ms = get("STORE_TIMEOUT_MS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_STORE_TIMEOUT_MS);

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            database_url: get("DATABASE_URL"),
            auth: AuthConfig {
                jwt_secret,
                admin_email,
                admin_password_hash,
                token_ttl: chrono::Duration::days(TOKEN_TTL_DAYS),
                secure_cookie: is_production,
            },
            store_timeout: Duration::from_millis(store_timeout_ms),
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            public_base_url: get("PUBLIC_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            notify_webhook_url: get("NOTIFY_WEBHOOK_URL"),
            revalidate_url: get("REVALIDATE_URL"),
            revalidate_secret: get("REVALIDATE_SECRET"),
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

//! Portfolio CMS - content and project API for a portfolio site and its
//! admin panel.

pub mod auth;
pub mod blob;
pub mod config;
pub mod contacts;
pub mod content;
pub mod db;
pub mod error;
pub mod listing;
pub mod logging;
pub mod normalize;
pub mod notify;
pub mod projects;
pub mod revalidate;
pub mod routes;
pub mod state;
pub mod store;

use axum::{
    http::{header, HeaderValue, Method},
    middleware, Router,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    services::ServeDir, trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::notify::{ContactNotifier, LogNotifier, WebhookNotifier};
use crate::revalidate::{Revalidation, Revalidator};
use crate::state::AppState;
use crate::store::{memory::MemoryStore, postgres::PgStore, Store};

/// Global request body cap. Uploads are the largest bodies.
const BODY_LIMIT: usize = blob::MAX_UPLOAD_SIZE + 1024 * 1024;

const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(10);

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN, falling back
/// to the local frontend dev server.
pub fn configure_cors() -> CorsLayer {
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .and_then(|s| {
            let origins: Vec<HeaderValue> = s
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                None
            } else {
                Some(origins)
            }
        })
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        })
        .unwrap_or_else(|| {
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
            ]
        });

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        // The session rides in a cookie.
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = configure_cors();
    let uploads = ServeDir::new(state.blobs.root());

    routes::router(state)
        .nest_service(blob::PUBLIC_PREFIX, uploads)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        // Compress responses with gzip/br/zstd automatically
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(cors)
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let pool = db::init_pool(&db::DbConfig::from_url(url.as_str())).await?;
            db::run_migrations(&pool).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set; using the in-memory store. Data is lost on restart."
            );
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn build_state(config: AppConfig, store: Arc<dyn Store>) -> Result<AppState> {
    let http = reqwest::Client::builder()
        .timeout(OUTBOUND_TIMEOUT)
        .build()
        .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

    let notifier: Arc<dyn ContactNotifier> = match &config.notify_webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(http.clone(), url.as_str())),
        None => Arc::new(LogNotifier),
    };
    let hook = config
        .revalidate_url
        .as_ref()
        .map(|url| Revalidator::new(http, url.as_str(), config.revalidate_secret.clone()));

    Ok(AppState::new(config, store, notifier, Revalidation::new(hook)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Run the server (used by main).
pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    // Held for the whole run; dropping it stops the log writers.
    let _log_guards = logging::init();

    routes::health::init_start_time();

    let config = AppConfig::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "refusing to start"))?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| AppError::Config("HOST/PORT do not form a socket address".into()))?;

    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend(), "store ready");

    let app = create_app(build_state(config, store)?);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::{empty_request, send};
    use crate::state::testing::{test_config, test_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_create_app_serves_health_with_request_id() {
        let dir = tempfile::tempdir().unwrap();
        let app = create_app(test_state(dir.path()));
        let res = send(app, empty_request("GET", "/health", None)).await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_uploads_are_served_statically() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/hello.txt"), "hi").unwrap();

        let app = create_app(test_state(dir.path()));
        let res = send(app.clone(), empty_request("GET", "/uploads/images/hello.txt", None)).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(&res.body[..], b"hi");

        let res = send(app, empty_request("GET", "/uploads/images/missing.png", None)).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_build_state_without_collaborators() {
        let dir = tempfile::tempdir().unwrap();
        let state = build_state(test_config(dir.path()), Arc::new(MemoryStore::new())).unwrap();
        assert_eq!(state.store.backend(), "memory");
    }
}

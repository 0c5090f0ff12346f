/**
 * Routes Module
 * API route handlers and the route table
 */
pub mod auth;
pub mod contacts;
pub mod content;
pub mod extract;
pub mod health;
pub mod projects;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::blob::MAX_UPLOAD_SIZE;
use crate::error::{AppError, Result};
use crate::state::AppState;

pub use crate::error::ErrorResponse;

/// Body of successful deletes and other acknowledgements.
#[derive(Debug, Serialize, serde::Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Deserializes a request body, reporting shape errors as 400s.
pub(crate) fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body)
        .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))
}

/// All routes, without middleware. See [`crate::create_app`] for the layered
/// application.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_ping))
        .route("/health/ready", get(health::health_ready))
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/auth/logout", post(auth::logout))
        // Page content
        .route(
            "/api/content",
            get(content::get_content).post(content::save_content),
        )
        // Projects
        .route(
            "/api/projects",
            get(projects::get_projects)
                .post(projects::create_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        // Contact submissions
        .route(
            "/api/contacts",
            get(contacts::list_contacts)
                .post(contacts::submit_contact)
                .patch(contacts::update_contact_status),
        )
        .route("/api/contacts/export", get(contacts::export_contacts))
        .route(
            "/api/contacts/{id}",
            get(contacts::get_contact).delete(contacts::delete_contact),
        )
        // Uploads
        .route(
            "/api/upload",
            post(upload::upload_file)
                .delete(upload::delete_file)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 64 * 1024)),
        )
        .with_state(state)
}

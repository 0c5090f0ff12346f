/**
 * Page Content Routes
 * Public reads and admin merges of per-page content blocks
 */
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::extract::{JsonBody, QueryParams};
use crate::auth::AdminSession;
use crate::content::PageSlug;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::ContentMap;

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveContentRequest {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContentResponse {
    pub slug: PageSlug,
    pub content: ContentMap,
}

fn parse_slug(raw: Option<&str>) -> Result<PageSlug> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => raw.parse(),
        _ => Err(AppError::validation("slug is required")),
    }
}

/// GET /api/content?slug=
/// Stored content over the page defaults, so a never-edited page still
/// renders.
pub async fn get_content(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ContentQuery>,
) -> Result<Json<ContentResponse>> {
    let slug = parse_slug(query.slug.as_deref())?;
    let content = state.content.get_or_default(slug).await?;
    Ok(Json(ContentResponse { slug, content }))
}

/// POST /api/content
/// Body `{ slug, content }`; `content` is merged into the stored page.
pub async fn save_content(
    _admin: AdminSession,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SaveContentRequest>,
) -> Result<Json<ContentResponse>> {
    let slug = parse_slug(Some(&payload.slug))?;
    let content = state.content.set(slug, payload.content).await?;
    state.revalidation.page_changed(slug);
    Ok(Json(ContentResponse { slug, content }))
}

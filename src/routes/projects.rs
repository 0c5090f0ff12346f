/**
 * Project Routes
 * Public listing/detail, admin CRUD and the public view counter
 */
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::extract::{JsonBody, QueryParams};
use super::{parse_body, SuccessResponse};
use crate::auth::{self, AdminSession};
use crate::error::{AppError, Result};
use crate::listing::{self, ListQuery};
use crate::projects::model::{Project, ProjectFields, ProjectPatch};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query for GET /api/projects. `id` or `slug` selects one project;
/// otherwise the rest filters and pages the listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsQuery {
    pub id: Option<Uuid>,
    pub slug: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ProjectsQuery {
    fn list_query(&self) -> ListQuery {
        ListQuery {
            search: self.search.clone(),
            category: self.category.clone(),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewCountResponse {
    pub id: Uuid,
    pub views: i64,
}

/// Keys a public view-count PUT may carry. `views`/`currentViews` are the
/// client's idea of the count and are ignored.
const VIEW_ONLY_KEYS: &[&str] = &["id", "views", "currentViews", "incrementView"];

/// A PUT is a view increment when it says so, or when it carries nothing but
/// an id and a count. An explicit `incrementView: false` always means an edit.
fn is_view_increment(body: &Map<String, Value>) -> bool {
    if let Some(flag) = body.get("incrementView").and_then(Value::as_bool) {
        return flag;
    }
    let has_count = body.contains_key("views") || body.contains_key("currentViews");
    has_count && body.keys().all(|k| VIEW_ONLY_KEYS.contains(&k.as_str()))
}

fn parse_id(body: &Map<String, Value>) -> Result<Uuid> {
    body.get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .ok_or_else(|| AppError::validation("A valid project id is required"))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/projects
pub async fn get_projects(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ProjectsQuery>,
) -> Result<Response> {
    if let Some(id) = query.id {
        let project = state
            .projects
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;
        return Ok(Json(project).into_response());
    }

    if let Some(slug) = query.slug.as_deref() {
        let project = state
            .projects
            .get_by_slug(slug.trim())
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;
        return Ok(Json(project).into_response());
    }

    let all = state.projects.list().await?;
    let page = listing::paginate(&all, &query.list_query());
    Ok(Json(page).into_response())
}

/// POST /api/projects
pub async fn create_project(
    _admin: AdminSession,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<Project>)> {
    let fields: ProjectFields = parse_body(body)?;
    let project = state.projects.create(fields).await?;
    state.revalidation.projects_changed(&[project.slug.as_str()]);
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/projects
/// Body `{ id, ...changes }`. A view-count body is public; everything else
/// needs an admin session.
pub async fn update_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<Value>,
) -> Result<Response> {
    let Value::Object(mut body) = body else {
        return Err(AppError::validation("Request body must be a JSON object"));
    };
    let id = parse_id(&body)?;

    if is_view_increment(&body) {
        let project = state
            .projects
            .increment_view(id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;
        return Ok(Json(ViewCountResponse {
            id: project.id,
            views: project.views,
        })
        .into_response());
    }

    auth::authenticate(&headers, state.auth())?;

    body.remove("id");
    // Counters are never written through the edit path.
    for key in ["views", "currentViews", "incrementView"] {
        body.remove(key);
    }
    let patch: ProjectPatch = parse_body(Value::Object(body))?;
    if patch.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    // A slug change leaves the old detail page behind; purge it too.
    let old_slug = state
        .projects
        .get_by_id(id)
        .await?
        .map(|p| p.slug)
        .ok_or_else(|| AppError::not_found("Project not found"))?;
    let project = state
        .projects
        .update(id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;
    state
        .revalidation
        .projects_changed(&[old_slug.as_str(), project.slug.as_str()]);
    Ok(Json(project).into_response())
}

/// DELETE /api/projects?id=
pub async fn delete_project(
    _admin: AdminSession,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DeleteQuery>,
) -> Result<Json<SuccessResponse>> {
    let id = query
        .id
        .ok_or_else(|| AppError::validation("A valid project id is required"))?;
    let slug = state.projects.get_by_id(id).await?.map(|p| p.slug);

    if !state.projects.delete(id).await? {
        return Err(AppError::not_found("Project not found"));
    }
    let slugs: Vec<&str> = slug.as_deref().into_iter().collect();
    state.revalidation.projects_changed(&slugs);
    Ok(Json(SuccessResponse::ok()))
}

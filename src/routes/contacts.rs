/**
 * Contact Routes
 * Public contact form plus the admin inbox
 */
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::extract::{JsonBody, PathParam, QueryParams};
use super::SuccessResponse;
use crate::auth::AdminSession;
use crate::contacts::export;
use crate::contacts::model::{ContactStatus, ContactSubmission, NewContact};
use crate::error::{AppError, Result};
use crate::listing::{self, ListQuery, Page};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub id: Option<Uuid>,
    #[serde(default)]
    pub status: String,
}

/// GET /api/contacts
/// `category` filters by status (`unread`/`read`).
pub async fn list_contacts(
    _admin: AdminSession,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<Json<Page<ContactSubmission>>> {
    let contacts = state.contacts.list().await?;
    Ok(Json(listing::paginate(&contacts, &query)))
}

/// POST /api/contacts
pub async fn submit_contact(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewContact>,
) -> Result<(StatusCode, Json<ContactSubmission>)> {
    let submission = state.contacts.create(payload).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

/// PATCH /api/contacts
pub async fn update_contact_status(
    _admin: AdminSession,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<StatusUpdateRequest>,
) -> Result<Json<ContactSubmission>> {
    let id = payload
        .id
        .ok_or_else(|| AppError::validation("id is required"))?;
    let status: ContactStatus = payload.status.parse()?;

    state
        .contacts
        .update_status(id, status)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Contact submission not found"))
}

/// GET /api/contacts/{id}
pub async fn get_contact(
    _admin: AdminSession,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<ContactSubmission>> {
    state
        .contacts
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Contact submission not found"))
}

/// DELETE /api/contacts/{id}
pub async fn delete_contact(
    _admin: AdminSession,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<SuccessResponse>> {
    if state.contacts.delete(id).await? {
        Ok(Json(SuccessResponse::ok()))
    } else {
        Err(AppError::not_found("Contact submission not found"))
    }
}

/// GET /api/contacts/export
pub async fn export_contacts(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let contacts = state.contacts.list().await?;
    let filename = format!(
        "contacts-{}.csv",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        export::to_csv(&contacts),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::router;
    use crate::routes::testing::{empty_request, json_request, send, TestResponse};
    use crate::state::testing::{bearer, test_state};
    use serde_json::{json, Value};

    async fn submit(app: &axum::Router, message: &str) -> TestResponse {
        send(
            app.clone(),
            json_request("POST", "/api/contacts", None, &form(message)),
        )
        .await
    }

    fn form(message: &str) -> Value {
        json!({
            "name": "Ada",
            "email": "ada@example.com",
            "phone": "+44 20 0000 0000",
            "subject": "Project enquiry",
            "message": message,
        })
    }

    #[tokio::test]
    async fn test_public_submission_is_stored_unread() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let auth = bearer(&state);
        let app = router(state);

        let res = submit(&app, "Hello").await;
        assert_eq!(res.status, StatusCode::CREATED);
        assert_eq!(res.json()["status"], "unread");

        let res = send(app, empty_request("GET", "/api/contacts", Some(&auth))).await;
        let page: Page<ContactSubmission> = serde_json::from_slice(&res.body).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].message, "Hello");
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected_and_nothing_stored() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let auth = bearer(&state);
        let app = router(state);

        let res = submit(&app, "  ").await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(res.json()["error"].as_str().unwrap().contains("message"));

        let res = send(app, empty_request("GET", "/api/contacts", Some(&auth))).await;
        let page: Page<ContactSubmission> = serde_json::from_slice(&res.body).unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_inbox_requires_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(dir.path()));
        for (method, uri) in [
            ("GET", "/api/contacts"),
            ("GET", "/api/contacts/export"),
            ("DELETE", "/api/contacts/00000000-0000-0000-0000-000000000000"),
        ] {
            let res = send(app.clone(), empty_request(method, uri, None)).await;
            assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_toggle_status_filter_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let auth = bearer(&state);
        let app = router(state);

        let res = submit(&app, "Hi").await;
        let created: ContactSubmission = serde_json::from_slice(&res.body).unwrap();

        let res = send(
            app.clone(),
            json_request(
                "PATCH",
                "/api/contacts",
                Some(&auth),
                &json!({"id": created.id, "status": "read"}),
            ),
        )
        .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json()["status"], "read");

        let res = send(
            app.clone(),
            empty_request("GET", "/api/contacts?category=unread", Some(&auth)),
        )
        .await;
        let page: Page<ContactSubmission> = serde_json::from_slice(&res.body).unwrap();
        assert_eq!(page.total, 0);

        let res = send(
            app.clone(),
            json_request(
                "PATCH",
                "/api/contacts",
                Some(&auth),
                &json!({"id": created.id, "status": "archived"}),
            ),
        )
        .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);

        let uri = format!("/api/contacts/{}", created.id);
        let res = send(app.clone(), empty_request("DELETE", &uri, Some(&auth))).await;
        assert_eq!(res.status, StatusCode::OK);
        let res = send(app, empty_request("DELETE", &uri, Some(&auth))).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_single_submission_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let auth = bearer(&state);
        let app = router(state);

        let res = submit(&app, "Hi").await;
        let created: ContactSubmission = serde_json::from_slice(&res.body).unwrap();

        let uri = format!("/api/contacts/{}", created.id);
        let res = send(app.clone(), empty_request("GET", &uri, Some(&auth))).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.json()["message"], "Hi");

        let uri = format!("/api/contacts/{}", Uuid::new_v4());
        let res = send(app, empty_request("GET", &uri, Some(&auth))).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_input_gets_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let auth = bearer(&state);
        let app = router(state);

        let res = send(
            app.clone(),
            empty_request("DELETE", "/api/contacts/not-a-uuid", Some(&auth)),
        )
        .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(res.json()["error"].is_string());

        let req = axum::http::Request::post("/api/contacts")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{\"name\": \"Ada\","))
            .unwrap();
        let res = send(app, req).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(res.json()["error"].is_string());
    }

    #[tokio::test]
    async fn test_export_is_csv_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let auth = bearer(&state);
        let app = router(state);

        submit(&app, "Needs, commas").await;
        let res = send(app, empty_request("GET", "/api/contacts/export", Some(&auth))).await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv"));
        let csv = String::from_utf8(res.body.to_vec()).unwrap();
        assert!(csv.starts_with("id,name,email"));
        assert!(csv.contains("\"Needs, commas\""));
    }
}

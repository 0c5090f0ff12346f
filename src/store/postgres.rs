//! Postgres-backed store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::{ContactStore, ContentMap, ContentStore, ProjectStore, Store};
use crate::contacts::model::{ContactStatus, ContactSubmission};
use crate::db::{
    self,
    models::{ContactRow, PageContentRow, ProjectRow},
};
use crate::error::{AppError, Result};
use crate::projects::model::Project;

const PROJECT_COLUMNS: &str = "id, slug, views, data, created_at, updated_at";
const CONTACT_COLUMNS: &str =
    "id, name, email, phone, subject, message, attachment_url, status, created_at";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-index violation on `projects.slug` to a conflict.
fn slug_conflict(err: sqlx::Error, slug: &str) -> AppError {
    let is_unique = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if is_unique {
        AppError::Conflict(format!("Slug '{slug}' already exists"))
    } else {
        AppError::Database(err)
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn get_content(&self, slug: &str) -> Result<Option<ContentMap>> {
        let row = sqlx::query_as::<_, PageContentRow>(
            "SELECT slug, content, updated_at FROM page_content WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.content.0))
    }

    async fn put_content(&self, slug: &str, content: &ContentMap) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO page_content (slug, content, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (slug) DO UPDATE SET
                content = EXCLUDED.content,
                updated_at = now()
            "#,
        )
        .bind(slug)
        .bind(Json(content))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Project::from))
    }

    async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Project::from))
    }

    async fn insert_project(&self, project: &Project) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, slug, views, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(project.id)
        .bind(&project.slug)
        .bind(project.views)
        .bind(Json(&project.fields))
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| slug_conflict(e, &project.slug))?;
        Ok(())
    }

    async fn replace_project(&self, project: &Project) -> Result<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET slug = $2, data = $3, updated_at = $4
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(project.id)
        .bind(&project.slug)
        .bind(Json(&project.fields))
        .bind(project.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| slug_conflict(e, &project.slug))?;
        Ok(row.map(Project::from))
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_project_views(&self, id: Uuid) -> Result<Option<Project>> {
        // Single statement: Postgres row locking serializes concurrent bumps.
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "UPDATE projects SET views = views + 1 WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Project::from))
    }
}

#[async_trait]
impl ContactStore for PgStore {
    async fn list_contacts(&self) -> Result<Vec<ContactSubmission>> {
        let rows = sqlx::query_as::<_, ContactRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_submissions ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ContactSubmission::try_from).collect()
    }

    async fn get_contact(&self, id: Uuid) -> Result<Option<ContactSubmission>> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(ContactSubmission::try_from).transpose()
    }

    async fn insert_contact(&self, contact: &ContactSubmission) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO contact_submissions
                (id, name, email, phone, subject, message, attachment_url, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(contact.id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.subject)
        .bind(&contact.message)
        .bind(&contact.attachment_url)
        .bind(contact.status.as_str())
        .bind(contact.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<Option<ContactSubmission>> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "UPDATE contact_submissions SET status = $2 WHERE id = $1 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(ContactSubmission::try_from).transpose()
    }

    async fn delete_contact(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contact_submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<Duration> {
        Ok(db::health_check(&self.pool).await?)
    }
}

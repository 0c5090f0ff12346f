//! Database Models - row structs for the Postgres tables (used by sqlx).

use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::contacts::model::{ContactStatus, ContactSubmission};
use crate::error::Result;
use crate::projects::model::{Project, ProjectFields};
use crate::store::ContentMap;

/// Page content row
#[derive(Debug, Clone, FromRow)]
pub struct PageContentRow {
    pub slug: String,
    pub content: Json<ContentMap>,
    pub updated_at: DateTime<Utc>,
}

/// Project row. Editable fields live in the `data` JSONB column; the view
/// counter has its own column so it can be incremented in place.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub slug: String,
    pub views: i64,
    pub data: Json<ProjectFields>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            slug: row.slug,
            views: row.views,
            fields: row.data.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Contact submission row
#[derive(Debug, Clone, FromRow)]
pub struct ContactRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub attachment_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for ContactSubmission {
    type Error = crate::error::AppError;

    fn try_from(row: ContactRow) -> Result<Self> {
        Ok(ContactSubmission {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            subject: row.subject,
            message: row.message,
            attachment_url: row.attachment_url,
            status: row.status.parse::<ContactStatus>()?,
            created_at: row.created_at,
        })
    }
}

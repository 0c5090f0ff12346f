//! Storage contracts.
//!
//! Every read and write of page content, projects and contact submissions
//! goes through these traits. Implementations: [`memory::MemoryStore`]
//! (in-process, used without a database and in tests) and
//! [`postgres::PgStore`].

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::contacts::model::{ContactStatus, ContactSubmission};
use crate::error::{AppError, Result};
use crate::projects::model::Project;

pub mod memory;
pub mod postgres;

/// Raw page content document, keyed by field name.
pub type ContentMap = Map<String, Value>;

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_content(&self, slug: &str) -> Result<Option<ContentMap>>;

    /// Replaces the whole document for `slug` in one write.
    async fn put_content(&self, slug: &str, content: &ContentMap) -> Result<()>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>>;
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>>;
    async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>>;

    /// Fails with [`AppError::Conflict`] if the slug is taken.
    async fn insert_project(&self, project: &Project) -> Result<()>;

    /// Writes slug, fields and `updated_at`. The stored view count is left
    /// alone so concurrent increments are never overwritten. Returns the
    /// stored project, or `None` if the id is unknown.
    async fn replace_project(&self, project: &Project) -> Result<Option<Project>>;

    async fn delete_project(&self, id: Uuid) -> Result<bool>;

    /// Atomically adds one to the view counter.
    async fn increment_project_views(&self, id: Uuid) -> Result<Option<Project>>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn list_contacts(&self) -> Result<Vec<ContactSubmission>>;
    async fn get_contact(&self, id: Uuid) -> Result<Option<ContactSubmission>>;
    async fn insert_contact(&self, contact: &ContactSubmission) -> Result<()>;
    async fn set_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<Option<ContactSubmission>>;
    async fn delete_contact(&self, id: Uuid) -> Result<bool>;
}

/// Everything the service needs from its backing store.
#[async_trait]
pub trait Store: ContentStore + ProjectStore + ContactStore {
    /// Short backend name for health output.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<Duration>;
}

/// Bounds a store call. An elapsed deadline becomes [`AppError::Timeout`].
pub async fn timed<T, F>(limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(limit)),
    }
}

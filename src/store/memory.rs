//! In-process store. Used when no `DATABASE_URL` is configured and by the
//! test suite. Each collection sits behind its own lock; every mutation
//! happens under a single write guard, which makes it atomic.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContactStore, ContentMap, ContentStore, ProjectStore, Store};
use crate::contacts::model::{ContactStatus, ContactSubmission};
use crate::error::{AppError, Result};
use crate::projects::model::Project;

#[derive(Debug, Default)]
pub struct MemoryStore {
    content: RwLock<HashMap<String, ContentMap>>,
    projects: RwLock<HashMap<Uuid, Project>>,
    contacts: RwLock<HashMap<Uuid, ContactSubmission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slug_taken(projects: &HashMap<Uuid, Project>, slug: &str, except: Option<Uuid>) -> bool {
    projects
        .values()
        .any(|p| p.slug == slug && Some(p.id) != except)
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get_content(&self, slug: &str) -> Result<Option<ContentMap>> {
        Ok(self.content.read().await.get(slug).cloned())
    }

    async fn put_content(&self, slug: &str, content: &ContentMap) -> Result<()> {
        self.content
            .write()
            .await
            .insert(slug.to_string(), content.clone());
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.read().await.values().cloned().collect())
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        Ok(self
            .projects
            .read()
            .await
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn insert_project(&self, project: &Project) -> Result<()> {
        let mut projects = self.projects.write().await;
        if slug_taken(&projects, &project.slug, None) {
            return Err(AppError::Conflict(format!(
                "Slug '{}' already exists",
                project.slug
            )));
        }
        projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn replace_project(&self, project: &Project) -> Result<Option<Project>> {
        let mut projects = self.projects.write().await;
        if !projects.contains_key(&project.id) {
            return Ok(None);
        }
        if slug_taken(&projects, &project.slug, Some(project.id)) {
            return Err(AppError::Conflict(format!(
                "Slug '{}' already exists",
                project.slug
            )));
        }
        let stored = match projects.get_mut(&project.id) {
            Some(stored) => stored,
            None => return Ok(None),
        };
        stored.slug = project.slug.clone();
        stored.fields = project.fields.clone();
        stored.updated_at = project.updated_at;
        Ok(Some(stored.clone()))
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool> {
        Ok(self.projects.write().await.remove(&id).is_some())
    }

    async fn increment_project_views(&self, id: Uuid) -> Result<Option<Project>> {
        let mut projects = self.projects.write().await;
        Ok(projects.get_mut(&id).map(|project| {
            project.views += 1;
            project.clone()
        }))
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn list_contacts(&self) -> Result<Vec<ContactSubmission>> {
        Ok(self.contacts.read().await.values().cloned().collect())
    }

    async fn get_contact(&self, id: Uuid) -> Result<Option<ContactSubmission>> {
        Ok(self.contacts.read().await.get(&id).cloned())
    }

    async fn insert_contact(&self, contact: &ContactSubmission) -> Result<()> {
        self.contacts
            .write()
            .await
            .insert(contact.id, contact.clone());
        Ok(())
    }

    async fn set_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<Option<ContactSubmission>> {
        let mut contacts = self.contacts.write().await;
        Ok(contacts.get_mut(&id).map(|contact| {
            contact.status = status;
            contact.clone()
        }))
    }

    async fn delete_contact(&self, id: Uuid) -> Result<bool> {
        Ok(self.contacts.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<Duration> {
        let start = Instant::now();
        let _guard = self.projects.read().await;
        Ok(start.elapsed())
    }
}

pub mod model;
pub mod slug;

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::store::{timed, Store};
use model::{Project, ProjectFields, ProjectPatch};
use slug::{is_valid_slug, slugify};

/// CRUD over portfolio projects.
///
/// Callers that mutate projects are responsible for invalidating cached
/// listings afterwards (see [`crate::revalidate::Revalidation`]).
pub struct ProjectRepository {
    store: Arc<dyn Store>,
    timeout: Duration,
}

impl ProjectRepository {
    pub fn new(store: Arc<dyn Store>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// All projects, newest first.
    pub async fn list(&self) -> Result<Vec<Project>> {
        let mut projects = timed(self.timeout, self.store.list_projects()).await?;
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Project>> {
        timed(self.timeout, self.store.get_project(id)).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        if !is_valid_slug(slug) {
            return Ok(None);
        }
        timed(self.timeout, self.store.get_project_by_slug(slug)).await
    }

    pub async fn create(&self, mut fields: ProjectFields) -> Result<Project> {
        fields.normalize();
        fields.validate()?;

        let slug = slugify(&fields.title);
        if slug.is_empty() {
            return Err(AppError::validation(
                "Title must contain at least one letter or digit",
            ));
        }
        self.ensure_slug_free(&slug, None).await?;

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            slug,
            views: 0,
            fields,
            created_at: now,
            updated_at: now,
        };
        timed(self.timeout, self.store.insert_project(&project)).await?;

        tracing::info!(id = %project.id, slug = %project.slug, "project created");
        Ok(project)
    }

    /// Applies `patch` to the stored project. The slug only changes when the
    /// patch names one explicitly; retitling keeps public URLs stable.
    pub async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Option<Project>> {
        let mut project = match self.get_by_id(id).await? {
            Some(project) => project,
            None => return Ok(None),
        };

        if let Some(requested) = patch.slug.as_deref() {
            let requested = requested.trim();
            if !is_valid_slug(requested) {
                return Err(AppError::validation(
                    "Slug must contain only lowercase letters, numbers, and hyphens",
                ));
            }
            if requested != project.slug {
                self.ensure_slug_free(requested, Some(id)).await?;
                project.slug = requested.to_string();
            }
        }

        patch.apply(&mut project.fields);
        project.fields.normalize();
        project.fields.validate()?;
        project.updated_at = Utc::now();

        let stored = timed(self.timeout, self.store.replace_project(&project)).await?;
        if let Some(p) = &stored {
            tracing::info!(id = %p.id, slug = %p.slug, "project updated");
        }
        Ok(stored)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let deleted = timed(self.timeout, self.store.delete_project(id)).await?;
        if deleted {
            tracing::info!(id = %id, "project deleted");
        }
        Ok(deleted)
    }

    /// Adds one view. The increment happens inside the store, so concurrent
    /// callers never overwrite each other.
    pub async fn increment_view(&self, id: Uuid) -> Result<Option<Project>> {
        timed(self.timeout, self.store.increment_project_views(id)).await
    }

    async fn ensure_slug_free(&self, slug: &str, owner: Option<Uuid>) -> Result<()> {
        let existing = timed(self.timeout, self.store.get_project_by_slug(slug)).await?;
        match existing {
            Some(p) if Some(p.id) != owner => Err(AppError::Conflict(format!(
                "A project with slug '{slug}' already exists"
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use model::{Category, DemoType};
    use serde_json::json;

    fn repo() -> ProjectRepository {
        ProjectRepository::new(Arc::new(MemoryStore::new()), Duration::from_secs(1))
    }

    fn fields(title: &str) -> ProjectFields {
        let mut f = ProjectFields::new(title);
        f.description = format!("About {title}");
        f.categories = vec![Category::WebApp];
        f
    }

    #[tokio::test]
    async fn test_create_then_get_by_slug_round_trips() {
        let repo = repo();
        let created = repo.create(fields("Fleet Tracker")).await.unwrap();
        assert_eq!(created.slug, "fleet-tracker");
        assert_eq!(created.views, 0);

        let found = repo.get_by_slug(&created.slug).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(repo.get_by_id(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_create_rejects_slug_collision() {
        let repo = repo();
        repo.create(fields("Fleet Tracker")).await.unwrap();
        let err = repo.create(fields("fleet   tracker!")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_and_unsluggable_titles() {
        let repo = repo();
        assert!(matches!(
            repo.create(fields("   ")).await.unwrap_err(),
            AppError::Validation(_)
        ));
        assert!(matches!(
            repo.create(fields("!!!")).await.unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_update_changes_only_named_field() {
        let repo = repo();
        let created = repo.create(fields("Chat Assistant")).await.unwrap();

        let patch: ProjectPatch = serde_json::from_value(json!({"featured": true})).unwrap();
        let updated = repo.update(created.id, patch).await.unwrap().unwrap();
        assert!(updated.fields.featured);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert!(fetched.fields.featured);
        assert_eq!(fetched.fields.title, created.fields.title);
        assert_eq!(fetched.fields.description, created.fields.description);
        assert_eq!(fetched.fields.categories, created.fields.categories);
        assert_eq!(fetched.slug, created.slug);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_retitle_keeps_slug_but_explicit_slug_moves_it() {
        let repo = repo();
        let created = repo.create(fields("Old Name")).await.unwrap();

        let retitled = repo
            .update(
                created.id,
                ProjectPatch {
                    title: Some("New Name".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retitled.slug, "old-name");

        let moved = repo
            .update(
                created.id,
                ProjectPatch {
                    slug: Some("new-name".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.slug, "new-name");
        assert!(repo.get_by_slug("old-name").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_slug_conflict_and_invalid() {
        let repo = repo();
        repo.create(fields("Taken")).await.unwrap();
        let other = repo.create(fields("Other")).await.unwrap();

        let conflict = repo
            .update(
                other.id,
                ProjectPatch {
                    slug: Some("taken".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(conflict, AppError::Conflict(_)));

        let invalid = repo
            .update(
                other.id,
                ProjectPatch {
                    slug: Some("Not Valid".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(invalid, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_none() {
        let repo = repo();
        let result = repo
            .update(
                Uuid::new_v4(),
                ProjectPatch {
                    featured: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_inconsistent_demo() {
        let repo = repo();
        let created = repo.create(fields("Demo App")).await.unwrap();
        let err = repo
            .update(
                created.id,
                ProjectPatch {
                    demo_type: Some(DemoType::Testflight),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let unchanged = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(unchanged.fields.demo_type, DemoType::None);
    }

    #[tokio::test]
    async fn test_delete_then_get_and_second_delete() {
        let repo = repo();
        let created = repo.create(fields("Short Lived")).await.unwrap();
        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(!repo.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_increments_from_ten_reach_twelve() {
        let store = Arc::new(MemoryStore::new());
        let repo = Arc::new(ProjectRepository::new(store, Duration::from_secs(1)));
        let created = repo.create(fields("Popular")).await.unwrap();
        for _ in 0..10 {
            repo.increment_view(created.id).await.unwrap();
        }

        let (a, b) = tokio::join!(
            repo.increment_view(created.id),
            repo.increment_view(created.id)
        );
        let mut seen = vec![a.unwrap().unwrap().views, b.unwrap().unwrap().views];
        seen.sort();
        assert_eq!(seen, vec![11, 12]);
        assert_eq!(repo.get_by_id(created.id).await.unwrap().unwrap().views, 12);
    }

    #[tokio::test]
    async fn test_increment_unknown_is_none() {
        let repo = repo();
        assert!(repo.increment_view(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = repo();
        let first = repo.create(fields("First")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = repo.create(fields("Second")).await.unwrap();
        let ids: Vec<Uuid> = repo.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_get_by_malformed_slug_is_none() {
        let repo = repo();
        assert!(repo.get_by_slug("../etc").await.unwrap().is_none());
    }
}

use std::sync::Arc;

use crate::blob::BlobStore;
use crate::config::{AppConfig, AuthConfig};
use crate::contacts::ContactRepository;
use crate::content::ContentAdapter;
use crate::notify::ContactNotifier;
use crate::projects::ProjectRepository;
use crate::revalidate::Revalidation;
use crate::store::Store;

/// Shared handles passed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub content: Arc<ContentAdapter>,
    pub projects: Arc<ProjectRepository>,
    pub contacts: Arc<ContactRepository>,
    pub revalidation: Arc<Revalidation>,
    pub blobs: Arc<BlobStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn Store>,
        notifier: Arc<dyn ContactNotifier>,
        revalidation: Revalidation,
    ) -> Self {
        let timeout = config.store_timeout;
        let blobs = BlobStore::new(config.upload_dir.clone(), config.public_base_url.clone());

        Self {
            content: Arc::new(ContentAdapter::new(store.clone(), timeout)),
            projects: Arc::new(ProjectRepository::new(store.clone(), timeout)),
            contacts: Arc::new(ContactRepository::new(store.clone(), notifier, timeout)),
            revalidation: Arc::new(revalidation),
            blobs: Arc::new(blobs),
            config: Arc::new(config),
            store,
        }
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.config.auth
    }
}

pub mod export;
pub mod model;

use std::{sync::Arc, time::Duration};

use uuid::Uuid;

use crate::error::Result;
use crate::notify::{self, ContactNotifier};
use crate::store::{timed, Store};
use model::{ContactStatus, ContactSubmission, NewContact};

/// CRUD over inbound contact-form submissions.
pub struct ContactRepository {
    store: Arc<dyn Store>,
    notifier: Arc<dyn ContactNotifier>,
    timeout: Duration,
}

impl ContactRepository {
    pub fn new(
        store: Arc<dyn Store>,
        notifier: Arc<dyn ContactNotifier>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            notifier,
            timeout,
        }
    }

    /// All submissions, newest first.
    pub async fn list(&self) -> Result<Vec<ContactSubmission>> {
        let mut contacts = timed(self.timeout, self.store.list_contacts()).await?;
        contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(contacts)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<ContactSubmission>> {
        timed(self.timeout, self.store.get_contact(id)).await
    }

    /// Validates and stores a submission, then fires the notification.
    pub async fn create(&self, input: NewContact) -> Result<ContactSubmission> {
        input.validate()?;
        let submission = input.into_submission();
        timed(self.timeout, self.store.insert_contact(&submission)).await?;

        tracing::info!(id = %submission.id, "contact submission stored");
        notify::dispatch(self.notifier.clone(), submission.clone());
        Ok(submission)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<Option<ContactSubmission>> {
        timed(self.timeout, self.store.set_contact_status(id, status)).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let deleted = timed(self.timeout, self.store.delete_contact(id)).await?;
        if deleted {
            tracing::info!(id = %id, "contact submission deleted");
        }
        Ok(deleted)
    }
}

//! Outbound notification for new contact submissions.
//!
//! Dispatch is fire-and-forget: it runs on its own task and a failure is
//! only logged. The submission itself never depends on it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::contacts::model::ContactSubmission;
use crate::error::{AppError, Result};

#[async_trait]
pub trait ContactNotifier: Send + Sync {
    async fn notify(&self, submission: &ContactSubmission) -> Result<()>;
}

/// Used when no webhook is configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl ContactNotifier for LogNotifier {
    async fn notify(&self, submission: &ContactSubmission) -> Result<()> {
        tracing::info!(
            id = %submission.id,
            subject = %submission.subject,
            "new contact submission (no notification webhook configured)"
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationPayload<'a> {
    kind: &'static str,
    submission: &'a ContactSubmission,
}

/// Posts the submission as JSON to a mail relay webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ContactNotifier for WebhookNotifier {
    async fn notify(&self, submission: &ContactSubmission) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&NotificationPayload {
                kind: "contact_submission",
                submission,
            })
            .send()
            .await
            .map_err(|e| AppError::Store(format!("notification request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Store(format!(
                "notification webhook returned {status}"
            )));
        }
        Ok(())
    }
}

/// Spawns the notification and returns immediately.
pub fn dispatch(notifier: Arc<dyn ContactNotifier>, submission: ContactSubmission) {
    tokio::spawn(async move {
        match notifier.notify(&submission).await {
            Ok(()) => tracing::debug!(id = %submission.id, "contact notification sent"),
            Err(e) => tracing::warn!(
                id = %submission.id,
                error = %e,
                "contact notification failed"
            ),
        }
    });
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tokio::sync::Mutex;

    /// Records every submission it is asked to notify about.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        pub seen: Mutex<Vec<ContactSubmission>>,
    }

    #[async_trait]
    impl ContactNotifier for RecordingNotifier {
        async fn notify(&self, submission: &ContactSubmission) -> Result<()> {
            self.seen.lock().await.push(submission.clone());
            Ok(())
        }
    }

    /// Always fails.
    #[derive(Debug, Default)]
    pub struct FailingNotifier;

    #[async_trait]
    impl ContactNotifier for FailingNotifier {
        async fn notify(&self, _submission: &ContactSubmission) -> Result<()> {
            Err(AppError::Store("smtp relay down".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;
    use crate::contacts::model::NewContact;
    use std::time::Duration;

    fn submission() -> ContactSubmission {
        NewContact {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            phone: "555".into(),
            subject: "Hi".into(),
            message: "Hello".into(),
            attachment_url: None,
        }
        .into_submission()
    }

    #[tokio::test]
    async fn test_dispatch_runs_in_background() {
        let notifier = Arc::new(RecordingNotifier::default());
        let sub = submission();
        dispatch(notifier.clone(), sub.clone());

        for _ in 0..50 {
            if !notifier.seen.lock().await.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(notifier.seen.lock().await.as_slice(), &[sub]);
    }

    #[tokio::test]
    async fn test_log_notifier_succeeds() {
        assert!(LogNotifier.notify(&submission()).await.is_ok());
    }

    #[tokio::test]
    async fn test_webhook_to_unreachable_host_is_an_error() {
        let notifier = WebhookNotifier::new(reqwest::Client::new(), "http://127.0.0.1:9/hook");
        assert!(notifier.notify(&submission()).await.is_err());
    }
}

//! Frontend revalidation after content or project writes.
//!
//! The store is read on every request, so nothing here caches data. When a
//! hook is configured the site frontend is told which rendered paths to
//! rebuild.

use serde::Serialize;

use crate::content::PageSlug;

#[derive(Debug, Serialize)]
struct RevalidateRequest<'a> {
    paths: &'a [String],
}

/// Asks the frontend to rebuild rendered paths.
#[derive(Debug, Clone)]
pub struct Revalidator {
    client: reqwest::Client,
    url: String,
    secret: Option<String>,
}

impl Revalidator {
    pub fn new(client: reqwest::Client, url: impl Into<String>, secret: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            secret,
        }
    }

    async fn send(&self, paths: &[String]) -> std::result::Result<(), reqwest::Error> {
        let mut request = self.client.post(&self.url).json(&RevalidateRequest { paths });
        if let Some(secret) = &self.secret {
            request = request.header("x-revalidate-secret", secret);
        }
        request.send().await?.error_for_status()?;
        Ok(())
    }
}

/// Entry point handlers call after a successful write.
#[derive(Debug, Default)]
pub struct Revalidation {
    hook: Option<Revalidator>,
}

impl Revalidation {
    pub fn new(hook: Option<Revalidator>) -> Self {
        Self { hook }
    }

    /// Paths showing project data: home (featured), the public list, the
    /// admin list and the detail page of every slug given.
    pub fn project_paths(slugs: &[&str]) -> Vec<String> {
        let mut paths: Vec<String> = ["/", "/projects", "/admin/projects"]
            .iter()
            .map(|p| p.to_string())
            .collect();
        for slug in slugs {
            let path = format!("/projects/{slug}");
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    pub fn projects_changed(&self, slugs: &[&str]) {
        self.notify(Self::project_paths(slugs));
    }

    pub fn page_changed(&self, page: PageSlug) {
        self.notify(vec![page.path().to_string()]);
    }

    fn notify(&self, paths: Vec<String>) {
        let Some(hook) = self.hook.clone() else {
            return;
        };
        tokio::spawn(async move {
            match hook.send(&paths).await {
                Ok(()) => tracing::debug!(?paths, "revalidation requested"),
                Err(e) => tracing::warn!(error = %e, ?paths, "revalidation request failed"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_paths() {
        assert_eq!(
            Revalidation::project_paths(&["fleet-tracker"]),
            vec!["/", "/projects", "/admin/projects", "/projects/fleet-tracker"]
        );
        assert_eq!(Revalidation::project_paths(&[]).len(), 3);
    }

    #[test]
    fn test_renamed_project_purges_both_detail_paths() {
        let paths = Revalidation::project_paths(&["old-name", "new-name"]);
        assert!(paths.contains(&"/projects/old-name".to_string()));
        assert!(paths.contains(&"/projects/new-name".to_string()));

        let unchanged = Revalidation::project_paths(&["same", "same"]);
        assert_eq!(unchanged.len(), 4);
    }

    #[tokio::test]
    async fn test_unreachable_hook_does_not_fail_the_caller() {
        let hook = Revalidator::new(reqwest::Client::new(), "http://127.0.0.1:9/revalidate", None);
        let revalidation = Revalidation::new(Some(hook));
        revalidation.page_changed(PageSlug::About);
        revalidation.projects_changed(&[]);
    }
}

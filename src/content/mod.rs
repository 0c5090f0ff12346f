//! Page content adapter: get and merge-update of the free-form content
//! document behind each marketing page.

pub mod schema;

use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::store::{timed, ContentMap, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageSlug {
    Home,
    About,
    Contact,
    WhatIOffer,
}

impl PageSlug {
    pub const ALL: [PageSlug; 4] = [
        PageSlug::Home,
        PageSlug::About,
        PageSlug::Contact,
        PageSlug::WhatIOffer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PageSlug::Home => "home",
            PageSlug::About => "about",
            PageSlug::Contact => "contact",
            PageSlug::WhatIOffer => "what-i-offer",
        }
    }

    /// Public path of the rendered page.
    pub fn path(self) -> &'static str {
        match self {
            PageSlug::Home => "/",
            PageSlug::About => "/about",
            PageSlug::Contact => "/contact",
            PageSlug::WhatIOffer => "/what-i-offer",
        }
    }
}

impl fmt::Display for PageSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageSlug {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        PageSlug::ALL
            .into_iter()
            .find(|slug| slug.as_str() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = PageSlug::ALL.iter().map(|s| s.as_str()).collect();
                AppError::validation(format!(
                    "Invalid slug. Valid slugs: {}",
                    valid.join(", ")
                ))
            })
    }
}

pub struct ContentAdapter {
    store: Arc<dyn Store>,
    timeout: Duration,
}

impl ContentAdapter {
    pub fn new(store: Arc<dyn Store>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Stored content in canonical shape, or `None` if the page was never
    /// saved. Legacy fields that cannot be normalized are skipped.
    pub async fn get(&self, slug: PageSlug) -> Result<Option<ContentMap>> {
        let stored = timed(self.timeout, self.store.get_content(slug.as_str())).await?;
        Ok(stored.map(|content| {
            let (content, errors) = schema::normalize(slug, content);
            for err in errors {
                tracing::warn!(page = %slug, field = %err.field, reason = %err.reason,
                    "skipping stored content field that cannot be normalized");
            }
            content
        }))
    }

    /// Stored content layered over the page defaults.
    pub async fn get_or_default(&self, slug: PageSlug) -> Result<ContentMap> {
        let mut content = slug.defaults();
        if let Some(stored) = self.get(slug).await? {
            content.extend(stored);
        }
        Ok(content)
    }

    /// Merges `partial` into the stored document: keys in `partial` replace
    /// stored ones, everything else is retained. The merged document is
    /// validated before the single write, so a rejected call leaves the
    /// previous content untouched.
    pub async fn set(&self, slug: PageSlug, partial: Value) -> Result<ContentMap> {
        let partial = match partial {
            Value::Object(map) => map,
            _ => return Err(AppError::validation("content must be a JSON object")),
        };

        let mut merged = timed(self.timeout, self.store.get_content(slug.as_str()))
            .await?
            .unwrap_or_default();

        // Legacy stored fields that no longer normalize are dropped unless
        // the partial replaces them.
        let (existing, stale) = schema::normalize(slug, std::mem::take(&mut merged));
        for err in &stale {
            if !partial.contains_key(&err.field) {
                tracing::warn!(page = %slug, field = %err.field, "dropping stale content field");
            }
        }
        merged = existing;
        merged.extend(partial);

        let (normalized, errors) = schema::normalize(slug, merged);
        if !errors.is_empty() {
            let detail: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Err(AppError::validation(format!(
                "Invalid content: {}",
                detail.join("; ")
            )));
        }

        timed(
            self.timeout,
            self.store.put_content(slug.as_str(), &normalized),
        )
        .await?;
        tracing::info!(page = %slug, fields = normalized.len(), "page content updated");
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::ContentStore;
    use serde_json::json;

    fn adapter() -> (Arc<MemoryStore>, ContentAdapter) {
        let store = Arc::new(MemoryStore::new());
        let adapter = ContentAdapter::new(store.clone(), Duration::from_secs(1));
        (store, adapter)
    }

    #[test]
    fn test_slug_parsing() {
        assert_eq!("what-i-offer".parse::<PageSlug>().unwrap(), PageSlug::WhatIOffer);
        assert_eq!(" About ".parse::<PageSlug>().unwrap(), PageSlug::About);
        assert!("blog".parse::<PageSlug>().is_err());
        assert_eq!(PageSlug::Home.to_string(), "home");
    }

    #[tokio::test]
    async fn test_get_unsaved_page_is_none() {
        let (_, adapter) = adapter();
        assert!(adapter.get(PageSlug::About).await.unwrap().is_none());
        let with_defaults = adapter.get_or_default(PageSlug::About).await.unwrap();
        assert_eq!(with_defaults["skills"], json!([]));
    }

    #[tokio::test]
    async fn test_set_merges_instead_of_replacing() {
        let (_, adapter) = adapter();
        adapter
            .set(PageSlug::Home, json!({"heroTitle": "Hi", "heroSubtitle": "There"}))
            .await
            .unwrap();
        adapter
            .set(PageSlug::Home, json!({"heroTitle": "Hello"}))
            .await
            .unwrap();

        let content = adapter.get(PageSlug::Home).await.unwrap().unwrap();
        assert_eq!(content["heroTitle"], json!("Hello"));
        assert_eq!(content["heroSubtitle"], json!("There"));
    }

    #[tokio::test]
    async fn test_rejected_set_leaves_content_untouched() {
        let (store, adapter) = adapter();
        adapter
            .set(PageSlug::About, json!({"bio": "Original", "skills": ["Rust"]}))
            .await
            .unwrap();

        let err = adapter
            .set(PageSlug::About, json!({"bio": "Changed", "experience": "oops"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let stored = store.get_content("about").await.unwrap().unwrap();
        assert_eq!(stored["bio"], json!("Original"));
        assert!(!stored.contains_key("experience"));
    }

    #[tokio::test]
    async fn test_set_rejects_non_object() {
        let (_, adapter) = adapter();
        let err = adapter.set(PageSlug::Contact, json!(["x"])).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_legacy_string_content_is_migrated_on_read() {
        let (store, adapter) = adapter();
        let mut legacy = ContentMap::new();
        legacy.insert("skills".into(), json!("Rust, Go"));
        legacy.insert("experience".into(), json!("not a list"));
        store.put_content("about", &legacy).await.unwrap();

        let content = adapter.get(PageSlug::About).await.unwrap().unwrap();
        assert_eq!(content["skills"], json!(["Rust", "Go"]));
        assert!(!content.contains_key("experience"));
    }

    #[tokio::test]
    async fn test_concurrent_sets_on_different_pages() {
        let (_, adapter) = adapter();
        let adapter = Arc::new(adapter);
        let a = {
            let adapter = adapter.clone();
            tokio::spawn(async move {
                adapter
                    .set(PageSlug::Home, json!({"heroTitle": "A"}))
                    .await
            })
        };
        let b = {
            let adapter = adapter.clone();
            tokio::spawn(async move { adapter.set(PageSlug::About, json!({"bio": "B"})).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert_eq!(adapter.get(PageSlug::Home).await.unwrap().unwrap()["heroTitle"], json!("A"));
        assert_eq!(adapter.get(PageSlug::About).await.unwrap().unwrap()["bio"], json!("B"));
    }
}

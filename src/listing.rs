//! Search, category filter and pagination over an in-memory list.
//!
//! Pure functions: the same input always yields the same page. Used by the
//! list endpoints and mirrored by [`ListState`] for admin list screens.

use serde::{Deserialize, Serialize};

use crate::contacts::model::ContactSubmission;
use crate::projects::model::Project;

pub const DEFAULT_PAGE_SIZE: usize = 15;
pub const MAX_PAGE_SIZE: usize = 100;

/// Category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "all";

/// Something that can be searched and bucketed.
pub trait Listable {
    /// `needle` is already lowercased and non-empty.
    fn matches_search(&self, needle: &str) -> bool;

    fn in_category(&self, category: &str) -> bool;
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Listable for Project {
    fn matches_search(&self, needle: &str) -> bool {
        contains_ci(&self.fields.title, needle) || contains_ci(&self.fields.description, needle)
    }

    fn in_category(&self, category: &str) -> bool {
        self.fields.categories.iter().any(|c| c.as_str() == category)
    }
}

impl Listable for ContactSubmission {
    fn matches_search(&self, needle: &str) -> bool {
        [
            &self.name,
            &self.email,
            &self.subject,
            &self.message,
        ]
        .iter()
        .any(|field| contains_ci(field, needle))
    }

    /// Contacts are bucketed by read status.
    fn in_category(&self, category: &str) -> bool {
        self.status.as_str() == category
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl ListQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    /// Matching items across all pages.
    pub total: usize,
    pub total_pages: usize,
}

/// Items passing both filters, original order kept.
pub fn filter<'a, T: Listable>(items: &'a [T], category: &str, search: &str) -> Vec<&'a T> {
    let category = category.trim();
    let needle = search.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            category.is_empty() || category == ALL_CATEGORIES || item.in_category(category)
        })
        .filter(|item| needle.is_empty() || item.matches_search(&needle))
        .collect()
}

/// Filters, then slices out one page. A page past the end is empty but still
/// reports the real `total_pages`.
pub fn paginate<T: Listable + Clone>(items: &[T], query: &ListQuery) -> Page<T> {
    let matching = filter(
        items,
        query.category.as_deref().unwrap_or(ALL_CATEGORIES),
        query.search.as_deref().unwrap_or_default(),
    );
    let page = query.page();
    let page_size = query.page_size();
    let total = matching.len();
    let total_pages = total.div_ceil(page_size);

    let items = matching
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .cloned()
        .collect();

    Page {
        items,
        page,
        page_size,
        total,
        total_pages,
    }
}

/// Search/filter/page state of an admin list screen. Changing either filter
/// sends the view back to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    search: String,
    category: String,
    page: usize,
    page_size: usize,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListState {
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            search: Some(self.search.clone()),
            category: Some(self.category.clone()),
            page: Some(self.page),
            page_size: Some(self.page_size),
        }
    }

    pub fn apply<T: Listable + Clone>(&self, items: &[T]) -> Page<T> {
        paginate(items, &self.query())
    }
}

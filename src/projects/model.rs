//! Project entity and its create/patch inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::normalize::{de_one_or_many, de_opt_one_or_many, de_opt_string_list, de_string_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    WebApp,
    MobileApp,
    AiTool,
    BusinessTool,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::WebApp => "web-app",
            Category::MobileApp => "mobile-app",
            Category::AiTool => "ai-tool",
            Category::BusinessTool => "business-tool",
            Category::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Live,
    ComingSoon,
    Archived,
}

/// Which kind of demo `demo_url` points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DemoType {
    #[default]
    None,
    Web,
    Video,
    AppStore,
    PlayStore,
    Apk,
    Testflight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub name: String,
    pub file_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image_url: Option<String>,
}

/// Admin-editable project fields. Also the body of `POST /api/projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default, alias = "category", deserialize_with = "de_one_or_many")]
    pub categories: Vec<Category>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub tech_stack: Vec<String>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub features: Vec<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub demo_type: DemoType,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub documents: Vec<ProjectDocument>,
}

impl ProjectFields {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            long_description: String::new(),
            categories: Vec::new(),
            tech_stack: Vec::new(),
            features: Vec::new(),
            thumbnail: None,
            screenshots: Vec::new(),
            demo_type: DemoType::None,
            demo_url: None,
            status: ProjectStatus::Live,
            featured: false,
            documents: Vec::new(),
        }
    }

    /// Trims text, drops empty optionals and fills defaults. Runs before
    /// validation on every write.
    pub fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.long_description = ammonia::clean(&self.long_description);
        self.thumbnail = non_blank(self.thumbnail.take());
        self.demo_url = non_blank(self.demo_url.take());
        if self.demo_type == DemoType::None {
            self.demo_url = None;
        }
        if self.categories.is_empty() {
            self.categories.push(Category::Other);
        }
        let mut seen = Vec::with_capacity(self.categories.len());
        self.categories.retain(|c| {
            if seen.contains(c) {
                false
            } else {
                seen.push(*c);
                true
            }
        });
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        if self.demo_type != DemoType::None && self.demo_url.is_none() {
            return Err(AppError::validation(
                "demoUrl is required when demoType is set",
            ));
        }
        for doc in &self.documents {
            if doc.name.trim().is_empty() || doc.file_url.trim().is_empty() {
                return Err(AppError::validation(
                    "Documents need both a name and a fileUrl",
                ));
            }
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A stored project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub slug: String,
    pub views: i64,
    #[serde(flatten)]
    pub fields: ProjectFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    #[serde(default, alias = "category", deserialize_with = "de_opt_one_or_many")]
    pub categories: Option<Vec<Category>>,
    #[serde(default, deserialize_with = "de_opt_string_list")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default, deserialize_with = "de_opt_string_list")]
    pub features: Option<Vec<String>>,
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string_list")]
    pub screenshots: Option<Vec<String>>,
    pub demo_type: Option<DemoType>,
    pub demo_url: Option<String>,
    pub status: Option<ProjectStatus>,
    pub featured: Option<bool>,
    pub documents: Option<Vec<ProjectDocument>>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.description.is_none()
            && self.long_description.is_none()
            && self.categories.is_none()
            && self.tech_stack.is_none()
            && self.features.is_none()
            && self.thumbnail.is_none()
            && self.screenshots.is_none()
            && self.demo_type.is_none()
            && self.demo_url.is_none()
            && self.status.is_none()
            && self.featured.is_none()
            && self.documents.is_none()
    }

    /// Overlays the patch on `fields`. `slug` is handled by the repository.
    pub fn apply(self, fields: &mut ProjectFields) {
        if let Some(v) = self.title {
            fields.title = v;
        }
        if let Some(v) = self.description {
            fields.description = v;
        }
        if let Some(v) = self.long_description {
            fields.long_description = v;
        }
        if let Some(v) = self.categories {
            fields.categories = v;
        }
        if let Some(v) = self.tech_stack {
            fields.tech_stack = v;
        }
        if let Some(v) = self.features {
            fields.features = v;
        }
        if let Some(v) = self.thumbnail {
            fields.thumbnail = Some(v);
        }
        if let Some(v) = self.screenshots {
            fields.screenshots = v;
        }
        if let Some(v) = self.demo_type {
            fields.demo_type = v;
        }
        if let Some(v) = self.demo_url {
            fields.demo_url = Some(v);
        }
        if let Some(v) = self.status {
            fields.status = v;
        }
        if let Some(v) = self.featured {
            fields.featured = v;
        }
        if let Some(v) = self.documents {
            fields.documents = v;
        }
    }
}

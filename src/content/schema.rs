//! Canonical shape of each page's content document.
//!
//! Fields not named here are opaque and kept as-is.

use serde_json::{json, Value};

use super::PageSlug;
use crate::normalize;
use crate::store::ContentMap;

#[derive(Debug)]
pub struct PageSchema {
    /// Scalar text; numbers and booleans are stored as strings.
    pub text_fields: &'static [&'static str],
    /// Lists of plain strings.
    pub string_lists: &'static [&'static str],
    /// Lists of content blocks (JSON objects).
    pub object_lists: &'static [&'static str],
}

static HOME: PageSchema = PageSchema {
    text_fields: &[
        "heroTitle",
        "heroSubtitle",
        "heroDescription",
        "ctaPrimaryText",
        "ctaPrimaryLink",
        "ctaSecondaryText",
        "ctaSecondaryLink",
        "featuredHeading",
    ],
    string_lists: &["skills", "technologies"],
    object_lists: &["stats", "services", "testimonials"],
};

static ABOUT: PageSchema = PageSchema {
    text_fields: &["name", "title", "bio", "location", "profileImage", "resumeUrl"],
    string_lists: &["skills", "certifications", "languages", "interests"],
    object_lists: &["experience", "education", "timeline"],
};

static CONTACT: PageSchema = PageSchema {
    text_fields: &["heading", "subheading", "email", "phone", "location", "responseTime"],
    string_lists: &["officeHours"],
    object_lists: &["socialLinks", "faqs"],
};

static WHAT_I_OFFER: PageSchema = PageSchema {
    text_fields: &["heading", "subheading", "ctaText", "ctaLink"],
    string_lists: &["process"],
    object_lists: &["services", "packages"],
};

impl PageSlug {
    pub fn schema(self) -> &'static PageSchema {
        match self {
            PageSlug::Home => &HOME,
            PageSlug::About => &ABOUT,
            PageSlug::Contact => &CONTACT,
            PageSlug::WhatIOffer => &WHAT_I_OFFER,
        }
    }

    /// Built-in content served before the admin has saved anything.
    pub fn defaults(self) -> ContentMap {
        let value = match self {
            PageSlug::Home => json!({
                "heroTitle": "Building software that ships",
                "heroSubtitle": "Web, mobile and AI products",
                "heroDescription": "",
                "stats": [],
                "services": [],
                "skills": [],
            }),
            PageSlug::About => json!({
                "name": "",
                "title": "",
                "bio": "",
                "skills": [],
                "certifications": [],
                "experience": [],
            }),
            PageSlug::Contact => json!({
                "heading": "Get in touch",
                "subheading": "",
                "email": "",
                "socialLinks": [],
            }),
            PageSlug::WhatIOffer => json!({
                "heading": "What I offer",
                "subheading": "",
                "services": [],
                "process": [],
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => ContentMap::new(),
        }
    }
}

/// One field that could not be brought into canonical shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Brings every known field of `content` into canonical shape.
///
/// Fields that cannot be converted are left out of the returned document and
/// reported. Writers reject on any error; readers log and serve the rest.
pub fn normalize(slug: PageSlug, content: ContentMap) -> (ContentMap, Vec<FieldError>) {
    let schema = slug.schema();
    let mut out = ContentMap::with_capacity(content.len());
    let mut errors = Vec::new();

    for (field, value) in content {
        let key = field.as_str();
        let converted = if schema.string_lists.contains(&key) {
            normalize::string_list(value).map(|items| {
                Value::Array(items.into_iter().map(Value::String).collect())
            })
        } else if schema.object_lists.contains(&key) {
            normalize::object_list(value).map(Value::Array)
        } else if schema.text_fields.contains(&key) {
            normalize::text(value)
        } else {
            Ok(value)
        };

        match converted {
            Ok(value) => {
                out.insert(field, value);
            }
            Err(reason) => errors.push(FieldError { field, reason }),
        }
    }

    (out, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(value: Value) -> ContentMap {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_about_skills_string_becomes_array() {
        let (out, errors) = normalize(
            PageSlug::About,
            map(json!({
                "skills": "Rust, TypeScript, SQL",
                "certifications": "[\"AWS SA\",\"CKA\"]",
                "bio": "Hello",
            })),
        );
        assert!(errors.is_empty());
        assert_eq!(out["skills"], json!(["Rust", "TypeScript", "SQL"]));
        assert_eq!(out["certifications"], json!(["AWS SA", "CKA"]));
        assert_eq!(out["bio"], json!("Hello"));
    }

    #[test]
    fn test_home_stats_encoded_string_becomes_objects() {
        let stats = json!([{"value": "40+", "label": "Projects"}]);
        let (out, errors) = normalize(
            PageSlug::Home,
            map(json!({ "stats": stats.to_string(), "heroTitle": 2024 })),
        );
        assert!(errors.is_empty());
        assert_eq!(out["stats"], stats);
        assert_eq!(out["heroTitle"], json!("2024"));
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let (out, errors) = normalize(
            PageSlug::Contact,
            map(json!({ "mapEmbed": {"lat": 1.5, "lng": 2.5} })),
        );
        assert!(errors.is_empty());
        assert_eq!(out["mapEmbed"]["lat"], json!(1.5));
    }

    #[test]
    fn test_bad_field_is_reported_and_dropped() {
        let (out, errors) = normalize(
            PageSlug::WhatIOffer,
            map(json!({ "services": "just words", "heading": "Offer" })),
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "services");
        assert!(!out.contains_key("services"));
        assert_eq!(out["heading"], json!("Offer"));
    }

    #[test]
    fn test_defaults_are_already_canonical() {
        for slug in PageSlug::ALL {
            let defaults = slug.defaults();
            assert!(!defaults.is_empty());
            let (out, errors) = normalize(slug, defaults.clone());
            assert!(errors.is_empty(), "{slug:?}: {errors:?}");
            assert_eq!(out, defaults);
        }
    }
}

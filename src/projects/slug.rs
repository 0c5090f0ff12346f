use regex::Regex;

lazy_static::lazy_static! {
    /// Valid slug pattern: lowercase letters, numbers, and single hyphens
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

/// Derives a URL slug from a title: lowercase, every run of non-alphanumeric
/// characters becomes one hyphen, no hyphen at either end.
///
/// Only ASCII alphanumerics survive, so a title made entirely of other
/// characters yields an empty slug.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("My First Project"), "my-first-project");
        assert_eq!(slugify("AI Tool: v2.0!"), "ai-tool-v2-0");
    }

    #[test]
    fn test_slugify_trims_and_collapses() {
        assert_eq!(slugify("  --Hello   World--  "), "hello-world");
        assert_eq!(slugify("a___b"), "a-b");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Crème"), "caf-cr-me");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_slugify_output_shape_over_many_inputs() {
        let titles = [
            "Portfolio Website",
            "  leading space",
            "trailing!!!",
            "UPPER lower 123",
            "emoji 🚀 launch",
            "tabs\tand\nnewlines",
            "---",
            "x",
            "Ünïcödé Tëxt",
            "mixed-_- separators",
        ];
        for title in titles {
            let slug = slugify(title);
            assert_eq!(slug, slugify(title), "deterministic for {title:?}");
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "charset for {title:?}: {slug}"
            );
            assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            assert!(!slug.contains("--"));
            if !slug.is_empty() {
                assert!(is_valid_slug(&slug));
            }
        }
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("hello-world-2"));
        assert!(!is_valid_slug("Hello"));
        assert!(!is_valid_slug("-lead"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug(""));
    }
}

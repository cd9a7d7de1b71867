//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::Link;

/// Custom slugs: lowercase ASCII letters and digits only.
static SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").unwrap());

/// Request to create a short link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Destination URL (absolute HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub original_url: String,

    /// Optional custom slug. Generated from the URL when absent.
    #[validate(regex(
        path = *SLUG_REGEX,
        message = "Slug must contain only lowercase letters and digits"
    ))]
    pub slug: Option<String>,
}

/// JSON representation of a stored link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub slug: String,
    pub original_url: String,
    pub short_url: String,
    pub visits: i64,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            slug: link.slug,
            original_url: link.original_url,
            short_url,
            visits: link.visits,
            created_at: link.created_at,
        }
    }
}

/// Destination of a resolved slug.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub original_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str, slug: Option<&str>) -> CreateLinkRequest {
        CreateLinkRequest {
            original_url: url.to_string(),
            slug: slug.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("https://example.com", None).validate().is_ok());
        assert!(request("https://example.com", Some("promo2025")).validate().is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let errors = request("not a url", None).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("original_url"));
    }

    #[test]
    fn test_invalid_slug_characters() {
        for slug in ["", "Promo", "my-link", "my_link", "café"] {
            let errors = request("https://example.com", Some(slug))
                .validate()
                .unwrap_err();
            assert!(errors.field_errors().contains_key("slug"), "slug {slug:?}");
        }
    }

    #[test]
    fn test_missing_slug_deserializes_as_none() {
        let req: CreateLinkRequest =
            serde_json::from_str(r#"{"original_url": "https://example.com"}"#).unwrap();
        assert!(req.slug.is_none());
    }
}

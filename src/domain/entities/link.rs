//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened link as persisted by the link store.
///
/// `id` is an internal surrogate key and never leaves the process; every
/// external surface addresses links by `slug`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub slug: String,
    pub original_url: String,
    pub visits: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        slug: String,
        original_url: String,
        visits: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            slug,
            original_url,
            visits,
            created_at,
        }
    }
}

/// Input data for creating a new link.
///
/// Visits always start at zero and `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub slug: String,
    pub original_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            0,
            now,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.slug, "abc123");
        assert_eq!(link.original_url, "https://example.com");
        assert_eq!(link.visits, 0);
        assert_eq!(link.created_at, now);
    }

    #[test]
    fn test_new_link_creation() {
        let new_link = NewLink {
            slug: "xyz789".to_string(),
            original_url: "https://rust-lang.org".to_string(),
        };

        assert_eq!(new_link.slug, "xyz789");
        assert_eq!(new_link.original_url, "https://rust-lang.org");
    }
}

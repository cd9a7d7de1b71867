//! Repository trait for link data access.

use crate::domain::entities::{Link, NewLink};
use async_trait::async_trait;
use serde::Deserialize;

/// Errors reported by a link store.
///
/// Uniqueness violations are kept distinct so callers can tell a taken slug
/// apart from a store that is unreachable or misbehaving.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("link store unavailable: {0}")]
    Unavailable(String),
}

/// Column a link listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    Visits,
}

impl SortField {
    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Visits => "visits",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Explicit ordering for a listing. Without one, links come back newest first
/// (descending `id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Filter criteria for link listings.
///
/// `search` is matched case-insensitively as a literal substring of
/// `original_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFilter {
    pub search: Option<String>,
    pub sort: Option<LinkSort>,
    pub offset: i64,
    pub limit: i64,
}

impl LinkFilter {
    /// Creates a new filter with pagination parameters.
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            search: None,
            sort: None,
            offset,
            limit,
        }
    }

    /// Adds a substring search on the destination URL. Blank terms are ignored.
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search.filter(|s| !s.trim().is_empty());
        self
    }

    /// Adds explicit ordering.
    pub fn with_sort(mut self, sort: Option<LinkSort>) -> Self {
        self.sort = sort;
        self
    }
}

/// Repository interface for managing shortened links.
///
/// The store owns slug uniqueness: concurrent inserts of the same slug must
/// produce exactly one success and one [`StoreError::UniqueViolation`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with zero visits.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] if the slug already exists.
    /// Returns [`StoreError::Unavailable`] on any other store failure.
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Finds a link by its slug.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, StoreError>;

    /// Atomically adds one to the visit counter.
    ///
    /// Returns `Ok(false)` without touching anything when the slug does not
    /// exist.
    async fn increment_visits(&self, slug: &str) -> Result<bool, StoreError>;

    /// Removes a link permanently.
    ///
    /// Returns `Ok(true)` if a link was removed, `Ok(false)` if none matched.
    async fn delete_by_slug(&self, slug: &str) -> Result<bool, StoreError>;

    /// Lists one page of links matching the filter.
    async fn list(&self, filter: LinkFilter) -> Result<Vec<Link>, StoreError>;

    /// Counts links matching the search term, ignoring pagination.
    async fn count(&self, search: Option<String>) -> Result<i64, StoreError>;

    /// Returns up to `limit` links with `id > after_id`, in ascending `id` order.
    ///
    /// Used to walk the whole table in bounded batches.
    async fn scan(
        &self,
        search: Option<String>,
        after_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Link>, StoreError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_ignores_blank_search() {
        let filter = LinkFilter::new(0, 20).with_search(Some("   ".to_string()));
        assert!(filter.search.is_none());

        let filter = LinkFilter::new(0, 20).with_search(Some("example".to_string()));
        assert_eq!(filter.search.as_deref(), Some("example"));
    }

    #[test]
    fn test_sort_deserializes_from_snake_case() {
        let field: SortField = serde_json::from_str(r#""created_at""#).unwrap();
        assert_eq!(field, SortField::CreatedAt);

        let direction: SortDirection = serde_json::from_str(r#""asc""#).unwrap();
        assert_eq!(direction, SortDirection::Asc);

        assert!(serde_json::from_str::<SortField>(r#""slug""#).is_err());
    }

    #[test]
    fn test_sort_sql_fragments() {
        assert_eq!(SortField::Visits.column(), "visits");
        assert_eq!(SortDirection::default().keyword(), "DESC");
    }
}

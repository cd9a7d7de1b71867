//! Process-local link repository.
//!
//! Holds links in memory behind a single lock. Data is lost on restart; useful
//! for local development (`LINK_STORE=memory`) and tests.

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{
    LinkFilter, LinkRepository, LinkSort, SortDirection, SortField, StoreError,
};
use crate::utils::db_error::SLUG_UNIQUE_CONSTRAINT;

#[derive(Default)]
struct Tables {
    next_id: i64,
    links: BTreeMap<i64, Link>,
    ids_by_slug: HashMap<String, i64>,
}

/// In-memory link store with the same uniqueness and ordering rules as
/// [`super::PgLinkRepository`].
#[derive(Default)]
pub struct InMemoryLinkRepository {
    tables: RwLock<Tables>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(link: &Link, search: Option<&str>) -> bool {
    match search {
        Some(term) => link
            .original_url
            .to_lowercase()
            .contains(&term.to_lowercase()),
        None => true,
    }
}

fn compare(a: &Link, b: &Link, sort: Option<LinkSort>) -> Ordering {
    let by_id_desc = b.id.cmp(&a.id);

    let Some(sort) = sort else {
        return by_id_desc;
    };

    let ordering = match sort.field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Visits => a.visits.cmp(&b.visits),
    };
    let ordering = match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };

    ordering.then(by_id_desc)
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.ids_by_slug.contains_key(&new_link.slug) {
            return Err(StoreError::UniqueViolation {
                constraint: SLUG_UNIQUE_CONSTRAINT.to_string(),
            });
        }

        tables.next_id += 1;
        let link = Link::new(
            tables.next_id,
            new_link.slug,
            new_link.original_url,
            0,
            Utc::now(),
        );

        tables.ids_by_slug.insert(link.slug.clone(), link.id);
        tables.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .ids_by_slug
            .get(slug)
            .and_then(|id| tables.links.get(id))
            .cloned())
    }

    async fn increment_visits(&self, slug: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        let Some(id) = tables.ids_by_slug.get(slug).copied() else {
            return Ok(false);
        };

        match tables.links.get_mut(&id) {
            Some(link) => {
                link.visits += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        match tables.ids_by_slug.remove(slug) {
            Some(id) => Ok(tables.links.remove(&id).is_some()),
            None => Ok(false),
        }
    }

    async fn list(&self, filter: LinkFilter) -> Result<Vec<Link>, StoreError> {
        let tables = self.tables.read().await;

        let mut links: Vec<&Link> = tables
            .links
            .values()
            .filter(|link| matches_search(link, filter.search.as_deref()))
            .collect();
        links.sort_by(|a, b| compare(a, b, filter.sort));

        Ok(links
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, search: Option<String>) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;

        let count = tables
            .links
            .values()
            .filter(|link| matches_search(link, search.as_deref()))
            .count();

        Ok(count as i64)
    }

    async fn scan(
        &self,
        search: Option<String>,
        after_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Link>, StoreError> {
        let tables = self.tables.read().await;
        let start = after_id.map_or(i64::MIN, |id| id.saturating_add(1));

        Ok(tables
            .links
            .range(start..)
            .map(|(_, link)| link)
            .filter(|link| matches_search(link, search.as_deref()))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkFilter, LinkRepository, StoreError};

const SELECT_LINKS: &str = "SELECT id, slug, original_url, visits, created_at FROM links";

/// PostgreSQL repository for link storage and retrieval.
///
/// Slug uniqueness is enforced by the `links_slug_key` constraint, so
/// concurrent inserts of the same slug are serialized by the database.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Escapes `LIKE` wildcards so the term matches literally.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_search_condition(qb: &mut QueryBuilder<'_, Postgres>, search: Option<String>, keyword: &str) {
    if let Some(search) = search {
        qb.push(keyword)
            .push(" original_url ILIKE ")
            .push_bind(like_pattern(&search));
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            INSERT INTO links (slug, original_url)
            VALUES ($1, $2)
            RETURNING id, slug, original_url, visits, created_at
            "#,
        )
        .bind(&new_link.slug)
        .bind(&new_link.original_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, StoreError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, slug, original_url, visits, created_at
            FROM links
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn increment_visits(&self, slug: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE links SET visits = visits + 1 WHERE slug = $1")
            .bind(slug)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM links WHERE slug = $1")
            .bind(slug)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: LinkFilter) -> Result<Vec<Link>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_LINKS);
        push_search_condition(&mut qb, filter.search, " WHERE");

        qb.push(" ORDER BY ");
        match filter.sort {
            Some(sort) => {
                qb.push(sort.field.column())
                    .push(" ")
                    .push(sort.direction.keyword())
                    .push(", id DESC");
            }
            None => {
                qb.push("id DESC");
            }
        }

        qb.push(" LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let links = qb
            .build_query_as::<Link>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(links)
    }

    async fn count(&self, search: Option<String>) -> Result<i64, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM links");
        push_search_condition(&mut qb, search, " WHERE");

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn scan(
        &self,
        search: Option<String>,
        after_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Link>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_LINKS);
        qb.push(" WHERE id > ").push_bind(after_id.unwrap_or(0));
        push_search_condition(&mut qb, search, " AND");
        qb.push(" ORDER BY id ASC LIMIT ").push_bind(limit);

        let links = qb
            .build_query_as::<Link>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(links)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_term() {
        assert_eq!(like_pattern("example"), "%example%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}

//! Link creation, resolution, deletion and listing.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{
    LinkFilter, LinkRepository, LinkSort, SortDirection, SortField,
};
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_slug;
use crate::utils::slug_generator::{generate_slug, validate_custom_slug};
use crate::utils::url_validator::validate_destination_url;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Builds the public short URL for a slug.
pub fn build_short_url(base_url: &str, slug: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), slug)
}

/// Listing request as received from the caller. Missing values take defaults.
#[derive(Debug, Clone, Default)]
pub struct ListLinksQuery {
    pub search: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_direction: Option<SortDirection>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListLinksQuery {
    /// Resolves defaults and converts the page into a store filter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` is 0 or `page_size` is outside
    /// `1..=MAX_PAGE_SIZE`.
    pub fn into_filter(self) -> Result<(LinkFilter, u32, u32), AppError> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "page_size": page_size }),
            ));
        }

        let offset = (i64::from(page) - 1) * i64::from(page_size);
        let sort = self.sort_by.map(|field| LinkSort {
            field,
            direction: self.sort_direction.unwrap_or_default(),
        });

        let filter = LinkFilter::new(offset, i64::from(page_size))
            .with_search(self.search)
            .with_sort(sort);

        Ok((filter, page, page_size))
    }
}

/// One page of links plus the total number of matches.
#[derive(Debug, Clone)]
pub struct LinkPage {
    pub items: Vec<Link>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

impl LinkPage {
    pub fn total_pages(&self) -> u32 {
        if self.total <= 0 {
            return 0;
        }
        let page_size = i64::from(self.page_size);
        ((self.total + page_size - 1) / page_size) as u32
    }
}

/// Service for the lifecycle of shortened links.
///
/// Every operation is stateless across calls and touches the store at most
/// twice (lookup + mutation). Nothing is retried here: a collision on a
/// generated slug is reported as [`AppError::SlugTaken`] like any other.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    public_base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `public_base_url` prefixes short URLs returned to clients.
    pub fn new(link_repository: Arc<dyn LinkRepository>, public_base_url: impl Into<String>) -> Self {
        Self {
            link_repository,
            public_base_url: public_base_url.into(),
        }
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `original_url` - absolute HTTP(S) destination, stored as given
    /// - `slug` - optional caller-chosen slug; generated from the URL when absent
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or slug is malformed.
    /// Returns [`AppError::SlugTaken`] if the slug already exists.
    /// Returns [`AppError::StoreUnavailable`] on other store failures.
    pub async fn create_link(
        &self,
        original_url: String,
        slug: Option<String>,
    ) -> Result<Link, AppError> {
        validate_destination_url(&original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let (slug, generated) = match slug {
            Some(custom) => {
                validate_custom_slug(&custom)?;
                (custom, false)
            }
            None => (generate_slug(&original_url), true),
        };

        let new_link = NewLink {
            slug: slug.clone(),
            original_url,
        };

        match self.link_repository.insert(new_link).await {
            Ok(link) => {
                info!(slug = %link.slug, "Link created");
                Ok(link)
            }
            Err(e) if is_unique_violation_on_slug(&e) => {
                if generated {
                    warn!(slug = %slug, "Generated slug collided with an existing link");
                }
                Err(AppError::slug_taken(slug))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the destination of `slug` and counts the visit.
    ///
    /// A link deleted between the lookup and the increment still resolves;
    /// its visit is simply not counted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this slug.
    pub async fn resolve(&self, slug: &str) -> Result<String, AppError> {
        let link = self.get_link(slug).await?;

        if !self.link_repository.increment_visits(slug).await? {
            debug!(slug, "Link disappeared before its visit was counted");
        }

        Ok(link.original_url)
    }

    /// Permanently deletes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this slug, including when
    /// it was already deleted.
    pub async fn delete_link(&self, slug: &str) -> Result<(), AppError> {
        self.get_link(slug).await?;

        if !self.link_repository.delete_by_slug(slug).await? {
            return Err(not_found(slug));
        }

        info!(slug, "Link deleted");
        Ok(())
    }

    /// Lists links with optional search, ordering and pagination.
    ///
    /// The page and the total count are fetched concurrently.
    pub async fn list_links(&self, query: ListLinksQuery) -> Result<LinkPage, AppError> {
        let (filter, page, page_size) = query.into_filter()?;
        let search = filter.search.clone();

        let (items, total) = tokio::try_join!(
            self.link_repository.list(filter),
            self.link_repository.count(search)
        )?;

        Ok(LinkPage {
            items,
            total,
            page,
            page_size,
        })
    }

    /// Retrieves a link without counting a visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this slug.
    pub async fn get_link(&self, slug: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| not_found(slug))
    }

    /// Constructs the full short URL for a slug.
    pub fn short_url(&self, slug: &str) -> String {
        build_short_url(&self.public_base_url, slug)
    }

    /// Checks that the link store is reachable.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.link_repository.ping().await?;
        Ok(())
    }
}

fn not_found(slug: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "slug": slug }))
}

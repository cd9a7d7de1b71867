//! CSV reports of the link table.

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use serde_json::json;
use tracing::{error, info};

use crate::application::services::link_service::build_short_url;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::export::{ExportStorage, ExportUpload};
use crate::utils::slug_generator::random_suffix;

/// Links fetched per store round-trip.
pub const EXPORT_BATCH_SIZE: i64 = 500;

const CSV_HEADER: [&str; 5] = ["Slug", "Original URL", "Short URL", "Visits", "Created at"];
const CREATED_AT_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Outcome of a finished export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub report_url: String,
    pub rows: u64,
}

/// Streams matching links into a CSV file on the configured storage.
///
/// Links are read in id order using keyset batches so memory use does not
/// grow with the table. Timestamps are rendered in the configured timezone.
pub struct ExportService {
    link_repository: Arc<dyn LinkRepository>,
    storage: Arc<dyn ExportStorage>,
    timezone: Tz,
    public_base_url: String,
}

impl ExportService {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        storage: Arc<dyn ExportStorage>,
        timezone: Tz,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_repository,
            storage,
            timezone,
            public_base_url: public_base_url.into(),
        }
    }

    /// Exports every link whose URL contains `search` (all links when absent).
    ///
    /// A partially written report is removed if anything fails.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if reading links fails, or
    /// [`AppError::Internal`] if the report cannot be written.
    pub async fn export_links(&self, search: Option<String>) -> Result<ExportReport, AppError> {
        let search = search.filter(|s| !s.trim().is_empty());
        let file_name = report_file_name();

        let mut upload = self.storage.create(&file_name).await?;

        match self.write_rows(upload.as_mut(), search).await {
            Ok(rows) => {
                let report_url = upload.finish().await.inspect_err(|e| {
                    error!(error = %e, file_name = %file_name, "Export could not be completed");
                })?;
                info!(rows, report_url = %report_url, "Links exported");
                Ok(ExportReport { report_url, rows })
            }
            Err(e) => {
                error!(error = %e, file_name = %file_name, "Export failed, discarding report");
                upload.abort().await;
                Err(e)
            }
        }
    }

    /// Checks that reports can be written.
    pub async fn check_storage(&self) -> bool {
        self.storage.health_check().await
    }

    async fn write_rows(
        &self,
        upload: &mut dyn ExportUpload,
        search: Option<String>,
    ) -> Result<u64, AppError> {
        upload.write_chunk(&encode_header()?).await?;

        let mut after_id = None;
        let mut rows = 0u64;

        loop {
            let batch = self
                .link_repository
                .scan(search.clone(), after_id, EXPORT_BATCH_SIZE)
                .await?;

            let Some(last) = batch.last() else {
                break;
            };
            after_id = Some(last.id);

            upload.write_chunk(&self.encode_batch(&batch)?).await?;
            rows += batch.len() as u64;

            if (batch.len() as i64) < EXPORT_BATCH_SIZE {
                break;
            }
        }

        Ok(rows)
    }

    fn encode_batch(&self, links: &[Link]) -> Result<Vec<u8>, AppError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        for link in links {
            let short_url = build_short_url(&self.public_base_url, &link.slug);
            let visits = link.visits.to_string();
            let created_at = link
                .created_at
                .with_timezone(&self.timezone)
                .format(CREATED_AT_FORMAT)
                .to_string();

            writer
                .write_record([
                    link.slug.as_str(),
                    link.original_url.as_str(),
                    short_url.as_str(),
                    visits.as_str(),
                    created_at.as_str(),
                ])
                .map_err(csv_error)?;
        }

        writer.into_inner().map_err(|e| csv_error(e.into_error()))
    }
}

fn encode_header() -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    writer.into_inner().map_err(|e| csv_error(e.into_error()))
}

fn csv_error(e: impl std::fmt::Display) -> AppError {
    AppError::internal("Failed to encode CSV", json!({ "reason": e.to_string() }))
}

/// `<UTC timestamp>-<random>-links.csv`, unique enough that concurrent exports
/// never share a file.
fn report_file_name() -> String {
    format!(
        "{}-{}-links.csv",
        Utc::now().format("%Y%m%dT%H%M%S%3fZ"),
        random_suffix(6)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewLink;
    use crate::domain::repositories::{MockLinkRepository, StoreError};
    use crate::infrastructure::export::LocalExportStorage;
    use crate::infrastructure::persistence::InMemoryLinkRepository;
    use chrono::TimeZone;

    const BASE_URL: &str = "https://brev.ly";

    async fn local_storage(dir: &std::path::Path) -> Arc<dyn ExportStorage> {
        Arc::new(LocalExportStorage::new(dir, BASE_URL).await.unwrap())
    }

    fn read_report(dir: &std::path::Path, report_url: &str) -> String {
        let file_name = report_url.rsplit('/').next().unwrap();
        std::fs::read_to_string(dir.join(file_name)).unwrap()
    }

    #[test]
    fn test_report_file_name_shape() {
        let name = report_file_name();
        assert!(name.ends_with("-links.csv"));
        assert_ne!(name, report_file_name());
    }

    #[tokio::test]
    async fn test_export_filters_by_search() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = Arc::new(InMemoryLinkRepository::new());
        for (slug, url) in [
            ("docs", "https://docs.rs/axum"),
            ("crates", "https://crates.io"),
            ("book", "https://doc.rust-lang.org/book"),
        ] {
            repo.insert(NewLink {
                slug: slug.to_string(),
                original_url: url.to_string(),
            })
            .await
            .unwrap();
        }

        let service = ExportService::new(repo, local_storage(tmp.path()).await, Tz::UTC, BASE_URL);
        let report = service.export_links(Some("DOC".to_string())).await.unwrap();

        assert_eq!(report.rows, 2);
        assert!(report.report_url.starts_with("https://brev.ly/exports/"));

        let content = read_report(tmp.path(), &report.report_url);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Slug,Original URL,Short URL,Visits,Created at");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("docs,https://docs.rs/axum,https://brev.ly/docs,0,"));
        assert!(lines[2].starts_with("book,"));
    }

    #[tokio::test]
    async fn test_export_empty_store_writes_header_only() {
        let tmp = tempfile::tempdir().unwrap();
        let service = ExportService::new(
            Arc::new(InMemoryLinkRepository::new()),
            local_storage(tmp.path()).await,
            Tz::UTC,
            BASE_URL,
        );

        let report = service.export_links(None).await.unwrap();

        assert_eq!(report.rows, 0);
        assert_eq!(
            read_report(tmp.path(), &report.report_url),
            "Slug,Original URL,Short URL,Visits,Created at\n"
        );
    }

    #[tokio::test]
    async fn test_export_spans_multiple_batches() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = Arc::new(InMemoryLinkRepository::new());
        let total = EXPORT_BATCH_SIZE as usize + 3;
        for i in 0..total {
            repo.insert(NewLink {
                slug: format!("l{i}"),
                original_url: format!("https://example.com/{i}"),
            })
            .await
            .unwrap();
        }

        let service = ExportService::new(repo, local_storage(tmp.path()).await, Tz::UTC, BASE_URL);
        let report = service.export_links(None).await.unwrap();

        assert_eq!(report.rows, total as u64);
        let content = read_report(tmp.path(), &report.report_url);
        assert_eq!(content.lines().count(), total + 1);
        assert!(content.lines().nth(1).unwrap().starts_with("l0,"));
    }

    #[tokio::test]
    async fn test_export_renders_created_at_in_timezone() {
        let tmp = tempfile::tempdir().unwrap();
        let created_at = Utc.with_ymd_and_hms(2025, 1, 15, 23, 30, 0).unwrap();

        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_scan()
            .times(1)
            .returning(move |_, _, _| {
                Ok(vec![Link::new(
                    1,
                    "abc".to_string(),
                    "https://example.com/a,b".to_string(),
                    42,
                    created_at,
                )])
            });

        let service = ExportService::new(
            Arc::new(mock_repo),
            local_storage(tmp.path()).await,
            chrono_tz::America::Sao_Paulo,
            BASE_URL,
        );
        let report = service.export_links(None).await.unwrap();

        let content = read_report(tmp.path(), &report.report_url);
        assert_eq!(
            content.lines().nth(1).unwrap(),
            "abc,\"https://example.com/a,b\",https://brev.ly/abc,42,15/01/2025 20:30"
        );
    }

    #[tokio::test]
    async fn test_export_failure_removes_partial_file() {
        let tmp = tempfile::tempdir().unwrap();

        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_scan()
            .times(1)
            .returning(|_, _, _| Err(StoreError::Unavailable("connection reset".to_string())));

        let service = ExportService::new(
            Arc::new(mock_repo),
            local_storage(tmp.path()).await,
            Tz::UTC,
            BASE_URL,
        );
        let result = service.export_links(None).await;

        assert!(matches!(result.unwrap_err(), AppError::StoreUnavailable(_)));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}

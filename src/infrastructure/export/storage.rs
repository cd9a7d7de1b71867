//! Export storage trait and error types.

use async_trait::async_trait;

/// Errors that can occur while writing an export file.
#[derive(Debug, thiserror::Error)]
pub enum ExportStorageError {
    #[error("Invalid export file name: {0}")]
    InvalidFileName(String),

    #[error("Export storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export storage operations.
pub type ExportStorageResult<T> = Result<T, ExportStorageError>;

/// Destination for generated reports.
///
/// # Implementations
///
/// - [`crate::infrastructure::export::LocalExportStorage`] - files on local disk, served under `/exports`
#[async_trait]
pub trait ExportStorage: Send + Sync {
    /// Starts a new upload under `file_name`.
    async fn create(&self, file_name: &str) -> ExportStorageResult<Box<dyn ExportUpload>>;

    /// Checks that the storage backend can accept uploads.
    async fn health_check(&self) -> bool;
}

/// An upload in progress. Chunks are appended in order.
#[async_trait]
pub trait ExportUpload: Send {
    async fn write_chunk(&mut self, chunk: &[u8]) -> ExportStorageResult<()>;

    /// Completes the upload and returns the public URL of the report.
    async fn finish(self: Box<Self>) -> ExportStorageResult<String>;

    /// Drops whatever was written so far.
    async fn abort(self: Box<Self>);
}

//! Storage for generated CSV reports.
//!
//! Provides an [`ExportStorage`] trait with a local filesystem implementation,
//! [`LocalExportStorage`].

mod local_storage;
mod storage;

pub use local_storage::LocalExportStorage;
pub use storage::{ExportStorage, ExportStorageError, ExportStorageResult, ExportUpload};

//! Local filesystem export storage.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use super::storage::{ExportStorage, ExportStorageError, ExportStorageResult, ExportUpload};

/// Writes reports into a directory that the HTTP server publishes under
/// `/exports`.
pub struct LocalExportStorage {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalExportStorage {
    /// Creates the export directory if needed.
    ///
    /// # Arguments
    ///
    /// - `dir` - directory receiving report files
    /// - `public_base_url` - externally visible base URL of this service
    ///
    /// # Errors
    ///
    /// Returns [`ExportStorageError::Io`] if the directory cannot be created.
    pub async fn new(
        dir: impl Into<PathBuf>,
        public_base_url: &str,
    ) -> ExportStorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        info!("Export directory ready at {}", dir.display());

        Ok(Self {
            dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn public_url(&self, file_name: &str) -> String {
        format!("{}/exports/{}", self.public_base_url, file_name)
    }
}

/// Accepts plain file names only; anything that could escape the export
/// directory is rejected.
fn check_file_name(file_name: &str) -> ExportStorageResult<()> {
    let valid = !file_name.is_empty()
        && !file_name.starts_with('.')
        && file_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(ExportStorageError::InvalidFileName(file_name.to_string()))
    }
}

#[async_trait]
impl ExportStorage for LocalExportStorage {
    async fn create(&self, file_name: &str) -> ExportStorageResult<Box<dyn ExportUpload>> {
        check_file_name(file_name)?;

        let path = self.dir.join(file_name);
        let file = File::create(&path).await?;
        debug!("Export upload started: {}", path.display());

        Ok(Box::new(LocalUpload {
            writer: BufWriter::new(file),
            path,
            url: self.public_url(file_name),
        }))
    }

    async fn health_check(&self) -> bool {
        fs::metadata(&self.dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}

struct LocalUpload {
    writer: BufWriter<File>,
    path: PathBuf,
    url: String,
}

#[async_trait]
impl ExportUpload for LocalUpload {
    async fn write_chunk(&mut self, chunk: &[u8]) -> ExportStorageResult<()> {
        self.writer.write_all(chunk).await?;
        Ok(())
    }

    async fn finish(self: Box<Self>) -> ExportStorageResult<String> {
        let LocalUpload {
            mut writer,
            path,
            url,
        } = *self;

        let flushed = async {
            writer.flush().await?;
            writer.get_mut().sync_all().await
        }
        .await;

        if let Err(e) = flushed {
            drop(writer);
            remove_partial(&path).await;
            return Err(e.into());
        }

        debug!("Export upload finished: {}", path.display());
        Ok(url)
    }

    async fn abort(self: Box<Self>) {
        let LocalUpload { writer, path, .. } = *self;
        drop(writer);
        remove_partial(&path).await;
    }
}

async fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        warn!("Failed to remove partial export {}: {}", path.display(), e);
    }
}

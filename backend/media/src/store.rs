//! Flat directory of uniquely named files.
//!
//! Names are `{prefix}{uuid-simple}.{extension}` and are created with
//! `create_new`, so two concurrent writers can never clobber each other.

use std::path::{Path, PathBuf};

use psychoscore_core::ScoreError;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// Store for generated speech: `psycho_analysis_<hex>.mp3`.
    pub fn audio(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, "psycho_analysis_", "mp3")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn persist(&self, bytes: &[u8]) -> Result<StoredFile, ScoreError> {
        self.persist_with_extension(bytes, &self.extension).await
    }

    pub async fn persist_with_extension(
        &self,
        bytes: &[u8],
        extension: &str,
    ) -> Result<StoredFile, ScoreError> {
        fs::create_dir_all(&self.dir).await?;

        let name = format!("{}{}.{}", self.prefix, Uuid::new_v4().simple(), extension);
        let path = self.dir.join(&name);

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        write_or_discard(file, &path, bytes).await?;

        debug!(path = %path.display(), size = bytes.len(), "Stored file");
        Ok(StoredFile {
            name,
            path,
            size: bytes.len() as u64,
        })
    }

    /// Resolves a bare file name inside the store, refusing anything that
    /// could escape the directory.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ScoreError> {
        if !is_plain_file_name(name) {
            return Err(ScoreError::validation("Invalid file name"));
        }
        Ok(self.dir.join(name))
    }
}

/// Writes `bytes` and flushes; on failure the partial file at `path` is
/// removed so it can never be served.
async fn write_or_discard<W>(mut writer: W, path: &Path, bytes: &[u8]) -> Result<(), ScoreError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    }
    .await;
    let Err(e) = written else {
        return Ok(());
    };
    drop(writer);
    if let Err(cleanup) = fs::remove_file(path).await {
        warn!(path = %path.display(), error = %cleanup, "Failed to remove partial file");
    }
    Err(e.into())
}

pub(crate) fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

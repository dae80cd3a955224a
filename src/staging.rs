//! Staging area: the shared `tmp/` directory inbound payloads land in before commit.
//!
//! Files are keyed by name only; there is no reservation scheme. Two callers staging the same
//! name concurrently overwrite each other and must serialize externally.

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::foundation::error::{AssetError, AssetResult};
use crate::foundation::fs::{ensure_dir, stat_or_absent, split_file_name, validate_file_name};
use crate::model::StagedFile;
use crate::payload::{decode_data_uri, mime_for_file_name};

/// The staging directory under a base root.
#[derive(Clone, Debug)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Staging area rooted at `dir` (usually `<base>/tmp`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Staging directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a staged `name` lives at.
    pub fn path_for(&self, name: &str) -> AssetResult<PathBuf> {
        validate_file_name(name)?;
        Ok(self.dir.join(name))
    }

    /// Decode `data_uri` and stage it as `name`, appending the payload's extension when `name`
    /// has none.
    pub async fn save_base64(&self, name: &str, data_uri: &str) -> AssetResult<StagedFile> {
        let payload = decode_data_uri(data_uri)?;
        let file_name = resolve_file_name(name, payload.extension);
        let staged = self.write(&file_name, &payload.bytes).await?;
        Ok(StagedFile {
            mime_type: Some(payload.mime_type),
            ..staged
        })
    }

    /// Stage `bytes` verbatim as `name`.
    pub async fn save_binary(&self, name: &str, bytes: &[u8]) -> AssetResult<StagedFile> {
        let staged = self.write(name, bytes).await?;
        Ok(StagedFile {
            mime_type: mime_for_file_name(name).map(str::to_string),
            ..staged
        })
    }

    /// Stat a staged file without side effects.
    pub async fn exists(&self, name: &str) -> AssetResult<Option<Metadata>> {
        stat_or_absent(&self.path_for(name)?).await
    }

    /// Delete staged files last modified more than `max_age` ago. Returns how many were removed.
    pub async fn purge_older_than(&self, max_age: Duration) -> AssetResult<usize> {
        let Some(meta) = stat_or_absent(&self.dir).await? else {
            return Ok(0);
        };
        if !meta.is_dir() {
            return Ok(0);
        }

        let now = SystemTime::now();
        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| AssetError::io("read directory", &self.dir, e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AssetError::io("read directory", &self.dir, e))?
        {
            let path = entry.path();
            let Some(meta) = stat_or_absent(&path).await? else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            let age = meta
                .modified()
                .ok()
                .and_then(|m| now.duration_since(m).ok())
                .unwrap_or_default();
            if age > max_age
                && crate::foundation::fs::remove_file_if_present(&path).await?
            {
                tracing::debug!(path = %path.display(), ?age, "purged stale staged file");
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn write(&self, name: &str, bytes: &[u8]) -> AssetResult<StagedFile> {
        let path = self.path_for(name)?;
        ensure_dir(&self.dir).await?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AssetError::io("write", &path, e))?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| AssetError::io("stat", &path, e))?;
        tracing::debug!(path = %path.display(), len = metadata.len(), "staged file");
        Ok(StagedFile {
            file_name: name.to_string(),
            path,
            metadata,
            mime_type: None,
        })
    }
}

fn resolve_file_name(name: &str, ext: Option<&str>) -> String {
    match (split_file_name(name).1, ext) {
        (None, Some(ext)) => format!("{name}.{ext}"),
        _ => name.to_string(),
    }
}

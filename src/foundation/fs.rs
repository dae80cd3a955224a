//! Filesystem primitives shared by staging, conversion and removal.
//!
//! All helpers treat "not found" as a value rather than an error. Every other OS error is
//! propagated as [`AssetError::Io`] carrying the operation and path.

use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{AssetError, AssetResult};

/// Stat `path`, returning `None` when it does not exist.
pub async fn stat_or_absent(path: &Path) -> AssetResult<Option<Metadata>> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "not found");
            Ok(None)
        }
        Err(e) => Err(AssetError::io("stat", path, e)),
    }
}

/// Create `dir` and its parents unless it already exists.
///
/// Racing creators are fine: `create_dir_all` tolerates a directory appearing concurrently.
pub async fn ensure_dir(dir: &Path) -> AssetResult<()> {
    if let Some(meta) = stat_or_absent(dir).await?
        && meta.is_dir()
    {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AssetError::io("create directory", dir, e))?;
    tracing::debug!(dir = %dir.display(), "created directory");
    Ok(())
}

/// Recursively delete `dir`. Absence is not an error.
pub async fn remove_tree(dir: &Path) -> AssetResult<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AssetError::io("remove directory", dir, e)),
    }
}

/// Delete a single file. Absence is not an error; returns whether a file was removed.
pub async fn remove_file_if_present(path: &Path) -> AssetResult<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(AssetError::io("remove file", path, e)),
    }
}

/// Expand the glob `<dir>/<stem>.*`.
///
/// Both `dir` and `stem` are escaped, so only the trailing `*` acts as a wildcard.
pub async fn glob_with_stem(dir: &Path, stem: &str) -> AssetResult<Vec<PathBuf>> {
    let dir_str = dir.to_str().ok_or_else(|| {
        AssetError::usage(format!("directory '{}' is not valid UTF-8", dir.display()))
    })?;
    let pattern = format!(
        "{}/{}.*",
        glob::Pattern::escape(dir_str),
        glob::Pattern::escape(stem)
    );

    let expanded = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        for entry in glob::glob(&pattern).with_context(|| format!("bad glob '{pattern}'"))? {
            out.push(entry.with_context(|| format!("read glob match for '{pattern}'"))?);
        }
        Ok(out)
    })
    .await
    .context("glob task failed")??;
    Ok(expanded)
}

/// Normalize and validate a relative path used as a namespace key or file name.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> AssetResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(AssetError::usage(format!("path '{source}' must be relative")));
    }
    if s.is_empty() {
        return Err(AssetError::usage("path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(AssetError::usage(format!(
                "path '{source}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(AssetError::usage(format!(
            "path '{source}' must contain at least one segment"
        )));
    }

    Ok(out.join("/"))
}

/// Validate a bare file name: one path segment, not `.` or `..`.
pub fn validate_file_name(name: &str) -> AssetResult<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(AssetError::usage(format!("invalid file name '{name}'")));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(AssetError::usage(format!(
            "file name '{name}' must not contain path separators"
        )));
    }
    Ok(())
}

/// Split a file name into `(base, extension)` on the last `.`.
///
/// `a.b.jpg` yields `("a.b", Some("jpg"))`; names without a dot, or whose only dot is leading
/// (`.hidden`), have no extension.
pub fn split_file_name(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/fs.rs"]
mod tests;

//! Deletion of namespaces or of one asset's files.

use std::path::{Path, PathBuf};

use crate::foundation::error::{AssetError, AssetResult};
use crate::foundation::fs::{
    glob_with_stem, remove_file_if_present, remove_tree, split_file_name, stat_or_absent,
    validate_file_name,
};
use crate::layout::AssetRoot;
use crate::model::{ORIGINAL_TYPE, validate_variant_type};

/// Delete the whole namespaced subtree of `root`. Returns an empty list when it never existed.
///
/// The target must look like a namespace root: an `original/` directory and no regular files
/// directly inside. A key naming a root-level variant directory is refused.
pub(crate) async fn remove_namespace(root: &AssetRoot) -> AssetResult<Vec<PathBuf>> {
    debug_assert!(root.namespace().is_some());
    let dir = root.dir().to_path_buf();
    let Some(meta) = stat_or_absent(&dir).await? else {
        tracing::debug!(dir = %dir.display(), "namespace absent; nothing to remove");
        return Ok(Vec::new());
    };
    if !meta.is_dir() || !is_namespace_root(&dir).await? {
        return Err(AssetError::usage(format!(
            "'{}' is not a namespace root; refusing to remove it",
            dir.display()
        )));
    }
    remove_tree(&dir).await?;
    tracing::info!(dir = %dir.display(), "removed namespace");
    Ok(vec![dir])
}

async fn is_namespace_root(dir: &Path) -> AssetResult<bool> {
    let has_original = stat_or_absent(&dir.join(ORIGINAL_TYPE))
        .await?
        .is_some_and(|m| m.is_dir());
    if !has_original {
        return Ok(false);
    }

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| AssetError::io("read directory", dir, e))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AssetError::io("read directory", dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| AssetError::io("stat", &entry.path(), e))?;
        if file_type.is_file() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Delete `<type>/<base_name>.*` for `original` and every type in `file_types`.
///
/// Matches whose own base name differs (e.g. `a.b.png` when removing `a`) are kept.
pub(crate) async fn remove_files(
    root: &AssetRoot,
    file_name: &str,
    file_types: &[String],
) -> AssetResult<Vec<PathBuf>> {
    validate_file_name(file_name)?;
    let (base_name, _) = split_file_name(file_name);

    let mut kinds: Vec<&str> = vec![ORIGINAL_TYPE];
    for kind in file_types {
        if kind != ORIGINAL_TYPE {
            validate_variant_type(kind)?;
        }
        if !kinds.contains(&kind.as_str()) {
            kinds.push(kind.as_str());
        }
    }

    let mut removed = Vec::new();
    for kind in kinds {
        let dir = root.variant_dir(kind);
        for path in glob_with_stem(&dir, base_name).await? {
            let same_base = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| split_file_name(n).0 == base_name);
            if !same_base {
                continue;
            }
            if !stat_or_absent(&path).await?.is_some_and(|m| m.is_file()) {
                continue;
            }
            if remove_file_if_present(&path).await? {
                removed.push(path);
            }
        }
    }
    tracing::info!(
        dir = %root.dir().display(),
        base_name,
        count = removed.len(),
        "removed asset files"
    );
    Ok(removed)
}

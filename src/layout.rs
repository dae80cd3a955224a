//! On-disk layout of an asset root.
//!
//! ```text
//! <base>[/<namespace>]/original/<base_name>.<ext>
//! <base>[/<namespace>]/<variant_type>/<base_name>.<ext>
//! <base>/tmp/<staged_name>
//! ```

use std::path::{Path, PathBuf};

use crate::foundation::error::{AssetError, AssetResult};
use crate::foundation::fs::{ensure_dir, normalize_rel_path};
use crate::model::{ORIGINAL_TYPE, TMP_DIR};

/// A base directory plus an optional namespace key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRoot {
    base: PathBuf,
    namespace: Option<String>,
    dir: PathBuf,
}

impl AssetRoot {
    /// Resolve the namespaced root for `namespace_key` under `base`.
    ///
    /// The key is normalized (`\` to `/`, `.` segments dropped) and must not be absolute, contain
    /// `..`, or start with a reserved directory name.
    pub fn resolve(base: impl Into<PathBuf>, namespace_key: Option<&str>) -> AssetResult<Self> {
        let base = base.into();
        let namespace = namespace_key.map(normalize_rel_path).transpose()?;
        if let Some(ns) = &namespace {
            let head = ns.split('/').next().unwrap_or_default();
            if head == TMP_DIR || head == ORIGINAL_TYPE {
                return Err(AssetError::usage(format!(
                    "namespace key '{ns}' collides with the reserved '{head}' directory"
                )));
            }
        }
        let dir = match &namespace {
            Some(ns) => base.join(ns),
            None => base.clone(),
        };
        Ok(Self {
            base,
            namespace,
            dir,
        })
    }

    /// Base directory shared by all namespaces.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Normalized namespace key, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Namespaced root (`base` itself when there is no namespace).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory of committed originals.
    pub fn original_dir(&self) -> PathBuf {
        self.dir.join(ORIGINAL_TYPE)
    }

    /// Directory for variants of type `kind`.
    pub fn variant_dir(&self, kind: &str) -> PathBuf {
        self.dir.join(kind)
    }

    /// Shared staging directory. Never namespaced.
    pub fn tmp_dir(&self) -> PathBuf {
        self.base.join(TMP_DIR)
    }

    /// Create the namespaced root and its `original/` directory if absent.
    pub async fn ensure(&self) -> AssetResult<PathBuf> {
        let original = self.original_dir();
        ensure_dir(&original).await?;
        Ok(original)
    }

    /// Create the directory for variant type `kind` if absent.
    pub async fn ensure_variant_dir(&self, kind: &str) -> AssetResult<PathBuf> {
        let dir = self.variant_dir(kind);
        ensure_dir(&dir).await?;
        Ok(dir)
    }
}

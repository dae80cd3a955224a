use std::path::PathBuf;

use crate::convert::magick::MagickToolOpts;
use crate::convert::plan::GlobalFlags;
use crate::foundation::error::{AssetError, AssetResult};

/// Options for [`AssetStore`](crate::AssetStore).
#[derive(Clone, Debug)]
pub struct AssetStoreOpts {
    /// Base directory holding `tmp/`, `original/`, variant directories and namespaces.
    pub root: PathBuf,
    /// External tool used by the default [`MagickTool`](crate::MagickTool).
    pub tool: MagickToolOpts,
    /// Encoder quality for every variant (1..=100).
    pub quality: u8,
    /// Chroma subsampling for every variant; `None` leaves the encoder default.
    pub sampling_factor: Option<String>,
    /// Flags applied to the source before deriving.
    pub flags: GlobalFlags,
}

impl AssetStoreOpts {
    /// Defaults: `convert` on PATH, quality 80, `4:2:0` subsampling, strip metadata, drop alpha.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tool: MagickToolOpts::default(),
            quality: 80,
            sampling_factor: Some("4:2:0".to_string()),
            flags: GlobalFlags::default(),
        }
    }

    pub(crate) fn validate(&self) -> AssetResult<()> {
        if self.root.as_os_str().is_empty() {
            return Err(AssetError::usage("asset root must be set"));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(AssetError::usage(format!(
                "quality must be in 1..=100, got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// Options for `convert` and the direct `save_original_*` entry points.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertOpts {
    /// Namespace to commit into; `None` uses the base root.
    pub namespace_key: Option<String>,
}

impl ConvertOpts {
    /// Target namespace `key`.
    pub fn namespace(key: impl Into<String>) -> Self {
        Self {
            namespace_key: Some(key.into()),
        }
    }
}

/// Options for `remove`.
///
/// - `namespace_key` alone: delete the whole namespace subtree.
/// - `file_name` (+ `file_types`): delete `<base_name>.*` under `original/` and every listed
///   type, inside `namespace_key` when that is also set.
/// - neither: usage error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemoveOpts {
    /// Namespace to delete, or to scope a selective removal to.
    pub namespace_key: Option<String>,
    /// File whose base name selects the files to delete.
    pub file_name: Option<String>,
    /// Variant types to delete from, in addition to `original`.
    pub file_types: Vec<String>,
}

impl RemoveOpts {
    /// Remove an entire namespace.
    pub fn namespace(key: impl Into<String>) -> Self {
        Self {
            namespace_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Remove the original and the listed variants of `file_name`.
    pub fn files<I, S>(file_name: impl Into<String>, file_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespace_key: None,
            file_name: Some(file_name.into()),
            file_types: file_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Scope a selective removal to namespace `key`.
    pub fn in_namespace(mut self, key: impl Into<String>) -> Self {
        self.namespace_key = Some(key.into());
        self
    }

    pub(crate) fn target(&self) -> AssetResult<RemoveTarget<'_>> {
        match (&self.namespace_key, &self.file_name) {
            (ns, Some(file_name)) => Ok(RemoveTarget::Files {
                namespace_key: ns.as_deref(),
                file_name: file_name.as_str(),
                file_types: &self.file_types,
            }),
            (Some(ns), None) => {
                if !self.file_types.is_empty() {
                    return Err(AssetError::usage(
                        "remove: file_types requires file_name",
                    ));
                }
                Ok(RemoveTarget::Namespace(ns.as_str()))
            }
            (None, None) => Err(AssetError::usage(
                "remove: either namespace_key or file_name must be set",
            )),
        }
    }
}

/// Validated removal mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RemoveTarget<'a> {
    Namespace(&'a str),
    Files {
        namespace_key: Option<&'a str>,
        file_name: &'a str,
        file_types: &'a [String],
    },
}

use std::fs::Metadata;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{AssetError, AssetResult};

/// Directory (and manifest type label) holding committed originals.
pub const ORIGINAL_TYPE: &str = "original";
/// Shared staging directory directly under the base root.
pub const TMP_DIR: &str = "tmp";

/// Requested derivative of an original.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSpec {
    /// Variant type label; also the directory the output is written to.
    #[serde(rename = "type")]
    pub kind: String,
    /// Resize geometry handed to the conversion tool (e.g. `100x>`).
    pub size: String,
    /// Output extension; defaults to the original's extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
}

impl VariantSpec {
    /// Variant keeping the original's extension.
    pub fn new(kind: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            size: size.into(),
            ext: None,
        }
    }

    /// Override the output extension.
    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }

    pub(crate) fn validate(&self) -> AssetResult<()> {
        validate_variant_type(&self.kind)?;
        if self.size.trim().is_empty() {
            return Err(AssetError::usage(format!(
                "variant '{}' has an empty size",
                self.kind
            )));
        }
        // A leading '-' would be read as a tool option.
        if self.size.starts_with('-') {
            return Err(AssetError::usage(format!(
                "variant '{}' size '{}' must not start with '-'",
                self.kind, self.size
            )));
        }
        if let Some(ext) = &self.ext
            && (ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(AssetError::usage(format!(
                "variant '{}' extension '{ext}' must be non-empty ASCII alphanumeric",
                self.kind
            )));
        }
        Ok(())
    }
}

/// Check that `kind` is usable as a variant type directory.
pub(crate) fn validate_variant_type(kind: &str) -> AssetResult<()> {
    crate::foundation::fs::validate_file_name(kind)?;
    if kind == ORIGINAL_TYPE || kind == TMP_DIR {
        return Err(AssetError::usage(format!(
            "'{kind}' is reserved and cannot be used as a variant type"
        )));
    }
    Ok(())
}

/// A produced file listed in a [`ConversionManifest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetVariant {
    /// Variant type label, or `original` for the committed source.
    #[serde(rename = "type")]
    pub kind: String,
    /// Absolute or root-relative path of the file on disk.
    pub path: PathBuf,
    /// Width in pixels, `0` when unprobeable.
    pub width: u32,
    /// Height in pixels, `0` when unprobeable.
    pub height: u32,
}

impl AssetVariant {
    /// Whether this entry describes the committed original.
    pub fn is_original(&self) -> bool {
        self.kind == ORIGINAL_TYPE
    }
}

/// Ordered result of one `convert` call: every variant plus the original.
///
/// Entries are sorted by ascending width; ties keep request order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionManifest {
    entries: Vec<AssetVariant>,
}

impl ConversionManifest {
    /// Build a manifest from entries in request order, sorting them by width.
    pub(crate) fn from_unsorted(mut entries: Vec<AssetVariant>) -> Self {
        // Stable: equal widths keep request order.
        entries.sort_by_key(|e| e.width);
        Self { entries }
    }

    /// Entries in manifest order.
    pub fn entries(&self) -> &[AssetVariant] {
        &self.entries
    }

    /// Number of entries (variants + original).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The original's entry.
    pub fn original(&self) -> Option<&AssetVariant> {
        self.entries.iter().find(|e| e.is_original())
    }

    /// Iterate entries in manifest order.
    pub fn iter(&self) -> std::slice::Iter<'_, AssetVariant> {
        self.entries.iter()
    }

    /// Consume into the entry list.
    pub fn into_entries(self) -> Vec<AssetVariant> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a ConversionManifest {
    type Item = &'a AssetVariant;
    type IntoIter = std::slice::Iter<'a, AssetVariant>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A payload written to the staging directory.
#[derive(Clone, Debug)]
pub struct StagedFile {
    /// Resolved file name inside `tmp/`.
    pub file_name: String,
    /// Full path of the staged file.
    pub path: PathBuf,
    /// Filesystem metadata read back after the write.
    pub metadata: Metadata,
    /// MIME type from the payload header or the file extension.
    pub mime_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: &str, width: u32) -> AssetVariant {
        AssetVariant {
            kind: kind.to_string(),
            path: PathBuf::from(format!("{kind}/x.jpg")),
            width,
            height: width,
        }
    }

    #[test]
    fn manifest_sort_is_stable_by_width() {
        let m = ConversionManifest::from_unsorted(vec![
            entry("large", 300),
            entry("a", 30),
            entry("b", 30),
            entry(ORIGINAL_TYPE, 0),
        ]);
        let kinds: Vec<_> = m.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, vec![ORIGINAL_TYPE, "a", "b", "large"]);
        assert_eq!(m.original().unwrap().width, 0);
    }

    #[test]
    fn variant_spec_wire_shape() {
        let spec: VariantSpec =
            serde_json::from_str(r#"{"type":"medium","size":"100x>","ext":"png"}"#).unwrap();
        assert_eq!(spec, VariantSpec::new("medium", "100x>").with_ext("png"));

        let spec: VariantSpec = serde_json::from_str(r#"{"type":"thumb","size":"30x>"}"#).unwrap();
        assert_eq!(spec.ext, None);
        assert_eq!(
            serde_json::to_string(&spec).unwrap(),
            r#"{"type":"thumb","size":"30x>"}"#
        );
    }

    #[test]
    fn variant_spec_validation() {
        VariantSpec::new("medium", "100x>").validate().unwrap();
        assert!(VariantSpec::new("original", "1x1").validate().is_err());
        assert!(VariantSpec::new("tmp", "1x1").validate().is_err());
        assert!(VariantSpec::new("a/b", "1x1").validate().is_err());
        assert!(VariantSpec::new("m", " ").validate().is_err());
        assert!(VariantSpec::new("m", "-delete").validate().is_err());
        assert!(
            VariantSpec::new("m", "1x1")
                .with_ext("p/ng")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn manifest_serializes_as_list() {
        let m = ConversionManifest::from_unsorted(vec![entry("thumb", 30)]);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json[0]["type"], "thumb");
        assert_eq!(json[0]["width"], 30);
    }
}

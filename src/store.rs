use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AssetStoreOpts, ConvertOpts, RemoveOpts, RemoveTarget};
use crate::convert::commit_and_derive;
use crate::convert::magick::MagickTool;
use crate::convert::tool::ConvertTool;
use crate::foundation::error::{AssetError, AssetResult};
use crate::foundation::fs::validate_file_name;
use crate::layout::AssetRoot;
use crate::model::{ConversionManifest, StagedFile, VariantSpec};
use crate::payload::decode_data_uri;
use crate::removal;
use crate::staging::StagingArea;

/// Entry point: stage uploads, commit and derive variants, remove assets.
///
/// All operations are async and hold no locks. Concurrent `convert` calls for the same
/// namespace and base name race on the output files (last writer wins); serialize them
/// externally when that matters.
#[derive(Clone)]
pub struct AssetStore {
    opts: AssetStoreOpts,
    staging: StagingArea,
    tool: Arc<dyn ConvertTool>,
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore")
            .field("opts", &self.opts)
            .field("staging", &self.staging)
            .finish_non_exhaustive()
    }
}

impl AssetStore {
    /// Create a store converting through ImageMagick as configured in `opts.tool`.
    pub fn new(opts: AssetStoreOpts) -> AssetResult<Self> {
        let tool = Arc::new(MagickTool::new(opts.tool.clone()));
        Self::with_tool(opts, tool)
    }

    /// Create a store using a custom conversion tool.
    pub fn with_tool(opts: AssetStoreOpts, tool: Arc<dyn ConvertTool>) -> AssetResult<Self> {
        opts.validate()?;
        let staging = StagingArea::new(AssetRoot::resolve(&opts.root, None)?.tmp_dir());
        Ok(Self {
            opts,
            staging,
            tool,
        })
    }

    /// Base directory.
    pub fn root(&self) -> &Path {
        &self.opts.root
    }

    /// Options this store was built with.
    pub fn opts(&self) -> &AssetStoreOpts {
        &self.opts
    }

    /// Resolve the namespaced root for `namespace_key` and make sure its `original/` exists.
    pub async fn namespace_root(&self, namespace_key: Option<&str>) -> AssetResult<AssetRoot> {
        let root = AssetRoot::resolve(&self.opts.root, namespace_key)?;
        root.ensure().await?;
        Ok(root)
    }

    /// Decode a `data:` URI and stage it as `name` (extension appended when missing).
    #[tracing::instrument(skip(self, data_uri), fields(root = %self.opts.root.display()))]
    pub async fn save_temp_base64(&self, name: &str, data_uri: &str) -> AssetResult<StagedFile> {
        self.staging.save_base64(name, data_uri).await
    }

    /// Stage `bytes` verbatim as `name`.
    #[tracing::instrument(skip(self, bytes), fields(root = %self.opts.root.display(), len = bytes.len()))]
    pub async fn save_temp_binary(&self, name: &str, bytes: &[u8]) -> AssetResult<StagedFile> {
        self.staging.save_binary(name, bytes).await
    }

    /// Stat a staged file; `None` when absent.
    pub async fn temp_file_exists(&self, name: &str) -> AssetResult<Option<Metadata>> {
        self.staging.exists(name).await
    }

    /// Delete staged files older than `max_age`. Never runs on its own.
    #[tracing::instrument(skip(self))]
    pub async fn purge_temp(&self, max_age: Duration) -> AssetResult<usize> {
        self.staging.purge_older_than(max_age).await
    }

    /// Write `bytes` straight to `original/<name>`, bypassing staging.
    #[tracing::instrument(skip(self, bytes, opts), fields(namespace = ?opts.namespace_key))]
    pub async fn save_original_binary(
        &self,
        name: &str,
        bytes: &[u8],
        opts: &ConvertOpts,
    ) -> AssetResult<PathBuf> {
        validate_file_name(name)?;
        let root = self.namespace_root(opts.namespace_key.as_deref()).await?;
        let path = root.original_dir().join(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AssetError::io("write", &path, e))?;
        tracing::debug!(path = %path.display(), "saved original");
        Ok(path)
    }

    /// Decode a `data:` URI and write it to `original/<base_name>.<ext>`, bypassing staging.
    #[tracing::instrument(skip(self, data_uri, opts), fields(namespace = ?opts.namespace_key))]
    pub async fn save_original_base64(
        &self,
        base_name: &str,
        data_uri: &str,
        opts: &ConvertOpts,
    ) -> AssetResult<PathBuf> {
        let payload = decode_data_uri(data_uri)?;
        let ext = payload.extension.ok_or_else(|| {
            AssetError::payload(format!("no extension known for '{}'", payload.mime_type))
        })?;
        self.save_original_binary(&format!("{base_name}.{ext}"), &payload.bytes, opts)
            .await
    }

    /// Commit the staged `original_file_name` and derive every variant in `specs`.
    ///
    /// Pipeline:
    /// 1. move `tmp/<original_file_name>` into `original/` (fails if it was never staged)
    /// 2. build one [`ConversionPlan`](crate::ConversionPlan) with a clause per spec
    /// 3. run it through the [`ConvertTool`] once
    /// 4. probe every output and the original
    ///
    /// The returned manifest holds one entry per spec plus the original, sorted by ascending
    /// width.
    ///
    /// A failure after the commit leaves the original in place and variants possibly partial; a
    /// repeat call after re-staging overwrites them.
    #[tracing::instrument(skip(self, specs, opts), fields(variants = specs.len(), namespace = ?opts.namespace_key))]
    pub async fn convert(
        &self,
        original_file_name: &str,
        specs: &[VariantSpec],
        opts: &ConvertOpts,
    ) -> AssetResult<ConversionManifest> {
        let root = AssetRoot::resolve(&self.opts.root, opts.namespace_key.as_deref())?;
        commit_and_derive(
            &root,
            &self.staging,
            self.tool.as_ref(),
            &self.opts,
            original_file_name,
            specs,
        )
        .await
    }

    /// Delete a namespace, or one asset's original and variants. Returns the removed paths.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, opts: &RemoveOpts) -> AssetResult<Vec<PathBuf>> {
        match opts.target()? {
            RemoveTarget::Namespace(key) => {
                let root = AssetRoot::resolve(&self.opts.root, Some(key))?;
                removal::remove_namespace(&root).await
            }
            RemoveTarget::Files {
                namespace_key,
                file_name,
                file_types,
            } => {
                let root = AssetRoot::resolve(&self.opts.root, namespace_key)?;
                removal::remove_files(&root, file_name, file_types).await
            }
        }
    }
}

//! Commit & derive: promote a staged file to `original/` and produce every requested variant
//! with a single tool invocation.

/// ImageMagick-backed [`tool::ConvertTool`].
pub mod magick;
/// Batched argument builder.
pub mod plan;
/// Tool trait and outcome.
pub mod tool;

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::AssetStoreOpts;
use crate::foundation::error::{AssetError, AssetResult};
use crate::foundation::fs::{split_file_name, validate_file_name};
use crate::layout::AssetRoot;
use crate::manifest::{original_entry, probe_entry};
use crate::model::{ConversionManifest, VariantSpec};
use crate::staging::StagingArea;

use plan::{ConversionPlan, VariantClause};
use tool::ConvertTool;

pub(crate) async fn commit_and_derive(
    root: &AssetRoot,
    staging: &StagingArea,
    tool: &dyn ConvertTool,
    opts: &AssetStoreOpts,
    original_file_name: &str,
    specs: &[VariantSpec],
) -> AssetResult<ConversionManifest> {
    validate_file_name(original_file_name)?;
    for spec in specs {
        spec.validate()?;
    }
    let (base_name, original_ext) = split_file_name(original_file_name);
    if original_ext.is_none()
        && let Some(spec) = specs.iter().find(|s| s.ext.is_none())
    {
        return Err(AssetError::usage(format!(
            "variant '{}' needs an explicit ext: '{original_file_name}' has no extension",
            spec.kind
        )));
    }

    let original_dir = root.ensure().await?;

    let staged_path = staging.path_for(original_file_name)?;
    let original_path = original_dir.join(original_file_name);
    match tokio::fs::rename(&staged_path, &original_path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AssetError::precondition(format!(
                "staged file '{}' does not exist",
                staged_path.display()
            )));
        }
        Err(e) => return Err(AssetError::io("commit", &staged_path, e)),
    }
    tracing::info!(
        from = %staged_path.display(),
        to = %original_path.display(),
        "committed original"
    );

    let mut plan = ConversionPlan::new(&original_path, opts.flags);
    let mut outputs: Vec<(&str, PathBuf)> = Vec::with_capacity(specs.len());
    let mut seen_kinds = HashSet::new();
    for spec in specs {
        let dir = if seen_kinds.insert(spec.kind.as_str()) {
            root.ensure_variant_dir(&spec.kind).await?
        } else {
            root.variant_dir(&spec.kind)
        };
        let ext = spec.ext.as_deref().or(original_ext).unwrap_or_default();
        let output = dir.join(format!("{base_name}.{ext}"));
        plan.push(VariantClause {
            kind: spec.kind.clone(),
            size: spec.size.clone(),
            quality: opts.quality,
            sampling_factor: opts.sampling_factor.clone(),
            output: output.clone(),
        });
        outputs.push((spec.kind.as_str(), output));
    }

    if plan.is_empty() {
        tracing::debug!(source = %original_path.display(), "no variants requested");
    } else {
        let outcome = tool.run(&plan).await?;
        tracing::debug!(exit_code = ?outcome.exit_code, "conversion finished");
    }

    let mut entries = Vec::with_capacity(outputs.len() + 1);
    for (kind, output) in outputs {
        entries.push(probe_entry(kind, output).await);
    }
    entries.push(original_entry(original_path, original_ext).await);
    Ok(ConversionManifest::from_unsorted(entries))
}

//! assetkit manages derived image assets on disk.
//!
//! An upload is staged in a shared `tmp/` directory, committed by a single move into
//! `original/`, and turned into any number of resized variants by **one** external
//! ImageMagick invocation. The caller gets back a [`ConversionManifest`] ordered by width.
//!
//! - Stage with [`AssetStore::save_temp_binary`] / [`AssetStore::save_temp_base64`]
//! - Commit and derive with [`AssetStore::convert`]
//! - Clean up with [`AssetStore::remove`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Typed options for the store and its operations.
pub mod config;
pub mod convert;
pub mod layout;
pub mod manifest;
/// Data model shared by every operation.
pub mod model;
pub mod payload;
mod removal;
pub mod staging;
mod store;

pub use crate::config::{AssetStoreOpts, ConvertOpts, RemoveOpts};
pub use crate::convert::magick::{MagickTool, MagickToolOpts};
pub use crate::convert::plan::{ConversionPlan, GlobalFlags, VariantClause};
pub use crate::convert::tool::{ConvertTool, ToolOutcome};
pub use crate::foundation::error::{AssetError, AssetResult, ProbeError};
pub use crate::foundation::fs::stat_or_absent;
pub use crate::layout::AssetRoot;
pub use crate::model::{AssetVariant, ConversionManifest, StagedFile, VariantSpec};
pub use crate::store::AssetStore;

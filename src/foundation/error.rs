use std::path::Path;

/// Result alias used across the crate.
pub type AssetResult<T> = Result<T, AssetError>;

/// Fatal failures surfaced to the caller of an [`AssetStore`](crate::AssetStore) operation.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    /// Malformed options or arguments (e.g. `remove` with neither mode selected).
    #[error("usage error: {0}")]
    Usage(String),

    /// A required on-disk state was missing (e.g. the staged file at commit time).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Filesystem failure other than "not found" during an existence probe.
    #[error("io error: {context}: {source}")]
    Io {
        /// Operation and path that failed.
        context: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The external conversion tool could not be spawned or awaited.
    #[error("process error: {0}")]
    Process(String),

    /// Inbound payload could not be decoded.
    #[error("payload error: {0}")]
    Payload(String),

    /// Anything else, wrapped with context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AssetError {
    /// Build a [`AssetError::Usage`].
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Build a [`AssetError::Precondition`].
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`AssetError::Process`].
    pub fn process(msg: impl Into<String>) -> Self {
        Self::Process(msg.into())
    }

    /// Build a [`AssetError::Payload`].
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }

    /// Build a [`AssetError::Io`] for operation `op` on `path`.
    pub fn io(op: &str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context: format!("{op} '{}'", path.display()),
            source,
        }
    }
}

/// Non-fatal failure while reading pixel dimensions of a file.
///
/// Never escapes `convert`: the affected manifest entry degrades to `0x0`.
#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    /// File could not be opened or read.
    #[error("probe io error: {0}")]
    Io(#[from] std::io::Error),

    /// Raster header could not be decoded.
    #[error("probe decode error: {0}")]
    Image(#[from] image::ImageError),

    /// SVG document could not be parsed.
    #[error("probe svg error: {0}")]
    Svg(String),

    /// Blocking probe task was cancelled or panicked.
    #[error("probe task failed: {0}")]
    Join(String),
}

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::convert::plan::ConversionPlan;
use crate::convert::tool::{ConvertTool, ToolOutcome};
use crate::foundation::error::{AssetError, AssetResult};

/// Options for [`MagickTool`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MagickToolOpts {
    /// Executable to spawn; looked up on `PATH` when not absolute.
    pub program: PathBuf,
}

impl MagickToolOpts {
    /// Use `program` as the ImageMagick executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for MagickToolOpts {
    fn default() -> Self {
        Self::new("convert")
    }
}

/// [`ConvertTool`] that spawns the system ImageMagick once per plan.
#[derive(Clone, Debug, Default)]
pub struct MagickTool {
    opts: MagickToolOpts,
}

impl MagickTool {
    /// Create a tool invoking `opts.program`.
    pub fn new(opts: MagickToolOpts) -> Self {
        Self { opts }
    }

    /// Executable this tool spawns.
    pub fn program(&self) -> &std::path::Path {
        &self.opts.program
    }

    /// Return `true` when the executable answers `-version`.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.opts.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl ConvertTool for MagickTool {
    async fn run(&self, plan: &ConversionPlan) -> AssetResult<ToolOutcome> {
        let args = plan.to_args();
        tracing::debug!(
            program = %self.opts.program.display(),
            source = %plan.source().display(),
            clauses = plan.clauses().len(),
            "spawning conversion"
        );

        let out = Command::new(&self.opts.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                AssetError::process(format!(
                    "failed to run '{}' (is ImageMagick installed and on PATH?): {e}",
                    self.opts.program.display()
                ))
            })?;

        let outcome = ToolOutcome {
            exit_code: out.status.code(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        };
        if !outcome.success() {
            // Warnings also yield non-zero codes; outputs are checked by probing instead.
            tracing::warn!(
                program = %self.opts.program.display(),
                status = %out.status,
                stderr = %outcome.stderr,
                "conversion tool exited unsuccessfully"
            );
        }
        Ok(outcome)
    }
}

use async_trait::async_trait;

use crate::convert::plan::ConversionPlan;
use crate::foundation::error::AssetResult;

/// How the conversion process finished.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOutcome {
    /// Exit code, `None` when terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured diagnostic output.
    pub stderr: String,
}

impl ToolOutcome {
    /// Whether the tool reported success.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Executes a [`ConversionPlan`] as one unit of work.
///
/// Contract: every clause of the plan is handled by a single invocation. Implementations return
/// `Err` only when the work could not be started or awaited; tool-reported failures (non-zero
/// exit, warnings) come back as a [`ToolOutcome`].
#[async_trait]
pub trait ConvertTool: Send + Sync {
    /// Run all clauses of `plan`.
    async fn run(&self, plan: &ConversionPlan) -> AssetResult<ToolOutcome>;
}

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Flags applied once to the decoded source before any clause runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalFlags {
    /// Drop embedded profiles and metadata (`-strip`).
    pub strip_metadata: bool,
    /// Flatten transparency onto the background (`-alpha remove`).
    pub remove_alpha: bool,
}

impl Default for GlobalFlags {
    fn default() -> Self {
        Self {
            strip_metadata: true,
            remove_alpha: true,
        }
    }
}

/// One self-contained derivative: clone the source, resize, encode, write, discard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantClause {
    /// Variant type label, carried for logging and in-process tools.
    pub kind: String,
    /// Resize geometry (e.g. `100x>`).
    pub size: String,
    /// Encoder quality, 1..=100.
    pub quality: u8,
    /// Chroma subsampling (e.g. `4:2:0`), if any.
    pub sampling_factor: Option<String>,
    /// Output file; its extension selects the encoder.
    pub output: PathBuf,
}

impl VariantClause {
    fn push_args(&self, args: &mut Vec<OsString>) {
        args.push("(".into());
        args.push("+clone".into());
        args.push("-resize".into());
        args.push(self.size.clone().into());
        if let Some(sf) = &self.sampling_factor {
            args.push("-sampling-factor".into());
            args.push(sf.clone().into());
        }
        args.push("-quality".into());
        args.push(self.quality.to_string().into());
        args.push("-write".into());
        args.push(self.output.clone().into_os_string());
        args.push("+delete".into());
        args.push(")".into());
    }
}

/// All derivatives of one source, serialized into a single tool invocation.
///
/// Clauses are appended in request order and never modified afterwards; [`Self::to_args`]
/// produces the flat argument vector once the plan is complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionPlan {
    source: PathBuf,
    flags: GlobalFlags,
    clauses: Vec<VariantClause>,
}

impl ConversionPlan {
    /// Start a plan reading from `source`.
    pub fn new(source: impl Into<PathBuf>, flags: GlobalFlags) -> Self {
        Self {
            source: source.into(),
            flags,
            clauses: Vec::new(),
        }
    }

    /// Append a clause.
    pub fn push(&mut self, clause: VariantClause) {
        self.clauses.push(clause);
    }

    /// Source image path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Global flags.
    pub fn flags(&self) -> GlobalFlags {
        self.flags
    }

    /// Clauses in request order.
    pub fn clauses(&self) -> &[VariantClause] {
        &self.clauses
    }

    /// Whether there is nothing to derive.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Flat ImageMagick argument vector:
    /// `source [globals] ( +clone -resize .. -quality .. -write out +delete ) ... null:`.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(4 + self.clauses.len() * 12);
        args.push(self.source.clone().into_os_string());
        if self.flags.strip_metadata {
            args.push("-strip".into());
        }
        if self.flags.remove_alpha {
            args.push("-alpha".into());
            args.push("remove".into());
        }
        for clause in &self.clauses {
            clause.push_args(&mut args);
        }
        // The remaining image list is discarded; every output was written by a clause.
        args.push("null:".into());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(kind: &str, size: &str, out: &str) -> VariantClause {
        VariantClause {
            kind: kind.to_string(),
            size: size.to_string(),
            quality: 80,
            sampling_factor: Some("4:2:0".to_string()),
            output: PathBuf::from(out),
        }
    }

    fn strs(args: &[OsString]) -> Vec<&str> {
        args.iter().map(|a| a.to_str().unwrap()).collect()
    }

    #[test]
    fn args_encode_every_clause_in_one_vector() {
        let mut plan = ConversionPlan::new("/r/original/example.jpg", GlobalFlags::default());
        plan.push(clause("medium", "100x>", "/r/medium/example.png"));
        plan.push(clause("thumbnail", "30x>", "/r/thumbnail/example.jpg"));

        let args = plan.to_args();
        assert_eq!(
            strs(&args),
            vec![
                "/r/original/example.jpg",
                "-strip",
                "-alpha",
                "remove",
                "(",
                "+clone",
                "-resize",
                "100x>",
                "-sampling-factor",
                "4:2:0",
                "-quality",
                "80",
                "-write",
                "/r/medium/example.png",
                "+delete",
                ")",
                "(",
                "+clone",
                "-resize",
                "30x>",
                "-sampling-factor",
                "4:2:0",
                "-quality",
                "80",
                "-write",
                "/r/thumbnail/example.jpg",
                "+delete",
                ")",
                "null:",
            ]
        );
    }

    #[test]
    fn global_flags_can_be_disabled() {
        let plan = ConversionPlan::new(
            "src.png",
            GlobalFlags {
                strip_metadata: false,
                remove_alpha: false,
            },
        );
        assert!(plan.is_empty());
        assert_eq!(strs(&plan.to_args()), vec!["src.png", "null:"]);
    }

    #[test]
    fn sampling_factor_is_optional() {
        let mut plan = ConversionPlan::new("s.png", GlobalFlags::default());
        let mut c = clause("t", "10x10", "t/s.png");
        c.sampling_factor = None;
        plan.push(c);
        let args = plan.to_args();
        assert!(!strs(&args).contains(&"-sampling-factor"));
        assert_eq!(plan.clauses().len(), 1);
    }
}

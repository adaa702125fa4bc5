pub mod asset;
pub mod contents;
pub mod orchestrator;
pub mod transform;

use std::fmt;
use std::path::PathBuf;

use crate::catalog::{AssetKind, AssetSpec};

pub use asset::AssetGenerator;
pub use orchestrator::{Orchestrator, ProgressEvent, RunSummary, SourceImages};
pub use transform::{ImageTransform, Resampler, TransformError};

/// Per-asset failure. Never aborts sibling assets.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("image transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("failed to write '{}': {source}", path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// How a single asset generation attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written,
    /// The destination already contained identical bytes.
    Unchanged,
    Failed { reason: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failed { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Written => write!(f, "created"),
            Outcome::Unchanged => write!(f, "unchanged"),
            Outcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Result of generating one asset for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub platform: String,
    pub kind: AssetKind,
    pub asset: AssetSpec,
    pub path: PathBuf,
    pub outcome: Outcome,
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

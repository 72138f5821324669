use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// File extension selected when no include pattern is given.
pub const DEFAULT_DOC_EXTENSION: &str = ".md";

/// Prefix of every acquisition directory created under `temp_root`.
pub const ACQUISITION_PREFIX: &str = "repo-docs-";

/// Host-environment settings for a pipeline: where acquisitions live and
/// which git program to run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineSettings {
    pub temp_root: PathBuf,
    pub git_program: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            temp_root: std::env::temp_dir(),
            git_program: "git".to_string(),
        }
    }
}

impl PipelineSettings {
    pub fn trace_loaded(&self) {
        info!(
            temp_root = %self.temp_root.display(),
            git_program = %self.git_program,
            "Loaded PipelineSettings"
        );
        debug!(?self, "PipelineSettings loaded (full debug)");
    }
}

/// Per-invocation options: selection patterns and the branch to acquire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Regular expressions a file path must match one of. Empty selects
    /// files ending in [`DEFAULT_DOC_EXTENSION`].
    #[serde(default)]
    pub includes: Vec<String>,
    /// Regular expressions that reject a path, applied after `includes`.
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub branch: Option<String>,
}

use std::path::PathBuf;

use thiserror::Error;

use crate::vcs::VcsError;

/// Every way a single pipeline run can fail.
///
/// Each variant carries the diagnostic of the step that failed. Nothing is
/// retried internally; callers re-run the whole pipeline if they want to.
#[derive(Error, Debug)]
pub enum DocsError {
    #[error("malformed repository URL {url:?}: {reason}")]
    MalformedRepositoryUrl { url: String, reason: String },

    #[error("invalid selection pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to acquire {url}: {source}")]
    AcquisitionFailed {
        url: String,
        #[source]
        source: VcsError,
    },

    #[error("revision metadata unavailable for {}: {source}", .path.display())]
    MetadataUnavailable {
        path: PathBuf,
        #[source]
        source: VcsError,
    },

    #[error("failed to traverse {}: {source}", .path.display())]
    TraversalError {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

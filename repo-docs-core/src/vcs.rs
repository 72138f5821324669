//! # vcs: the version-control client seen by the pipeline
//!
//! The pipeline needs exactly three things from a version-control client:
//! a shallow clone, the checked-out revision, and that revision's commit
//! timestamp. They are expressed by the [`VersionControl`] trait.
//!
//! ## Implementations
//! - [`GitCli`] shells out to the `git` program with `tokio::process`.
//! - `MockVersionControl` is generated by `mockall` for tests (enabled in
//!   `cfg(test)` and by the default `test-export-mocks` feature so that
//!   integration tests can use it too).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::locator::redact_url;

/// A request for a history-depth-1 working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
    pub url: String,
    /// Branch to check out; the remote's default branch when `None`.
    pub branch: Option<String>,
    pub destination: PathBuf,
}

#[derive(Error, Debug)]
pub enum VcsError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Version-control operations used by the pipeline.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Create a shallow working copy at `request.destination`.
    async fn shallow_clone(&self, request: &CloneRequest) -> Result<(), VcsError>;

    /// Identifier of the revision checked out in `checkout`.
    async fn head_revision(&self, checkout: &Path) -> Result<String, VcsError>;

    /// Commit timestamp of the revision checked out in `checkout`.
    async fn head_timestamp(&self, checkout: &Path) -> Result<String, VcsError>;
}

/// [`VersionControl`] backed by the `git` command-line client.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run git with `args`, returning trimmed stdout on a zero exit status.
    async fn run(&self, cwd: Option<&Path>, args: &[&str]) -> Result<String, VcsError> {
        let mut command = Command::new(&self.program);
        if let Some(dir) = cwd {
            command.arg("-C").arg(dir);
        }
        command.args(args);
        // Never block on a credential prompt; a missing repository must fail.
        command.env("GIT_TERMINAL_PROMPT", "0");
        // An abandoned run must not leave git writing into a disposed acquisition.
        command.kill_on_drop(true);

        let shown: Vec<String> = args.iter().map(|a| redact_url(a)).collect();
        let rendered = format!("{} {}", self.program, shown.join(" "));
        debug!(command = %rendered, "Running version-control command");

        let output = command.output().await.map_err(|e| VcsError::Launch {
            program: self.program.clone(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                command: rendered,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn shallow_clone(&self, request: &CloneRequest) -> Result<(), VcsError> {
        let destination = request.destination.to_string_lossy();
        let mut args = vec!["clone", "--depth", "1", "--quiet"];
        if let Some(branch) = request.branch.as_deref() {
            args.extend(["--branch", branch, "--single-branch"]);
        }
        args.push("--");
        args.push(&request.url);
        args.push(&destination);
        self.run(None, &args).await.map(|_| ())
    }

    async fn head_revision(&self, checkout: &Path) -> Result<String, VcsError> {
        self.run(Some(checkout), &["rev-parse", "HEAD"]).await
    }

    async fn head_timestamp(&self, checkout: &Path) -> Result<String, VcsError> {
        self.run(Some(checkout), &["log", "-1", "--format=%cI"]).await
    }
}

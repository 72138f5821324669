//! Repository acquisition: a shallow clone in a uniquely named, disposable
//! directory.
//!
//! The directory is owned by an [`Acquisition`] guard. The pipeline disposes
//! it explicitly on every exit path; `Drop` removes it as a fallback when the
//! owning future is abandoned before that happens.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::{PipelineSettings, ACQUISITION_PREFIX};
use crate::error::DocsError;
use crate::locator::redact_url;
use crate::vcs::{CloneRequest, VersionControl};

/// Exclusively owned working copy under the temporary root.
#[derive(Debug)]
pub struct Acquisition {
    path: PathBuf,
    disposed: bool,
}

impl Acquisition {
    /// Reserve a fresh `repo-docs-<uuid>` path under `temp_root`. Nothing is
    /// created on disk yet.
    fn claim(temp_root: &Path) -> Self {
        let path = temp_root.join(format!("{ACQUISITION_PREFIX}{}", Uuid::new_v4()));
        debug!(path = %path.display(), "Claimed acquisition path");
        Self {
            path,
            disposed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the working copy. A directory that was never created counts as
    /// removed.
    pub async fn dispose(mut self) -> std::io::Result<()> {
        let result = match tokio::fs::remove_dir_all(&self.path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        };
        self.disposed = true;
        match &result {
            Ok(()) => debug!(path = %self.path.display(), "Disposed acquisition"),
            Err(e) => warn!(error = ?e, path = %self.path.display(), "Failed to dispose acquisition"),
        }
        result
    }
}

impl Drop for Acquisition {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        match std::fs::remove_dir_all(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                warn!(error = ?e, path = %self.path.display(), "Failed to remove abandoned acquisition");
            }
            _ => debug!(path = %self.path.display(), "Removed abandoned acquisition"),
        }
    }
}

/// Shallow-clone `url` (at `branch`, if given) into a new acquisition.
///
/// On failure any partially created directory is removed before the error
/// is returned.
pub async fn acquire<V>(
    vcs: &V,
    settings: &PipelineSettings,
    url: &str,
    branch: Option<&str>,
) -> Result<Acquisition, DocsError>
where
    V: VersionControl + ?Sized,
{
    let shown_url = redact_url(url);
    let acquisition = Acquisition::claim(&settings.temp_root);
    let request = CloneRequest {
        url: url.to_string(),
        branch: branch.map(str::to_string),
        destination: acquisition.path().to_path_buf(),
    };

    match vcs.shallow_clone(&request).await {
        Ok(()) => {
            info!(
                repo_url = %shown_url,
                branch = branch.unwrap_or("<default>"),
                path = %acquisition.path().display(),
                "Successfully cloned git repository"
            );
            Ok(acquisition)
        }
        Err(e) => {
            error!(
                error = ?e,
                repo_url = %shown_url,
                branch = branch.unwrap_or("<default>"),
                "Failed to clone git repository"
            );
            // The disposal outcome is already logged; the clone error wins.
            let _ = acquisition.dispose().await;
            Err(DocsError::AcquisitionFailed {
                url: shown_url,
                source: e,
            })
        }
    }
}

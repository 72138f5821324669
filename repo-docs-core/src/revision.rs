use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::DocsError;
use crate::locator::RepositoryIdentity;
use crate::vcs::{VcsError, VersionControl};

/// Provenance of one run: who the repository belongs to and which revision
/// was aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryMetadata {
    #[serde(flatten)]
    pub identity: RepositoryIdentity,
    pub revision: String,
    pub committed_at: String,
}

/// Query the checked-out revision and its commit timestamp.
pub async fn inspect<V>(
    vcs: &V,
    checkout: &Path,
    identity: &RepositoryIdentity,
) -> Result<RepositoryMetadata, DocsError>
where
    V: VersionControl + ?Sized,
{
    let unavailable = |e: VcsError| {
        error!(error = ?e, path = %checkout.display(), "Failed to read revision metadata");
        DocsError::MetadataUnavailable {
            path: checkout.to_path_buf(),
            source: e,
        }
    };

    let revision = vcs.head_revision(checkout).await.map_err(unavailable)?;
    let committed_at = vcs.head_timestamp(checkout).await.map_err(unavailable)?;

    info!(revision = %revision, committed_at = %committed_at, "Inspected revision");
    Ok(RepositoryMetadata {
        identity: identity.clone(),
        revision: revision.trim().to_string(),
        committed_at: committed_at.trim().to_string(),
    })
}

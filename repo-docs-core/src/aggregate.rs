use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tracing::{debug, error, info};

use crate::error::DocsError;
use crate::locator::RepositoryIdentity;

/// Read every selected file and join them into one document.
///
/// The document starts with `# owner/name`; each file follows as a
/// `## relative/path` header and its raw content. Reads run concurrently,
/// but blocks are emitted in the order of `paths`. Any unreadable or
/// non-UTF-8 file aborts the whole aggregation.
pub async fn aggregate(
    paths: &[PathBuf],
    root: &Path,
    identity: &RepositoryIdentity,
) -> Result<String, DocsError> {
    info!(count = paths.len(), "Aggregating selected files");

    let reads = paths.iter().map(|path| async move {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                debug!(path = %path.display(), size = content.len(), "Read selected file");
                Ok((relative_path(path, root), content))
            }
            Err(e) => {
                error!(error = ?e, path = %path.display(), "Failed to read selected file");
                Err(DocsError::ReadError {
                    path: path.clone(),
                    source: e,
                })
            }
        }
    });
    let blocks = try_join_all(reads).await?;

    let mut document = format!("# {}/{}\n\n", identity.owner, identity.name);
    for (relative, content) in &blocks {
        document.push_str(&format!("## {relative}\n\n{content}\n\n"));
    }

    let document = document.trim().to_string();
    info!(bytes = document.len(), "Aggregation complete");
    Ok(document)
}

/// `path` relative to `root`, always with `/` separators.
pub fn relative_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

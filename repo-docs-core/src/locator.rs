use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DocsError;

/// Owner and name of a repository, taken from its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    pub owner: String,
    #[serde(rename = "repo")]
    pub name: String,
}

/// Parse `scheme://host/owner/name[.git][/]` into a [`RepositoryIdentity`].
///
/// Trailing slashes and a trailing `.git` are ignored. The first two path
/// segments are the owner and name; both must be present and non-empty.
pub fn parse_repository_url(input: &str) -> Result<RepositoryIdentity, DocsError> {
    let malformed = |reason: &str| DocsError::MalformedRepositoryUrl {
        url: redact_url(input),
        reason: reason.to_string(),
    };

    let url = Url::parse(input).map_err(|e| malformed(&e.to_string()))?;

    let path = url.path().trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut segments = path.trim_start_matches('/').split('/');

    let owner = segments.next().unwrap_or_default();
    let name = segments.next().unwrap_or_default();
    if owner.is_empty() {
        return Err(malformed("missing owner segment"));
    }
    if name.is_empty() {
        return Err(malformed("missing repository name segment"));
    }

    Ok(RepositoryIdentity {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

/// `input` with any username and password removed, for logs and error
/// messages. Anything that is not a URL carrying credentials is returned
/// unchanged.
pub fn redact_url(input: &str) -> String {
    match Url::parse(input) {
        Ok(mut url) if !url.username().is_empty() || url.password().is_some() => {
            let _ = url.set_password(None);
            let _ = url.set_username("");
            url.to_string()
        }
        _ => input.to_string(),
    }
}

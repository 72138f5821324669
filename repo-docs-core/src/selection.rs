//! File selection: which files of an acquired copy end up in the document.
//!
//! Rules are regular expressions tested against a file's full filesystem
//! path. Inclusion is decided first (user patterns, or the documentation
//! extension when there are none) and exclusion last, so an exclude always
//! wins over an include.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::config::DEFAULT_DOC_EXTENSION;
use crate::error::DocsError;

/// Version-control metadata directory, never part of the document tree.
const VCS_METADATA_DIR: &str = ".git";

/// Compiled include/exclude patterns for one invocation.
#[derive(Debug, Clone)]
pub struct SelectionRules {
    includes: Vec<Regex>,
    excludes: Vec<Regex>,
}

impl SelectionRules {
    /// Compile every pattern, failing on the first invalid one.
    pub fn compile<S: AsRef<str>>(includes: &[S], excludes: &[S]) -> Result<Self, DocsError> {
        Ok(Self {
            includes: compile_all(includes)?,
            excludes: compile_all(excludes)?,
        })
    }

    pub fn is_selected(&self, path: &str) -> bool {
        let included = if self.includes.is_empty() {
            path.to_lowercase().ends_with(DEFAULT_DOC_EXTENSION)
        } else {
            self.includes.iter().any(|re| re.is_match(path))
        };
        included && !self.excludes.iter().any(|re| re.is_match(path))
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, DocsError> {
    patterns
        .iter()
        .map(|p| {
            let pattern = p.as_ref();
            Regex::new(pattern).map_err(|e| DocsError::InvalidPattern {
                pattern: pattern.to_string(),
                source: e,
            })
        })
        .collect()
}

/// Walk `root` depth-first and return the selected regular files in
/// traversal order.
///
/// Siblings are visited in file-name order, so an unchanged tree always
/// yields the same sequence. Symlinks are neither followed nor selected.
pub fn select_files(root: &Path, rules: &SelectionRules) -> Result<Vec<PathBuf>, DocsError> {
    info!(root = %root.display(), "Selecting files");
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.depth() > 0
                && entry.file_type().is_dir()
                && entry.file_name() == VCS_METADATA_DIR)
        });

    let mut selected = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            error!(error = ?e, path = %path.display(), "Failed to list directory");
            DocsError::TraversalError { path, source: e }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if rules.is_selected(&entry.path().to_string_lossy()) {
            debug!(path = %entry.path().display(), "Selected file");
            selected.push(entry.into_path());
        }
    }

    info!(count = selected.len(), "Completed file selection");
    Ok(selected)
}

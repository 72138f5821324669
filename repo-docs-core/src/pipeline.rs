//! High-level pipeline: repository URL in, aggregated documentation out.
//!
//! This module sequences the pipeline steps for one repository:
//!   - Parses the URL into owner/name ([`crate::locator`])
//!   - Compiles include/exclude patterns ([`crate::selection::SelectionRules`])
//!   - Shallow-clones the repository into a disposable directory ([`crate::acquire`])
//!   - Reads revision metadata, selects files and aggregates them
//!   - Disposes of the clone, whatever happened in the steps before
//!
//! # Major Types
//! - [`DocsPipeline`]: a version-control client plus [`PipelineSettings`]
//! - [`RepoDocs`]: the aggregated document and its [`RepositoryMetadata`]
//! - [`PipelineStage`]: stages a run passes through, reported in traces
//!
//! # Error Handling
//! Steps are fail-fast and nothing is retried. URL and pattern errors are
//! raised before anything touches the disk. Once a clone exists, any error is
//! returned only after the clone has been removed; a failure to remove it is
//! logged and never replaces the primary result.
//!
//! # Navigation
//! - Main entrypoint: [`generate_repo_docs`]
//! - Injectable entrypoint: [`DocsPipeline::generate`]

use std::fmt;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::acquire::{acquire, Acquisition};
use crate::aggregate::aggregate;
use crate::config::{GenerateOptions, PipelineSettings};
use crate::error::DocsError;
use crate::locator::{parse_repository_url, redact_url, RepositoryIdentity};
use crate::revision::{inspect, RepositoryMetadata};
use crate::selection::{select_files, SelectionRules};
use crate::vcs::{GitCli, VersionControl};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoDocs {
    pub output: String,
    pub metadata: RepositoryMetadata,
}

/// Stages of a run. Every run that reaches `Acquired` ends in `Disposed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    NotStarted,
    Acquired,
    Inspected,
    Selected,
    Aggregated,
    Disposed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::NotStarted => "not_started",
            PipelineStage::Acquired => "acquired",
            PipelineStage::Inspected => "inspected",
            PipelineStage::Selected => "selected",
            PipelineStage::Aggregated => "aggregated",
            PipelineStage::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

fn advance(stage: &mut PipelineStage, next: PipelineStage) {
    info!(from = %stage, to = %next, "[PIPELINE] Stage transition");
    *stage = next;
}

/// A version-control client and the settings it runs under.
pub struct DocsPipeline<V> {
    vcs: V,
    settings: PipelineSettings,
}

impl<V> DocsPipeline<V>
where
    V: VersionControl,
{
    pub fn new(vcs: V, settings: PipelineSettings) -> Self {
        Self { vcs, settings }
    }

    /// Run the whole pipeline for `url`.
    pub async fn generate(
        &self,
        url: &str,
        options: &GenerateOptions,
    ) -> Result<RepoDocs, DocsError> {
        info!(repo_url = %redact_url(url), ?options, "[PIPELINE] Starting repository documentation run");
        let mut stage = PipelineStage::NotStarted;

        let identity = parse_repository_url(url)?;
        let rules = SelectionRules::compile(&options.includes, &options.excludes)?;

        let acquisition =
            acquire(&self.vcs, &self.settings, url, options.branch.as_deref()).await?;
        advance(&mut stage, PipelineStage::Acquired);

        let outcome = self
            .process(&acquisition, &identity, &rules, &mut stage)
            .await;
        let last_stage = stage;

        if let Err(e) = acquisition.dispose().await {
            warn!(error = ?e, "[PIPELINE] Disposal failed; continuing with run outcome");
        }
        advance(&mut stage, PipelineStage::Disposed);

        match &outcome {
            Ok(docs) => info!(
                owner = %docs.metadata.identity.owner,
                repo = %docs.metadata.identity.name,
                revision = %docs.metadata.revision,
                bytes = docs.output.len(),
                "[PIPELINE] Run complete"
            ),
            Err(e) => error!(error = %e, stage = %last_stage, "[PIPELINE][ERROR] Run failed"),
        }
        outcome
    }

    async fn process(
        &self,
        acquisition: &Acquisition,
        identity: &RepositoryIdentity,
        rules: &SelectionRules,
        stage: &mut PipelineStage,
    ) -> Result<RepoDocs, DocsError> {
        let root = acquisition.path();

        let metadata = inspect(&self.vcs, root, identity).await?;
        advance(stage, PipelineStage::Inspected);

        let walk_root = root.to_path_buf();
        let walk_rules = rules.clone();
        // The walk is blocking filesystem work; keep it off the async workers.
        let selected = tokio::task::spawn_blocking(move || select_files(&walk_root, &walk_rules))
            .await
            .unwrap_or_else(|e| std::panic::resume_unwind(e.into_panic()))?;
        advance(stage, PipelineStage::Selected);

        let output = aggregate(&selected, root, identity).await?;
        advance(stage, PipelineStage::Aggregated);

        Ok(RepoDocs { output, metadata })
    }
}

/// Generate the documentation of `url` using the system `git` client and
/// default settings.
pub async fn generate_repo_docs(
    url: &str,
    options: &GenerateOptions,
) -> Result<RepoDocs, DocsError> {
    let settings = PipelineSettings::default();
    let vcs = GitCli::new(settings.git_program.clone());
    DocsPipeline::new(vcs, settings).generate(url, options).await
}

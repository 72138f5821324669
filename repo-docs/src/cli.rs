//! This module implements the CLI interface for repo-docs: command parsing,
//! config resolution and printing of the pipeline's result.
//!
//! All pipeline logic (cloning, selection, aggregation, cleanup) lives in the
//! [`repo-docs-core`] crate. This module is strictly CLI glue.
//!
//! ## Features
//! - Entry struct [`Cli`] defines the user-facing options and subcommands.
//! - Async entrypoint ([`run`]) for programmatic invocation and integration testing.
//! - Output as plain text (document on stdout, summary on stderr) or as JSON.
//!
//! [`repo-docs-core`]: ../../repo-docs-core/
use crate::load_config::{load_config, resolve, FlagOverrides};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use repo_docs_core::locator::redact_url;
use repo_docs_core::{DocsPipeline, GitCli, RepoDocs};
use std::path::{Path, PathBuf};

/// CLI for repo-docs: aggregate a repository's documentation into one document.
#[derive(Parser)]
#[clap(
    name = "repo-docs",
    version,
    about = "Clone a repository and aggregate its documentation files into a single document"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate the documentation files of a repository
    Generate {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,
        /// Regular expression a file path must match (repeatable; default: *.md files)
        #[clap(long = "include", value_name = "REGEX")]
        includes: Vec<String>,
        /// Regular expression that excludes a file path (repeatable)
        #[clap(long = "exclude", value_name = "REGEX")]
        excludes: Vec<String>,
        /// Branch to clone instead of the remote's default branch
        #[clap(long)]
        branch: Option<String>,
        /// Path to a YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Write the result to this file instead of stdout
        #[clap(long, short)]
        output: Option<PathBuf>,
        /// Output format
        #[clap(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The document itself; metadata summary on stderr
    Text,
    /// `{ output, metadata }` as JSON
    Json,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Generate {
            url,
            includes,
            excludes,
            branch,
            config,
            output,
            format,
        } => {
            let file_config = config.map(load_config).transpose()?;
            let resolved = resolve(
                file_config,
                FlagOverrides {
                    includes,
                    excludes,
                    branch,
                },
            );
            resolved.settings.trace_loaded();

            tracing::info!(command = "generate", repo_url = %redact_url(&url), "Starting documentation run");
            let vcs = GitCli::new(resolved.settings.git_program.clone());
            let pipeline = DocsPipeline::new(vcs, resolved.settings);
            let docs = match pipeline.generate(&url, &resolved.options).await {
                Ok(docs) => docs,
                Err(e) => {
                    tracing::error!(command = "generate", error = %e, "Documentation run failed");
                    return Err(anyhow::Error::new(e));
                }
            };

            emit(&docs, format, output.as_deref())?;
            tracing::info!(command = "generate", "Documentation run complete");
            Ok(())
        }
    }
}

fn emit(docs: &RepoDocs, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => {
            let meta = &docs.metadata;
            eprintln!(
                "{}/{} @ {} ({})",
                meta.identity.owner, meta.identity.name, meta.revision, meta.committed_at
            );
            docs.output.clone()
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(docs).context("Failed to serialise result as JSON")?
        }
    };

    match output {
        Some(path) => std::fs::write(path, format!("{rendered}\n"))
            .with_context(|| format!("Failed to write output to {:?}", path)),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

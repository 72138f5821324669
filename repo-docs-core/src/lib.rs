#![doc = "repo-docs-core: core pipeline library for repo-docs."]

//! This crate clones a repository, selects its documentation files and
//! aggregates them into a single text document with provenance metadata.
//! Argument parsing and output formatting live in the `repo-docs` CLI crate.
//!
//! # Usage
//! Call [`generate_repo_docs`] for the default git-backed pipeline, or build a
//! [`DocsPipeline`] to inject a [`VersionControl`] implementation or a
//! different temporary root.

pub mod acquire;
pub mod aggregate;
pub mod config;
pub mod error;
pub mod locator;
pub mod pipeline;
pub mod revision;
pub mod selection;
pub mod vcs;

pub use config::{GenerateOptions, PipelineSettings};
pub use error::DocsError;
pub use locator::{parse_repository_url, RepositoryIdentity};
pub use pipeline::{generate_repo_docs, DocsPipeline, PipelineStage, RepoDocs};
pub use revision::RepositoryMetadata;
pub use vcs::{CloneRequest, GitCli, VcsError, VersionControl};

//! `load_config` module: loads the optional YAML config file and merges it with
//! command-line flags and environment variables into the core's option types.
//!
//! This module is the only place where user-supplied YAML is parsed.
//!
//! # Responsibilities
//! - Parse the YAML file into [`FileConfig`]
//! - Merge file values, flags and environment into [`ResolvedConfig`]
//! - Produce clear diagnostics: a config that cannot be read or parsed fails the run
//!
//! # Precedence
//! - `includes` / `excludes`: file entries first, then flag entries
//! - `branch`: the flag replaces the file value
//! - `temp_root` / `git_program`: file, then `REPO_DOCS_TEMP_ROOT` / `REPO_DOCS_GIT`,
//!   then the core defaults
//!
//! # Errors
//! All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{Context, Result};
use repo_docs_core::{GenerateOptions, PipelineSettings};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const TEMP_ROOT_ENV: &str = "REPO_DOCS_TEMP_ROOT";
pub const GIT_PROGRAM_ENV: &str = "REPO_DOCS_GIT";

/// Contents of a repo-docs YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    pub branch: Option<String>,
    pub temp_root: Option<PathBuf>,
    pub git_program: Option<String>,
}

/// Selection rules and branch given on the command line.
#[derive(Debug, Default, Clone)]
pub struct FlagOverrides {
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub branch: Option<String>,
}

/// Everything the pipeline needs for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub options: GenerateOptions,
    pub settings: PipelineSettings,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let content = fs::read_to_string(path_ref).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
        e
    })
    .with_context(|| format!("Failed to read config file {:?}", path_ref))?;

    let config: FileConfig = serde_yaml::from_str(&content).map_err(|e| {
        error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
        anyhow::anyhow!("Failed to parse config YAML {:?}: {e}", path_ref)
    })?;

    info!(
        config_path = ?path_ref,
        includes = config.includes.len(),
        excludes = config.excludes.len(),
        "Parsed config YAML successfully"
    );
    Ok(config)
}

/// Merge an optional file config with command-line flags and the environment.
pub fn resolve(file: Option<FileConfig>, flags: FlagOverrides) -> ResolvedConfig {
    let file = file.unwrap_or_default();
    let defaults = PipelineSettings::default();

    let mut includes = file.includes;
    includes.extend(flags.includes);
    let mut excludes = file.excludes;
    excludes.extend(flags.excludes);

    let temp_root = file
        .temp_root
        .or_else(|| std::env::var_os(TEMP_ROOT_ENV).map(PathBuf::from))
        .unwrap_or(defaults.temp_root);
    let git_program = file
        .git_program
        .or_else(|| std::env::var(GIT_PROGRAM_ENV).ok())
        .unwrap_or(defaults.git_program);

    ResolvedConfig {
        options: GenerateOptions {
            includes,
            excludes,
            branch: flags.branch.or(file.branch),
        },
        settings: PipelineSettings {
            temp_root,
            git_program,
        },
    }
}

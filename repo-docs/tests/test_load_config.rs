use repo_docs::load_config::{
    load_config, resolve, FileConfig, FlagOverrides, GIT_PROGRAM_ENV, TEMP_ROOT_ENV,
};
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var(TEMP_ROOT_ENV);
    env::remove_var(GIT_PROGRAM_ENV);
}

/// A full config file parses into every field.
#[test]
#[serial]
fn test_load_config_success_all_fields() {
    let config_yaml = r#"
includes:
  - "docs/.*\\.md"
  - "README\\.md$"
excludes:
  - "CHANGELOG"
branch: release
temp_root: ./tmp/acquisitions
git_program: /usr/local/bin/git
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    let config = load_config(config_file.path()).expect("Config should load");

    assert_eq!(config.includes, vec![r"docs/.*\.md", r"README\.md$"]);
    assert_eq!(config.excludes, vec!["CHANGELOG"]);
    assert_eq!(config.branch.as_deref(), Some("release"));
    assert_eq!(config.temp_root, Some(PathBuf::from("./tmp/acquisitions")));
    assert_eq!(config.git_program.as_deref(), Some("/usr/local/bin/git"));
}

#[test]
#[serial]
fn test_load_config_empty_mapping_uses_defaults() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "{}\n").unwrap();

    let config = load_config(config_file.path()).expect("Config should load");
    assert_eq!(config, FileConfig::default());
}

#[test]
#[serial]
fn test_load_config_rejects_unknown_keys_and_missing_files() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "include: [\"typo\"]\n").unwrap();
    let err = load_config(config_file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config YAML"), "{err}");

    let err = load_config("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"), "{err}");
}

#[test]
#[serial]
fn test_resolve_merges_file_and_flags() {
    clear_env();
    let file = FileConfig {
        includes: vec!["from-file".into()],
        excludes: vec!["skip-file".into()],
        branch: Some("file-branch".into()),
        temp_root: Some(PathBuf::from("/srv/tmp")),
        git_program: None,
    };
    let flags = FlagOverrides {
        includes: vec!["from-flag".into()],
        excludes: vec![],
        branch: Some("flag-branch".into()),
    };

    let resolved = resolve(Some(file), flags);

    assert_eq!(resolved.options.includes, vec!["from-file", "from-flag"]);
    assert_eq!(resolved.options.excludes, vec!["skip-file"]);
    assert_eq!(resolved.options.branch.as_deref(), Some("flag-branch"));
    assert_eq!(resolved.settings.temp_root, PathBuf::from("/srv/tmp"));
    assert_eq!(resolved.settings.git_program, "git");
}

#[test]
#[serial]
fn test_resolve_falls_back_to_environment() {
    clear_env();
    env::set_var(TEMP_ROOT_ENV, "/var/tmp/repo-docs-test");
    env::set_var(GIT_PROGRAM_ENV, "git-custom");

    let resolved = resolve(None, FlagOverrides::default());

    assert_eq!(
        resolved.settings.temp_root,
        PathBuf::from("/var/tmp/repo-docs-test")
    );
    assert_eq!(resolved.settings.git_program, "git-custom");
    assert!(resolved.options.includes.is_empty());
    assert!(resolved.options.branch.is_none());
    clear_env();
}

#[test]
#[serial]
fn test_resolve_file_branch_used_without_flag() {
    clear_env();
    let file = FileConfig {
        branch: Some("docs".into()),
        ..FileConfig::default()
    };

    let resolved = resolve(Some(file), FlagOverrides::default());

    assert_eq!(resolved.options.branch.as_deref(), Some("docs"));
    assert_eq!(resolved.settings.temp_root, env::temp_dir());
}

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .arg("-C")
        .arg(dir)
        .args([
            "-c",
            "user.name=Repo Docs",
            "-c",
            "user.email=repo-docs@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .status()
        .expect("git should be installed");
    assert!(status.success(), "git {:?} failed", args);
}

/// Creates a local repository with README.md and docs/intro.md committed.
fn create_source_repo() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("Creating temp dir failed");
    let repo = tmp.path().join("acme").join("widgets");
    fs::create_dir_all(repo.join("docs")).unwrap();
    git(&repo, &["init", "--quiet"]);
    fs::write(repo.join("README.md"), "# Widgets\n").unwrap();
    fs::write(repo.join("docs/intro.md"), "Intro text\n").unwrap();
    git(&repo, &["add", "."]);
    git(&repo, &["commit", "--quiet", "-m", "initial"]);
    (tmp, repo)
}

fn repo_docs_cmd(temp_root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("repo-docs").expect("Binary exists");
    cmd.env("REPO_DOCS_TEMP_ROOT", temp_root)
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn help_lists_generate_subcommand() {
    let mut cmd = Command::cargo_bin("repo-docs").expect("Binary exists");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn malformed_url_exits_non_zero() {
    let temp_root = TempDir::new().unwrap();
    repo_docs_cmd(temp_root.path())
        .args(["generate", "https://github.com/onlyowner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed repository URL"));
}

#[test]
fn invalid_pattern_exits_non_zero_without_cloning() {
    let temp_root = TempDir::new().unwrap();
    repo_docs_cmd(temp_root.path())
        .args(["generate", "https://github.com/acme/widgets", "--include", "("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid selection pattern"));
    assert_eq!(fs::read_dir(temp_root.path()).unwrap().count(), 0);
}

#[test]
fn generate_prints_document_to_stdout() {
    let (_src, repo) = create_source_repo();
    let temp_root = TempDir::new().unwrap();

    repo_docs_cmd(temp_root.path())
        .arg("generate")
        .arg(format!("file://{}", repo.display()))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("## README.md\n\n# Widgets")
                .and(predicate::str::contains("## docs/intro.md\n\nIntro text")),
        );
    assert_eq!(fs::read_dir(temp_root.path()).unwrap().count(), 0);
}

#[test]
fn generate_writes_json_to_output_file() {
    let (_src, repo) = create_source_repo();
    let temp_root = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let out_file = out_dir.path().join("docs.json");

    repo_docs_cmd(temp_root.path())
        .arg("generate")
        .arg(format!("file://{}", repo.display()))
        .args(["--exclude", "README", "--format", "json", "--output"])
        .arg(&out_file)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_file).unwrap()).unwrap();
    let output = json["output"].as_str().unwrap();
    assert!(output.contains("## docs/intro.md"));
    assert!(!output.contains("## README.md"));
    assert_eq!(json["metadata"]["revision"].as_str().unwrap().len(), 40);
    assert!(json["metadata"]["committedAt"].is_string());
}

#[test]
fn config_file_patterns_are_applied() {
    let (_src, repo) = create_source_repo();
    let temp_root = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    let config = config_dir.path().join("repo-docs.yaml");
    fs::write(&config, "includes:\n  - 'docs/.*\\.md'\n").unwrap();

    repo_docs_cmd(temp_root.path())
        .arg("generate")
        .arg(format!("file://{}", repo.display()))
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("## docs/intro.md")
                .and(predicate::str::contains("## README.md").not()),
        );
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use repo_docs::cli::{run, Cli, Commands, OutputFormat};

    // A malformed URL fails before any clone is attempted.
    let cli = Cli {
        command: Commands::Generate {
            url: "https://github.com/onlyowner".into(),
            includes: vec![],
            excludes: vec![],
            branch: None,
            config: None,
            output: None,
            format: OutputFormat::Text,
        },
    };

    let result = run(cli).await;
    assert!(result.is_err());

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}

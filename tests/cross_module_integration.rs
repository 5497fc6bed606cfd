//! Config, runner, process execution, audit and error translation together.
//!
//! The configured tool is `/bin/sh`; each test drops a script named after the
//! sub-command into the working folder, so `sh <verb> <args..>` runs it. The
//! `add` script answers the version check the runner makes first.
#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tfvc_bridge::config::Config;
use tfvc_bridge::error_translation::ErrorTranslator;
use tfvc_bridge::{
    Dialect, RunnerError, SharedServerContext, TfCommandLineRunner, TfVersion, TfvcRepository,
};
use tokio_util::sync::CancellationToken;

fn write_config(dir: &Path) -> Config {
    let path = dir.join("config.toml");
    let contents = format!(
        "[tfvc]\nlocation = \"/bin/sh\"\n\n[execution]\ntimeout_seconds = 2\n\n[audit]\nlog_commands = true\nlog_path = \"{}\"\n",
        dir.join("history.log").display()
    );
    fs::write(&path, contents).unwrap();
    Config::load_from(&path).unwrap()
}

const BANNER_SCRIPT: &str =
    "echo 'Team Explorer Everywhere Command Line Client (Version 14.134.0.201803131212)'\n";

fn write_script(workspace: &Path, verb: &str, body: &str) {
    fs::write(workspace.join(verb), body).unwrap();
}

fn setup() -> (TempDir, PathBuf, TfvcRepository) {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();
    write_script(&workspace, "add", BANNER_SCRIPT);

    let config = write_config(temp.path());
    let runner = TfCommandLineRunner::from_config(&config).unwrap();
    assert_eq!(runner.dialect(), Dialect::Clc);

    let repo = TfvcRepository::new(&workspace, Arc::new(runner), SharedServerContext::default());
    (temp, workspace, repo)
}

#[tokio::test]
async fn test_undo_through_real_process() {
    let (temp, workspace, repo) = setup();
    // $1 is -noprompt, the paths follow
    write_script(&workspace, "undo", "shift\nfor f in \"$@\"; do echo \"Undoing edit: $f\"; done\n");

    let files = repo
        .undo(vec![PathBuf::from("a.txt"), PathBuf::from("b c.txt")], &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(files, vec![PathBuf::from("a.txt"), PathBuf::from("b c.txt")]);

    let log = fs::read_to_string(temp.path().join("history.log")).unwrap();
    assert!(log.contains("[exit:0] add -noprompt -?"));
    assert!(log.contains("[exit:0] undo -noprompt a.txt b c.txt"));
}

#[tokio::test]
async fn test_old_tool_stops_before_command() {
    let (temp, workspace, repo) = setup();
    write_script(
        &workspace,
        "add",
        "echo 'Team Explorer Everywhere Command Line Client (Version 14.0.3.201603291047)'\n",
    );
    write_script(&workspace, "undo", "echo ran > undo-ran\n");

    let err = repo
        .undo(vec![PathBuf::from("a.txt")], &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RunnerError::VersionTooOld { found, .. } if found == TfVersion::new(14, 0, 3)));
    assert!(!workspace.join("undo-ran").exists());

    let log = fs::read_to_string(temp.path().join("history.log")).unwrap();
    assert_eq!(log.lines().count(), 1);
}

#[tokio::test]
async fn test_version_check_through_real_process() {
    let (_temp, _workspace, repo) = setup();

    let version = repo.check_version(&CancellationToken::new()).await.unwrap();
    assert_eq!(version, TfVersion::new(14, 134, 0));
}

#[tokio::test]
async fn test_failure_translates_to_friendly_message() {
    let (_temp, workspace, repo) = setup();
    write_script(
        &workspace,
        "rename",
        "echo 'The item a.txt could not be found in your workspace, or you do not have permission to access it.' >&2\nexit 100\n",
    );

    let err = repo
        .rename(PathBuf::from("a.txt"), PathBuf::from("b.txt"), &CancellationToken::new())
        .await
        .unwrap_err();
    let friendly = ErrorTranslator::translate(&err);

    assert!(friendly.simple_message.contains("could not be found in your workspace"));
    assert!(friendly.suggestion.is_some());
    assert!(friendly.raw_error.contains("Exit code: 100"));
}

#[tokio::test]
async fn test_timeout_from_config() {
    let (temp, workspace, repo) = setup();
    write_script(&workspace, "checkin", "sleep 10\n");

    let err = repo
        .checkin(vec![PathBuf::from("a.txt")], None, Vec::new(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RunnerError::TimedOut(2)));

    let log = fs::read_to_string(temp.path().join("history.log")).unwrap();
    assert!(log.contains("[TIMEOUT] checkin -noprompt a.txt"));
}

#[tokio::test]
async fn test_proxy_from_config_reaches_process() {
    let (_temp, workspace, repo) = setup();
    let config_with_proxy = {
        let mut config = Config::default();
        config.tfvc.location = Some(PathBuf::from("/bin/sh"));
        config.tfvc.proxy = Some("http://proxy:8888".to_string());
        config.audit.log_commands = false;
        config
    };
    let runner = TfCommandLineRunner::from_config(&config_with_proxy).unwrap();
    let repo_with_proxy = TfvcRepository::new(repo.path(), Arc::new(runner), SharedServerContext::default());

    // Echo the last argument back as an undone file
    write_script(&workspace, "undo", "for last; do :; done\necho \"Undoing edit: $last\"\n");

    let files = repo_with_proxy
        .undo(vec![PathBuf::from("a.txt")], &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(files, vec![PathBuf::from("-proxy:http://proxy:8888")]);
}

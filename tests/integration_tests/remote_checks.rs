//! Runs that talk to a remote: `--fetch`, `--check-remote-missing` and
//! `--check-upstream-missing`. The remote is a bare repository on disk.

use crate::common::{TestRepo, stderr, stdout};

/// Merge `name` into dev and push it to origin with tracking.
fn pushed_and_merged(repo: &TestRepo, name: &str) {
    repo.merged_branch(name);
    repo.git(&["push", "-u", "origin", name]);
}

#[test]
fn remote_check_keeps_branches_still_on_remote() {
    let repo = TestRepo::with_remote();
    pushed_and_merged(&repo, "still-there");
    pushed_and_merged(&repo, "gone-upstream");
    repo.remote_git(&["branch", "-D", "gone-upstream"]);

    let output = repo
        .sweep_cmd()
        .arg("--check-remote-missing")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("[SKIP] still-there (still present on remote)"), "{out}");
    assert!(out.contains("[DEL ] gone-upstream (tip "), "{out}");
    assert!(repo.has_branch("still-there"));
}

#[test]
fn unreachable_remote_keeps_branch() {
    let repo = TestRepo::with_remote();
    pushed_and_merged(&repo, "feature");
    std::fs::rename(repo.remote_path(), repo.temp_path().join("moved.git")).unwrap();

    let output = repo
        .sweep_cmd()
        .arg("--check-remote-missing")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("[SKIP] feature (remote check inconclusive)"));
    assert!(repo.has_branch("feature"));
}

#[test]
fn failed_fetch_is_fatal() {
    let repo = TestRepo::with_remote();
    pushed_and_merged(&repo, "feature");
    std::fs::rename(repo.remote_path(), repo.temp_path().join("moved.git")).unwrap();

    let output = repo.sweep_cmd().arg("--fetch").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).contains("Remote origin is unavailable"));
    assert!(repo.has_branch("feature"));
}

#[test]
fn fetch_prunes_before_checks() {
    let repo = TestRepo::with_remote();
    pushed_and_merged(&repo, "feature");
    repo.remote_git(&["branch", "-D", "feature"]);
    assert!(!repo.git(&["branch", "-r"]).is_empty());

    let output = repo
        .sweep_cmd()
        .args(["--fetch", "--check-remote-missing"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("[DEL ] feature (tip "));
    assert!(!repo.git(&["branch", "-r"]).contains("origin/feature"));
}

#[test]
fn upstream_check_only_considers_branches_tracking_the_remote() {
    let repo = TestRepo::with_remote();
    pushed_and_merged(&repo, "tracked");
    repo.merged_branch("local-only");

    let output = repo
        .sweep_cmd()
        .args(["--check-upstream-missing", "--dry-run"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("[SKIP] local-only (local-only or non-origin upstream)"), "{out}");
    assert!(out.contains("[DEL ] tracked (tip "), "{out}");

    let output = repo
        .sweep_cmd()
        .args(["--check-upstream-missing", "--dry-run", "--remote", "fork"])
        .output()
        .unwrap();
    assert!(stdout(&output).contains("[SKIP] tracked (local-only or non-fork upstream)"));
}

//! The git-backed gateway against real repositories.

use branch_sweep::git::{GitError, Repository, Upstream, Vcs};
use branch_sweep::issue::closing_pattern;

use crate::common::TestRepo;

#[test]
fn open_rejects_non_repository() {
    let dir = tempfile::tempdir().unwrap();
    let err = Repository::open(dir.path()).unwrap_err();
    assert!(matches!(err, GitError::NotARepository { .. }));

    let missing = dir.path().join("missing");
    assert!(matches!(
        Repository::open(&missing),
        Err(GitError::NotARepository { .. })
    ));
}

#[test]
fn list_local_branches_reports_tip_current_and_upstream() {
    let test = TestRepo::with_remote();
    test.branch_with_commit("feature");
    test.git(&["push", "-u", "origin", "feature"]);
    test.git(&["branch", "local-only"]);

    let repo = Repository::open(test.root_path()).unwrap();
    let branches = repo.list_local_branches().unwrap();

    let names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["dev", "feature", "local-only"]);

    let dev = &branches[0];
    assert!(dev.is_current);
    assert_eq!(dev.tip, test.git(&["rev-parse", "dev"]));
    assert_eq!(dev.upstream, Some(Upstream::new("origin", "dev")));

    let feature = &branches[1];
    assert!(!feature.is_current);
    assert_eq!(feature.upstream, Some(Upstream::new("origin", "feature")));

    assert_eq!(branches[2].upstream, None);
}

#[test]
fn is_ancestor_and_unknown_base() {
    let test = TestRepo::new();
    test.merged_branch("merged");
    test.branch_with_commit("unmerged");

    let repo = Repository::open(test.root_path()).unwrap();
    let merged_tip = test.git(&["rev-parse", "merged"]);
    let unmerged_tip = test.git(&["rev-parse", "unmerged"]);

    assert!(repo.is_ancestor(&merged_tip, "dev").unwrap());
    assert!(!repo.is_ancestor(&unmerged_tip, "dev").unwrap());
    assert_eq!(
        repo.is_ancestor(&merged_tip, "no-such-base"),
        Err(GitError::BaseBranchNotFound {
            base: "no-such-base".into()
        })
    );
}

#[test]
fn resolve_commit() {
    let test = TestRepo::new();
    let repo = Repository::open(test.root_path()).unwrap();
    assert_eq!(
        repo.resolve_commit("dev").unwrap(),
        Some(test.git(&["rev-parse", "dev"]))
    );
    assert_eq!(repo.resolve_commit("nope").unwrap(), None);
}

#[test]
fn log_matches_searches_base_history() {
    let test = TestRepo::new();
    test.merged_branch_with_message("1234-fix-login", "Merge login fix\n\nFixes #1234 login bug");
    test.branch_with_commit("99-elsewhere");

    let repo = Repository::open(test.root_path()).unwrap();
    assert!(repo.log_matches("dev", &closing_pattern("1234")).unwrap());
    assert!(!repo.log_matches("dev", &closing_pattern("123")).unwrap());
    assert!(!repo.log_matches("dev", &closing_pattern("99")).unwrap());
}

#[test]
fn delete_branch_refuses_unmerged_without_force() {
    let test = TestRepo::new();
    test.branch_with_commit("wip");

    let repo = Repository::open(test.root_path()).unwrap();
    assert_eq!(
        repo.delete_branch("wip", false),
        Err(GitError::UnmergedBranch {
            branch: "wip".into()
        })
    );
    assert!(test.has_branch("wip"));

    repo.delete_branch("wip", true).unwrap();
    assert!(!test.has_branch("wip"));
}

#[test]
fn remote_branch_exists_matches_full_name_only() {
    let test = TestRepo::with_remote();
    test.git(&["branch", "feature/login"]);
    test.git(&["push", "origin", "feature/login"]);

    let repo = Repository::open(test.root_path()).unwrap();
    assert!(repo.remote_branch_exists("origin", "feature/login").unwrap());
    assert!(!repo.remote_branch_exists("origin", "login").unwrap());
}

#[test]
fn unreachable_remote() {
    let test = TestRepo::new();
    let missing = test.temp_path().join("missing.git");
    test.git(&["remote", "add", "origin", missing.to_str().unwrap()]);

    let repo = Repository::open(test.root_path()).unwrap();
    assert!(matches!(
        repo.remote_branch_exists("origin", "dev"),
        Err(GitError::RemoteUnavailable { .. })
    ));
    assert!(matches!(
        repo.fetch_prune("origin"),
        Err(GitError::RemoteUnavailable { .. })
    ));
}

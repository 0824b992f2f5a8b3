use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

/// Environment variables the binary reads; cleared so the host can't leak in.
const SWEEP_ENV_VARS: &[&str] = &[
    "PROTECTED_BRANCHES",
    "CRITICAL_BRANCHES",
    "BASE_BRANCH_FOR_COMMIT_CHECK",
    "RUST_LOG",
    "CLICOLOR_FORCE",
];

/// A scratch repository with `dev` checked out and one initial commit.
pub struct TestRepo {
    temp_dir: TempDir,
    root: PathBuf,
    commits: Cell<usize>,
}

impl TestRepo {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("repo");
        std::fs::create_dir(&root).expect("Failed to create repo directory");
        // Resolve symlinks such as /var -> /private/var on macOS
        let root = root
            .canonicalize()
            .expect("Failed to canonicalize temp path");

        let repo = Self {
            temp_dir,
            root,
            commits: Cell::new(0),
        };
        repo.git(&["init", "-b", "dev"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.commit("Initial commit");
        repo
    }

    /// Same as [`TestRepo::new`], plus a bare `origin` that `dev` tracks.
    pub fn with_remote() -> Self {
        let repo = Self::new();
        let remote = repo.remote_path();
        let output = isolated(Command::new("git"))
            .args(["init", "--bare", "-b", "dev"])
            .arg(&remote)
            .output()
            .expect("Failed to run git init --bare");
        check(&["init", "--bare"], &output);
        repo.git(&["remote", "add", "origin", remote.to_str().unwrap()]);
        repo.git(&["push", "-u", "origin", "dev"]);
        repo
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// Directory containing the repository, for running with a clean cwd.
    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn remote_path(&self) -> PathBuf {
        self.temp_dir.path().join("origin.git")
    }

    /// Run git in the repository, panicking on failure. Returns trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = isolated(Command::new("git"))
            .args(args)
            .current_dir(&self.root)
            .output()
            .expect("Failed to run git");
        check(args, &output);
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Run git against the bare remote.
    pub fn remote_git(&self, args: &[&str]) -> String {
        let output = isolated(Command::new("git"))
            .arg("--git-dir")
            .arg(self.remote_path())
            .args(args)
            .output()
            .expect("Failed to run git");
        check(args, &output);
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Commit a new file on the current branch.
    pub fn commit(&self, message: &str) {
        let n = self.commits.get() + 1;
        self.commits.set(n);
        std::fs::write(self.root.join(format!("file-{n}.txt")), message)
            .expect("Failed to write file");
        self.git(&["add", "."]);
        self.git(&["commit", "-m", message]);
    }

    /// Create `name` from the current branch with one commit, then return to `dev`.
    pub fn branch_with_commit(&self, name: &str) {
        self.git(&["checkout", "-b", name]);
        self.commit(&format!("Work on {name}"));
        self.git(&["checkout", "dev"]);
    }

    /// Create `name` with one commit and fast-forward `dev` onto it.
    pub fn merged_branch(&self, name: &str) {
        self.branch_with_commit(name);
        self.git(&["merge", "--ff-only", name]);
    }

    /// Create `name` with one commit and merge it into `dev` with a merge commit.
    pub fn merged_branch_with_message(&self, name: &str, message: &str) {
        self.branch_with_commit(name);
        self.git(&["merge", "--no-ff", "-m", message, name]);
    }

    pub fn short_tip(&self, branch: &str) -> String {
        self.git(&["rev-parse", "--short=8", branch])
    }

    pub fn branches(&self) -> Vec<String> {
        self.git(&["for-each-ref", "--format=%(refname:lstrip=2)", "refs/heads/"])
            .lines()
            .map(String::from)
            .collect()
    }

    pub fn has_branch(&self, name: &str) -> bool {
        self.branches().iter().any(|b| b == name)
    }

    /// The binary pointed at this repository, with a clean environment.
    pub fn sweep_cmd(&self) -> Command {
        let mut cmd = self.binary_cmd();
        cmd.arg("--repo").arg(&self.root);
        cmd
    }

    /// The binary with a clean environment, run from the temp directory.
    pub fn binary_cmd(&self) -> Command {
        let mut cmd = isolated(Command::new(get_cargo_bin("branch-sweep")));
        for var in SWEEP_ENV_VARS {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1").current_dir(self.temp_path());
        cmd
    }
}

/// Isolate git from the host's configuration.
fn isolated(mut cmd: Command) -> Command {
    cmd.env("GIT_CONFIG_GLOBAL", "/dev/null")
        .env("GIT_CONFIG_SYSTEM", "/dev/null")
        .env("GIT_AUTHOR_DATE", "2025-01-01T00:00:00Z")
        .env("GIT_COMMITTER_DATE", "2025-01-01T00:00:00Z")
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("LC_ALL", "C");
    cmd
}

fn check(args: &[&str], output: &Output) {
    if !output.status.success() {
        panic!(
            "git {} failed:\nstdout: {}\nstderr: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Stdout of a finished command.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished command.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

//! Repository backed by the `git` binary.

mod branches;
mod integration;
mod remotes;

use std::path::{Path, PathBuf};
use std::process::Output;

use super::{Branch, GitError, Vcs};
use crate::shell_exec::Cmd;

/// A git repository on disk.
///
/// # Examples
///
/// ```no_run
/// use branch_sweep::git::{Repository, Vcs};
///
/// let repo = Repository::open("/path/to/repo")?;
/// for branch in repo.list_local_branches()? {
///     println!("{} {}", branch.short_tip(), branch.name);
/// }
/// # Ok::<(), branch_sweep::git::GitError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Open the repository containing `path`.
    ///
    /// Fails with [`GitError::NotARepository`] if the path does not exist or
    /// git does not recognise it as part of a repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let requested = path.as_ref();
        let not_a_repo = || GitError::NotARepository {
            path: requested.to_path_buf(),
        };

        let path = dunce::canonicalize(requested).map_err(|_| not_a_repo())?;
        if !path.is_dir() {
            return Err(not_a_repo());
        }

        let repo = Self { path };
        let output = repo.run_command_output(&["rev-parse", "--git-dir"])?;
        if !output.status.success() {
            return Err(not_a_repo());
        }

        log::debug!("Opened repository at {}", repo.path.display());
        Ok(repo)
    }

    /// Short label for log lines.
    fn context_label(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn git(&self, args: &[&str]) -> Cmd {
        Cmd::new("git")
            .args(args.iter().copied())
            .current_dir(&self.path)
            .context(self.context_label())
            // Stable English messages for the few we inspect
            .env("LC_ALL", "C")
            // Fail instead of prompting for credentials
            .env("GIT_TERMINAL_PROMPT", "0")
    }

    /// Run a git command and return its output whatever the exit status.
    fn run_command_output(&self, args: &[&str]) -> Result<Output, GitError> {
        let cmd = self.git(args);
        let display = cmd.display();
        cmd.run()
            .map_err(|e| GitError::CommandFailed(format!("Failed to run {display}: {e}")))
    }
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

fn command_failed(args: &[&str], output: &Output) -> GitError {
    let stderr = stderr_of(output);
    if stderr.is_empty() {
        GitError::CommandFailed(format!("git {} failed", args.join(" ")))
    } else {
        GitError::CommandFailed(format!("git {} failed: {}", args.join(" "), stderr))
    }
}

impl Vcs for Repository {
    fn list_local_branches(&self) -> Result<Vec<Branch>, GitError> {
        self.local_branches()
    }

    fn resolve_commit(&self, reference: &str) -> Result<Option<String>, GitError> {
        self.commit_for(reference)
    }

    fn is_ancestor(&self, commit: &str, base: &str) -> Result<bool, GitError> {
        self.commit_is_ancestor(commit, base)
    }

    fn remote_branch_exists(&self, remote: &str, branch: &str) -> Result<bool, GitError> {
        self.remote_has_branch(remote, branch)
    }

    fn fetch_prune(&self, remote: &str) -> Result<(), GitError> {
        self.fetch_and_prune(remote)
    }

    fn delete_branch(&self, name: &str, force: bool) -> Result<(), GitError> {
        self.delete_local_branch(name, force)
    }

    fn log_matches(&self, base: &str, pattern: &str) -> Result<bool, GitError> {
        self.history_matches(base, pattern)
    }
}

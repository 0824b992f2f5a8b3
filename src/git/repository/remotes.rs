//! Remote queries for Repository. These are the only network operations.

use super::{Repository, stderr_of};
use crate::git::GitError;

impl Repository {
    /// Ask the remote whether it still has `refs/heads/<branch>`.
    ///
    /// Uses the full ref as the pattern: `ls-remote` matches patterns against
    /// the tail of each ref, so a bare `login` would also match `feature/login`.
    pub(super) fn remote_has_branch(&self, remote: &str, branch: &str) -> Result<bool, GitError> {
        let pattern = format!("refs/heads/{branch}");
        let output = self.run_command_output(&["ls-remote", "--heads", remote, &pattern])?;
        if !output.status.success() {
            return Err(GitError::RemoteUnavailable {
                remote: remote.to_string(),
                error: stderr_of(&output),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .any(|line| line.split_whitespace().nth(1) == Some(pattern.as_str())))
    }

    /// `git fetch <remote> --prune`.
    pub(super) fn fetch_and_prune(&self, remote: &str) -> Result<(), GitError> {
        log::info!("Fetching {remote} with --prune");
        let output = self.run_command_output(&["fetch", remote, "--prune"])?;
        if !output.status.success() {
            return Err(GitError::RemoteUnavailable {
                remote: remote.to_string(),
                error: stderr_of(&output),
            });
        }
        Ok(())
    }
}

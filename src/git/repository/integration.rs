//! Ancestry and history checks for Repository.

use super::{Repository, command_failed};
use crate::git::GitError;

impl Repository {
    /// `git merge-base --is-ancestor`: exit 0 means reachable, 1 means not.
    /// Anything else is an error, most often an unknown base.
    pub(super) fn commit_is_ancestor(&self, commit: &str, base: &str) -> Result<bool, GitError> {
        let args = ["merge-base", "--is-ancestor", commit, base];
        let output = self.run_command_output(&args)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => {
                if self.commit_for(base)?.is_none() {
                    return Err(GitError::BaseBranchNotFound {
                        base: base.to_string(),
                    });
                }
                Err(command_failed(&args, &output))
            }
        }
    }

    /// Search commit messages reachable from `base` for an extended regex.
    pub(super) fn history_matches(&self, base: &str, pattern: &str) -> Result<bool, GitError> {
        let grep = format!("--grep={pattern}");
        let args = [
            "log",
            "--format=%H",
            "-n",
            "1",
            "--extended-regexp",
            "--regexp-ignore-case",
            grep.as_str(),
            base,
            "--",
        ];
        let output = self.run_command_output(&args)?;
        if !output.status.success() {
            if self.commit_for(base)?.is_none() {
                return Err(GitError::BaseBranchNotFound {
                    base: base.to_string(),
                });
            }
            return Err(command_failed(&args, &output));
        }
        Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
    }
}

//! Git error types.
//!
//! Uses anyhow for propagation at the command layer. GitError is the small set
//! of failures that callers must tell apart: some are fatal to a run, others
//! only downgrade a single branch to "keep".

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitError {
    /// The path does not exist or is not inside a git repository
    NotARepository { path: PathBuf },
    /// The base branch used for containment checks does not resolve
    BaseBranchNotFound { base: String },
    /// Network or authentication failure talking to a remote
    RemoteUnavailable { remote: String, error: String },
    /// `git branch -d` refused because the branch is not fully merged
    UnmergedBranch { branch: String },
    /// Any other git failure, with the command line and its stderr
    CommandFailed(String),
}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::NotARepository { path } => {
                write!(f, "Not a git repository: {}", path.display())
            }
            GitError::BaseBranchNotFound { base } => {
                write!(f, "Base ref not found: {base}")
            }
            GitError::RemoteUnavailable { remote, error } => {
                write!(f, "Remote {remote} is unavailable: {error}")
            }
            GitError::UnmergedBranch { branch } => {
                write!(f, "Branch {branch} is not fully merged")
            }
            GitError::CommandFailed(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GitError {}

/// Suggest a fix for errors the user can resolve from the command line.
pub fn hint(err: &anyhow::Error) -> Option<String> {
    err.downcast_ref::<GitError>().and_then(|e| match e {
        GitError::NotARepository { .. } => {
            Some("Pass --repo pointing at a git working tree".to_string())
        }
        GitError::BaseBranchNotFound { .. } => Some(
            "Pass --base or set BASE_BRANCH_FOR_COMMIT_CHECK to an existing branch".to_string(),
        ),
        GitError::RemoteUnavailable { remote, .. } => {
            Some(format!("Check that {remote} is reachable, or run without --fetch"))
        }
        GitError::UnmergedBranch { .. } | GitError::CommandFailed(_) => None,
    })
}

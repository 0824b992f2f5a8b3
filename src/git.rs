//! Git access for branch-sweep.
//!
//! Everything the sweep needs from a repository goes through the [`Vcs`]
//! trait. [`Repository`] shells out to the `git` binary; [`MemoryRepo`] is an
//! in-memory model of a repository for exercising the decision logic without
//! spawning processes.

mod error;
pub mod memory;
mod repository;

pub use error::{GitError, hint};
pub use memory::MemoryRepo;
pub use repository::Repository;

/// Length of the abbreviated commit hash shown in reports.
pub const SHORT_HASH_LEN: usize = 8;

/// The remote-tracking reference a local branch follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    /// Remote name, e.g. `origin`. `.` when the upstream is another local branch.
    pub remote: String,
    /// Branch name on the remote, without the `refs/heads/` prefix.
    pub branch: String,
}

impl Upstream {
    pub fn new(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            branch: branch.into(),
        }
    }

    /// Whether this upstream lives on the named remote.
    pub fn is_on(&self, remote: &str) -> bool {
        self.remote == remote
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

/// A local branch as enumerated at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    /// Full hash of the tip commit.
    pub tip: String,
    pub upstream: Option<Upstream>,
    /// Whether this branch is checked out in the repository's worktree.
    pub is_current: bool,
}

impl Branch {
    pub fn new(name: impl Into<String>, tip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tip: tip.into(),
            upstream: None,
            is_current: false,
        }
    }

    pub fn with_upstream(mut self, upstream: Upstream) -> Self {
        self.upstream = Some(upstream);
        self
    }

    pub fn current(mut self) -> Self {
        self.is_current = true;
        self
    }

    /// The tip hash abbreviated to [`SHORT_HASH_LEN`] characters.
    pub fn short_tip(&self) -> &str {
        self.tip.get(..SHORT_HASH_LEN).unwrap_or(&self.tip)
    }
}

/// Repository operations used by the sweep.
///
/// All calls are synchronous and may be slow: each one is at least one
/// `git` process, and [`Vcs::remote_branch_exists`] / [`Vcs::fetch_prune`]
/// go over the network.
pub trait Vcs {
    /// All local branches, in refname order.
    fn list_local_branches(&self) -> Result<Vec<Branch>, GitError>;

    /// Resolve a reference to a commit hash, or `None` if it does not resolve.
    fn resolve_commit(&self, reference: &str) -> Result<Option<String>, GitError>;

    /// Whether `commit` is reachable from `base`.
    ///
    /// Fails with [`GitError::BaseBranchNotFound`] if `base` does not resolve.
    fn is_ancestor(&self, commit: &str, base: &str) -> Result<bool, GitError>;

    /// Whether `branch` exists as a head on `remote`.
    ///
    /// Fails with [`GitError::RemoteUnavailable`] if the remote cannot be queried.
    fn remote_branch_exists(&self, remote: &str, branch: &str) -> Result<bool, GitError>;

    /// Fetch `remote` and prune remote-tracking refs that no longer exist.
    fn fetch_prune(&self, remote: &str) -> Result<(), GitError>;

    /// Delete a local branch. Without `force`, git refuses unmerged branches
    /// and this fails with [`GitError::UnmergedBranch`].
    fn delete_branch(&self, name: &str, force: bool) -> Result<(), GitError>;

    /// Whether any commit message reachable from `base` has a line matching
    /// the POSIX extended regular expression `pattern`, ignoring case.
    fn log_matches(&self, base: &str, pattern: &str) -> Result<bool, GitError>;
}

//! In-memory repository model.
//!
//! [`MemoryRepo`] answers [`Vcs`] queries from a description built up front,
//! and records every mutating call so tests can assert on what a run did.
//!
//! ```
//! use branch_sweep::git::{Branch, MemoryRepo, Vcs};
//!
//! let repo = MemoryRepo::new()
//!     .with_branch(Branch::new("dev", "aaaaaaaaaaaa").current())
//!     .with_branch(Branch::new("feature", "bbbbbbbbbbbb"))
//!     .with_reachable("dev", ["bbbbbbbbbbbb"]);
//!
//! assert!(repo.is_ancestor("bbbbbbbbbbbb", "dev")?);
//! repo.delete_branch("feature", false)?;
//! assert_eq!(repo.list_local_branches()?.len(), 1);
//! # Ok::<(), branch_sweep::git::GitError>(())
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use regex::RegexBuilder;

use super::{Branch, GitError, Vcs};

#[derive(Debug, Default)]
pub struct MemoryRepo {
    branches: RefCell<Vec<Branch>>,
    /// Extra refs (tags, remote-tracking refs) that resolve to a commit
    refs: HashMap<String, String>,
    /// Commits reachable from each ref, beyond the ref's own tip
    reachable: HashMap<String, HashSet<String>>,
    /// Commit messages reachable from each ref
    messages: HashMap<String, Vec<String>>,
    /// Branch names present on each remote
    remote_heads: RefCell<HashMap<String, HashSet<String>>>,
    /// Remotes whose heads disappear on the next fetch
    pruned_heads: HashMap<String, HashSet<String>>,
    unreachable_remotes: HashSet<String>,
    /// Branches git would refuse to delete without `-D`
    unmerged: HashSet<String>,
    /// Commits whose object is unreadable, so ancestry checks on them fail
    missing_objects: HashSet<String>,
    /// Refs whose history cannot be searched
    failing_history: HashSet<String>,
    deletions: RefCell<Vec<(String, bool)>>,
    fetches: RefCell<Vec<String>>,
    ancestry_queries: Cell<usize>,
    remote_queries: Cell<usize>,
    log_queries: Cell<usize>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a local branch. Branches are listed in name order, like git.
    pub fn with_branch(self, branch: Branch) -> Self {
        {
            let mut branches = self.branches.borrow_mut();
            branches.retain(|b| b.name != branch.name);
            branches.push(branch);
            branches.sort_by(|a, b| a.name.cmp(&b.name));
        }
        self
    }

    /// Make a non-branch reference resolve to `commit`.
    pub fn with_ref(mut self, reference: &str, commit: &str) -> Self {
        self.refs.insert(reference.to_string(), commit.to_string());
        self
    }

    /// Mark commits as reachable from `reference`.
    pub fn with_reachable<I, S>(mut self, reference: &str, commits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reachable
            .entry(reference.to_string())
            .or_default()
            .extend(commits.into_iter().map(Into::into));
        self
    }

    /// Add a commit message to the history of `reference`.
    pub fn with_message(mut self, reference: &str, message: &str) -> Self {
        self.messages
            .entry(reference.to_string())
            .or_default()
            .push(message.to_string());
        self
    }

    /// Record that `remote` has a head named `branch`.
    pub fn with_remote_branch(self, remote: &str, branch: &str) -> Self {
        self.remote_heads
            .borrow_mut()
            .entry(remote.to_string())
            .or_default()
            .insert(branch.to_string());
        self
    }

    /// Have the next fetch of `remote` remove `branch` from it.
    pub fn with_pruned_on_fetch(mut self, remote: &str, branch: &str) -> Self {
        self.pruned_heads
            .entry(remote.to_string())
            .or_default()
            .insert(branch.to_string());
        self
    }

    /// Make every network operation against `remote` fail.
    pub fn with_unreachable_remote(mut self, remote: &str) -> Self {
        self.unreachable_remotes.insert(remote.to_string());
        self
    }

    /// Make an unforced delete of `branch` fail as git does for unmerged work.
    pub fn with_unmerged(mut self, branch: &str) -> Self {
        self.unmerged.insert(branch.to_string());
        self
    }

    /// Make ancestry checks involving `commit` fail as they do for a
    /// corrupt or missing object.
    pub fn with_missing_object(mut self, commit: &str) -> Self {
        self.missing_objects.insert(commit.to_string());
        self
    }

    /// Make history searches from `reference` fail.
    pub fn with_failing_history(mut self, reference: &str) -> Self {
        self.failing_history.insert(reference.to_string());
        self
    }

    /// Successful deletions as `(name, forced)`, in call order.
    pub fn deletions(&self) -> Vec<(String, bool)> {
        self.deletions.borrow().clone()
    }

    /// Remotes fetched, in call order.
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.borrow().clone()
    }

    pub fn ancestry_queries(&self) -> usize {
        self.ancestry_queries.get()
    }

    pub fn remote_queries(&self) -> usize {
        self.remote_queries.get()
    }

    pub fn log_queries(&self) -> usize {
        self.log_queries.get()
    }

    fn resolve(&self, reference: &str) -> Option<String> {
        self.branches
            .borrow()
            .iter()
            .find(|b| b.name == reference)
            .map(|b| b.tip.clone())
            .or_else(|| self.refs.get(reference).cloned())
    }

    fn check_remote(&self, remote: &str) -> Result<(), GitError> {
        if self.unreachable_remotes.contains(remote) {
            return Err(GitError::RemoteUnavailable {
                remote: remote.to_string(),
                error: format!("fatal: unable to access '{remote}'"),
            });
        }
        Ok(())
    }
}

impl Vcs for MemoryRepo {
    fn list_local_branches(&self) -> Result<Vec<Branch>, GitError> {
        Ok(self.branches.borrow().clone())
    }

    fn resolve_commit(&self, reference: &str) -> Result<Option<String>, GitError> {
        Ok(self.resolve(reference))
    }

    fn is_ancestor(&self, commit: &str, base: &str) -> Result<bool, GitError> {
        self.ancestry_queries.set(self.ancestry_queries.get() + 1);
        let Some(base_tip) = self.resolve(base) else {
            return Err(GitError::BaseBranchNotFound {
                base: base.to_string(),
            });
        };
        if self.missing_objects.contains(commit) {
            return Err(GitError::CommandFailed(format!(
                "git merge-base --is-ancestor {commit} {base} failed: fatal: Not a valid commit name {commit}"
            )));
        }
        Ok(commit == base_tip
            || self
                .reachable
                .get(base)
                .is_some_and(|commits| commits.contains(commit)))
    }

    fn remote_branch_exists(&self, remote: &str, branch: &str) -> Result<bool, GitError> {
        self.remote_queries.set(self.remote_queries.get() + 1);
        self.check_remote(remote)?;
        Ok(self
            .remote_heads
            .borrow()
            .get(remote)
            .is_some_and(|heads| heads.contains(branch)))
    }

    fn fetch_prune(&self, remote: &str) -> Result<(), GitError> {
        self.check_remote(remote)?;
        self.fetches.borrow_mut().push(remote.to_string());
        if let Some(pruned) = self.pruned_heads.get(remote) {
            let mut remote_heads = self.remote_heads.borrow_mut();
            if let Some(heads) = remote_heads.get_mut(remote) {
                heads.retain(|head| !pruned.contains(head));
            }
        }
        Ok(())
    }

    fn delete_branch(&self, name: &str, force: bool) -> Result<(), GitError> {
        let mut branches = self.branches.borrow_mut();
        let Some(index) = branches.iter().position(|b| b.name == name) else {
            return Err(GitError::CommandFailed(format!(
                "error: branch '{name}' not found"
            )));
        };
        if branches[index].is_current {
            return Err(GitError::CommandFailed(format!(
                "error: cannot delete branch '{name}' used by worktree"
            )));
        }
        if !force && self.unmerged.contains(name) {
            return Err(GitError::UnmergedBranch {
                branch: name.to_string(),
            });
        }
        branches.remove(index);
        self.deletions.borrow_mut().push((name.to_string(), force));
        Ok(())
    }

    fn log_matches(&self, base: &str, pattern: &str) -> Result<bool, GitError> {
        self.log_queries.set(self.log_queries.get() + 1);
        if self.resolve(base).is_none() {
            return Err(GitError::BaseBranchNotFound {
                base: base.to_string(),
            });
        }
        if self.failing_history.contains(base) {
            return Err(GitError::CommandFailed(format!(
                "git log {base} failed: fatal: unable to read tree"
            )));
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| GitError::CommandFailed(format!("invalid pattern {pattern}: {e}")))?;
        Ok(self.messages.get(base).is_some_and(|messages| {
            messages
                .iter()
                .flat_map(|message| message.lines())
                .any(|line| regex.is_match(line))
        }))
    }
}

//! Branch deletion for a classified branch.
//!
//! Turns a [`Verdict`] into an action on the repository and the single report
//! line for that branch. Failures here are never fatal: a branch git refuses
//! to delete is reported as skipped and the sweep moves on.

use std::fmt;

use branch_sweep::Verdict;
use branch_sweep::git::{Branch, GitError, Vcs};

/// Outcome of a branch deletion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchDeletionOutcome {
    /// Branch was deleted
    Deleted,
    /// Branch would have been deleted, but this is a dry run
    WouldDelete,
    /// Branch was not a deletion candidate
    Kept,
    /// Branch was protected
    Protected,
    /// Git refused an unforced delete of unmerged work
    Refused,
    /// Deletion failed for another reason
    Failed,
}

/// One line of the sweep report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub branch: String,
    pub outcome: BranchDeletionOutcome,
    pub reason: String,
}

impl ReportLine {
    /// `[DEL ]` for deletions (real or simulated), `[SKIP]` for everything else.
    pub fn tag(&self) -> &'static str {
        if self.is_deletion() { "[DEL ]" } else { "[SKIP]" }
    }

    pub fn is_deletion(&self) -> bool {
        matches!(
            self.outcome,
            BranchDeletionOutcome::Deleted | BranchDeletionOutcome::WouldDelete
        )
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.tag(), self.branch, self.reason)
    }
}

/// Carry out `verdict` for `branch`.
///
/// Only [`Verdict::Delete`] touches the repository, and not in a dry run.
pub fn apply_verdict<V: Vcs + ?Sized>(
    vcs: &V,
    branch: &Branch,
    verdict: Verdict,
    dry_run: bool,
    force: bool,
) -> ReportLine {
    let (outcome, reason) = match verdict {
        Verdict::Skip(reason) => (BranchDeletionOutcome::Kept, reason),
        Verdict::Protected(reason) => (BranchDeletionOutcome::Protected, reason.to_string()),
        Verdict::Delete(reason) if dry_run => (BranchDeletionOutcome::WouldDelete, reason),
        Verdict::Delete(reason) => match vcs.delete_branch(&branch.name, force) {
            Ok(()) => {
                log::info!("Deleted {} (was {})", branch.name, branch.short_tip());
                (BranchDeletionOutcome::Deleted, reason)
            }
            Err(GitError::UnmergedBranch { .. }) => (
                BranchDeletionOutcome::Refused,
                "not fully merged, use --force".to_string(),
            ),
            Err(e) => {
                log::warn!("Failed to delete {}: {e}", branch.name);
                (BranchDeletionOutcome::Failed, "delete failed".to_string())
            }
        },
    };

    ReportLine {
        branch: branch.name.clone(),
        outcome,
        reason,
    }
}

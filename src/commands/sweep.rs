//! The sweep: fetch, verify the base, then classify and act on every branch.

use anyhow::Context;
use branch_sweep::Classifier;
use branch_sweep::config::RunConfig;
use branch_sweep::git::{GitError, Vcs};

use super::branch_deletion::{BranchDeletionOutcome, ReportLine, apply_verdict};

/// Counts for the closing summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub deleted: usize,
    pub kept: usize,
    pub protected: usize,
    pub failed: usize,
}

impl SweepSummary {
    fn record(&mut self, line: &ReportLine) {
        match line.outcome {
            BranchDeletionOutcome::Deleted | BranchDeletionOutcome::WouldDelete => {
                self.deleted += 1
            }
            BranchDeletionOutcome::Kept => self.kept += 1,
            BranchDeletionOutcome::Protected => self.protected += 1,
            BranchDeletionOutcome::Refused | BranchDeletionOutcome::Failed => self.failed += 1,
        }
    }
}

/// Run one sweep, handing each report line to `emit` as soon as it is known.
///
/// Everything that can abort the run (fetch, base lookup, listing) happens
/// before the first line is emitted. Branches are processed one at a time in
/// the order git lists them.
pub fn sweep<V, F>(vcs: &V, config: &RunConfig, mut emit: F) -> anyhow::Result<SweepSummary>
where
    V: Vcs + ?Sized,
    F: FnMut(&ReportLine) -> anyhow::Result<()>,
{
    if config.fetch {
        vcs.fetch_prune(&config.remote)?;
    }

    let base_tip = vcs.resolve_commit(&config.base)?.ok_or_else(|| {
        GitError::BaseBranchNotFound {
            base: config.base.clone(),
        }
    })?;
    log::debug!("Base {} is at {base_tip}", config.base);

    let branches = vcs
        .list_local_branches()
        .context("Failed to list local branches")?;

    let classifier = Classifier::new(vcs, config);
    let mut summary = SweepSummary::default();
    for branch in &branches {
        let verdict = classifier.classify(branch)?;
        let line = apply_verdict(vcs, branch, verdict, config.dry_run, config.force);
        summary.record(&line);
        emit(&line)?;
    }

    Ok(summary)
}

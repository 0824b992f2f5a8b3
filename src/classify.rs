//! Decide what to do with each local branch.
//!
//! Protected branches are settled first. Every other branch starts out as a
//! deletion candidate and runs through the enabled [`Stage`]s in order; the
//! first stage that objects turns it into a skip and nothing after it runs.
//! No stage can turn a skip back into a deletion.
//!
//! The containment stage always runs and comes before the remote and issue
//! stages, so those slower checks only see branches already merged into the
//! base.

use strum::IntoEnumIterator;

use crate::config::RunConfig;
use crate::git::{Branch, GitError, Vcs};
use crate::issue::closes_issue;
use crate::protection::ProtectionReason;

/// Outcome for one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Delete(String),
    Skip(String),
    Protected(ProtectionReason),
}

impl Verdict {
    pub fn is_delete(&self) -> bool {
        matches!(self, Verdict::Delete(_))
    }
}

/// Checks applied to unprotected branches, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    UpstreamTracking,
    Containment,
    RemoteAbsent,
    IssueClosure,
}

impl Stage {
    fn enabled(self, config: &RunConfig) -> bool {
        match self {
            Stage::UpstreamTracking => config.checks.upstream_tracking,
            Stage::Containment => true,
            Stage::RemoteAbsent => config.checks.remote_absent,
            Stage::IssueClosure => config.checks.issue_closure,
        }
    }
}

/// What a stage says about the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Gate {
    Pass,
    Keep(String),
}

pub struct Classifier<'a, V: Vcs + ?Sized> {
    vcs: &'a V,
    config: &'a RunConfig,
}

impl<'a, V: Vcs + ?Sized> Classifier<'a, V> {
    pub fn new(vcs: &'a V, config: &'a RunConfig) -> Self {
        Self { vcs, config }
    }

    /// Classify one branch.
    ///
    /// Only an unresolvable base is returned as an error; any other git
    /// failure keeps the branch with a reason saying what went wrong.
    pub fn classify(&self, branch: &Branch) -> Result<Verdict, GitError> {
        if let Some(reason) = self
            .config
            .protection
            .check(&branch.name, branch.is_current)
        {
            log::debug!("{}: protected ({reason})", branch.name);
            return Ok(Verdict::Protected(reason));
        }

        for stage in Stage::iter().filter(|stage| stage.enabled(self.config)) {
            let gate = self.run_stage(stage, branch)?;
            log::debug!("{}: {stage} -> {gate:?}", branch.name);
            if let Gate::Keep(reason) = gate {
                return Ok(Verdict::Skip(reason));
            }
        }

        Ok(Verdict::Delete(format!(
            "tip {} is in {}",
            branch.short_tip(),
            self.config.base
        )))
    }

    fn run_stage(&self, stage: Stage, branch: &Branch) -> Result<Gate, GitError> {
        let base = &self.config.base;
        let remote = &self.config.remote;

        match stage {
            Stage::UpstreamTracking => {
                let tracks_remote = branch
                    .upstream
                    .as_ref()
                    .is_some_and(|upstream| upstream.is_on(remote));
                Ok(if tracks_remote {
                    Gate::Pass
                } else {
                    Gate::Keep(format!("local-only or non-{remote} upstream"))
                })
            }
            Stage::Containment => match self.vcs.is_ancestor(&branch.tip, base) {
                Ok(true) => Ok(Gate::Pass),
                Ok(false) => Ok(Gate::Keep(format!("not found in {base}"))),
                Err(e @ GitError::BaseBranchNotFound { .. }) => Err(e),
                Err(e) => {
                    log::warn!("{}: ancestry check failed: {e}", branch.name);
                    Ok(Gate::Keep("ancestry check failed".to_string()))
                }
            },
            Stage::RemoteAbsent => match self.vcs.remote_branch_exists(remote, &branch.name) {
                Ok(true) => Ok(Gate::Keep("still present on remote".to_string())),
                Ok(false) => Ok(Gate::Pass),
                Err(e) => {
                    log::warn!("{}: remote check inconclusive: {e}", branch.name);
                    Ok(Gate::Keep("remote check inconclusive".to_string()))
                }
            },
            Stage::IssueClosure => match closes_issue(self.vcs, &branch.name, base) {
                Ok(true) => Ok(Gate::Pass),
                Ok(false) => Ok(Gate::Keep(format!("issue not closed in {base}"))),
                Err(e @ GitError::BaseBranchNotFound { .. }) => Err(e),
                Err(e) => {
                    log::warn!("{}: issue check failed: {e}", branch.name);
                    Ok(Gate::Keep("issue check failed".to_string()))
                }
            },
        }
    }
}

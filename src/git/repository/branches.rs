//! Branch-related operations for Repository.

use super::{Repository, command_failed, stderr_of};
use crate::git::{Branch, GitError, Upstream};

/// Field separator for `for-each-ref`. NUL cannot appear in ref names.
const FIELD_SEP: char = '\0';

/// name, tip, HEAD marker, upstream remote, upstream ref
const BRANCH_FORMAT: &str = "--format=%(refname:lstrip=2)%00%(objectname)%00%(HEAD)%00%(upstream:remotename)%00%(upstream:remoteref)";

impl Repository {
    /// All local branches with their tip, upstream and current-branch flag.
    pub(super) fn local_branches(&self) -> Result<Vec<Branch>, GitError> {
        let args = ["for-each-ref", BRANCH_FORMAT, "refs/heads/"];
        let output = self.run_command_output(&args)?;
        if !output.status.success() {
            if stderr_of(&output).contains("not a git repository") {
                return Err(GitError::NotARepository {
                    path: self.path.clone(),
                });
            }
            return Err(command_failed(&args, &output));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let branches: Vec<Branch> = stdout.lines().filter_map(parse_branch_line).collect();
        log::debug!("Found {} local branches", branches.len());
        Ok(branches)
    }

    /// Resolve a reference to the commit it points at.
    pub(super) fn commit_for(&self, reference: &str) -> Result<Option<String>, GitError> {
        let rev = format!("{reference}^{{commit}}");
        let output = self.run_command_output(&["rev-parse", "--verify", "--quiet", &rev])?;
        if !output.status.success() {
            return Ok(None);
        }
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!hash.is_empty()).then_some(hash))
    }

    /// `git branch -d` (or `-D` when forced).
    pub(super) fn delete_local_branch(&self, name: &str, force: bool) -> Result<(), GitError> {
        let flag = if force { "-D" } else { "-d" };
        let args = ["branch", flag, name];
        let output = self.run_command_output(&args)?;
        if output.status.success() {
            return Ok(());
        }
        if stderr_of(&output).contains("not fully merged") {
            return Err(GitError::UnmergedBranch {
                branch: name.to_string(),
            });
        }
        Err(command_failed(&args, &output))
    }
}

/// Parse one line of [`BRANCH_FORMAT`] output.
fn parse_branch_line(line: &str) -> Option<Branch> {
    let mut fields = line.split(FIELD_SEP);
    let name = fields.next().filter(|name| !name.is_empty())?;
    let tip = fields.next().filter(|tip| !tip.is_empty())?;
    let head = fields.next().unwrap_or_default();
    let remote = fields.next().unwrap_or_default();
    let remote_ref = fields.next().unwrap_or_default();

    let upstream = (!remote.is_empty() && !remote_ref.is_empty()).then(|| {
        let branch = remote_ref.strip_prefix("refs/heads/").unwrap_or(remote_ref);
        Upstream::new(remote, branch)
    });

    Some(Branch {
        name: name.to_string(),
        tip: tip.to_string(),
        upstream,
        is_current: head == "*",
    })
}

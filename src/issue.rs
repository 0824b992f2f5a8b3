//! Issue-closure heuristic.
//!
//! Branches named like `1234-fix-login` are taken to belong to issue 1234.
//! The issue counts as closed when the base branch's history has a commit
//! message line such as `Fixes #1234` or `closed 1234`.

use crate::git::{GitError, Vcs};

/// Characters that may end the issue number at the start of a branch name.
const ID_SEPARATORS: &[char] = &['-', '_', '/', '.'];

/// The issue number a branch name starts with, if any.
///
/// The leading digits must be followed by a separator or the end of the
/// name, so `2fa-login` has no issue number.
///
/// ```
/// use branch_sweep::issue::issue_id;
///
/// assert_eq!(issue_id("1234-fix-login"), Some("1234"));
/// assert_eq!(issue_id("hotfix-login"), None);
/// ```
pub fn issue_id(branch: &str) -> Option<&str> {
    let digits_end = branch
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(branch.len());
    if digits_end == 0 {
        return None;
    }
    let (id, rest) = branch.split_at(digits_end);
    match rest.chars().next() {
        None => Some(id),
        Some(c) if ID_SEPARATORS.contains(&c) => Some(id),
        Some(_) => None,
    }
}

/// Extended regular expression for a line that closes issue `id`.
///
/// Matches `close`, `closes`, `closed`, `fix`, `fixes`, `fixed`, `resolve`,
/// `resolves` or `resolved`, whitespace, an optional `#`, then the id not
/// followed by another digit. Callers match it ignoring case.
pub fn closing_pattern(id: &str) -> String {
    format!(
        "(^|[^[:alnum:]_])(close[sd]?|fix(e[sd])?|resolve[sd]?)[[:space:]]+#?{id}([^0-9]|$)"
    )
}

/// Whether the issue `branch` is named after has been closed in `base`.
///
/// A branch without a leading issue number never counts as closed.
pub fn closes_issue<V: Vcs + ?Sized>(
    vcs: &V,
    branch: &str,
    base: &str,
) -> Result<bool, GitError> {
    let Some(id) = issue_id(branch) else {
        log::debug!("{branch}: no leading issue number");
        return Ok(false);
    };
    let closed = vcs.log_matches(base, &closing_pattern(id))?;
    log::debug!("{branch}: issue #{id} closed in {base}: {closed}");
    Ok(closed)
}

//! Run configuration.
//!
//! Configuration comes from three places, read once at startup:
//! - built-in defaults (the constants below)
//! - environment variables, optionally seeded from a `.env` file
//! - command-line flags
//!
//! The result is a [`RunConfig`] that is never modified afterwards.

use std::path::PathBuf;

use crate::protection::ProtectionPolicy;

/// Branches protected when `PROTECTED_BRANCHES` is not set.
pub const DEFAULT_PROTECTED: &[&str] = &[
    "main",
    "master",
    "develop",
    "dev",
    "release",
    "staging",
    "production",
];

/// Branches that are never deleted, whatever else is configured.
pub const DEFAULT_CRITICAL: &[&str] = &["master", "dev"];

pub const DEFAULT_BASE_BRANCH: &str = "dev";
pub const DEFAULT_REMOTE: &str = "origin";

/// Comma-separated list that replaces [`DEFAULT_PROTECTED`].
pub const PROTECTED_BRANCHES_VAR: &str = "PROTECTED_BRANCHES";
/// Comma-separated list that replaces [`DEFAULT_CRITICAL`].
pub const CRITICAL_BRANCHES_VAR: &str = "CRITICAL_BRANCHES";
/// Default for `--base`.
pub const BASE_BRANCH_VAR: &str = "BASE_BRANCH_FOR_COMMIT_CHECK";

/// Settings taken from the environment.
///
/// `None` means the variable is unset and the built-in default applies.
/// `Some(vec![])` means a list is set but names nothing, and `Some("")` means
/// the base is set to whitespace only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    pub protected: Option<Vec<String>>,
    pub critical: Option<Vec<String>>,
    pub base: Option<String>,
}

impl EnvSettings {
    /// Read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary lookup, so callers need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            protected: lookup(PROTECTED_BRANCHES_VAR).map(|value| parse_list(&value)),
            critical: lookup(CRITICAL_BRANCHES_VAR).map(|value| parse_list(&value)),
            base: lookup(BASE_BRANCH_VAR).map(|value| value.trim().to_string()),
        }
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

/// Optional checks, each of which can only turn a deletion into a skip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checks {
    /// Only consider branches tracking an upstream on the chosen remote
    pub upstream_tracking: bool,
    /// Only delete branches the remote no longer has
    pub remote_absent: bool,
    /// Only delete branches whose issue is closed in the base history
    pub issue_closure: bool,
}

/// Everything a run needs to know, resolved once.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub repo: PathBuf,
    pub remote: String,
    pub base: String,
    pub dry_run: bool,
    pub force: bool,
    pub fetch: bool,
    pub checks: Checks,
    pub protection: ProtectionPolicy,
}

impl RunConfig {
    /// A configuration with defaults for everything except the repository.
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            remote: DEFAULT_REMOTE.to_string(),
            base: DEFAULT_BASE_BRANCH.to_string(),
            dry_run: false,
            force: false,
            fetch: false,
            checks: Checks::default(),
            protection: ProtectionPolicy::default(),
        }
    }
}

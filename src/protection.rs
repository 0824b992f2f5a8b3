//! Which branches must never be deleted.
//!
//! The effective protected set is the union of:
//! - the listed names: [`DEFAULT_PROTECTED`], or `PROTECTED_BRANCHES` which
//!   replaces it, plus every `--protect` value
//! - the critical names: [`DEFAULT_CRITICAL`], or `CRITICAL_BRANCHES` which
//!   replaces it; never empty
//! - whichever branch is checked out
//!
//! Matching is exact and case-sensitive.

use std::collections::BTreeSet;

use anyhow::bail;

use crate::config::{CRITICAL_BRANCHES_VAR, DEFAULT_CRITICAL, DEFAULT_PROTECTED, EnvSettings};

/// Why a branch is protected. Displays as the reason shown in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ProtectionReason {
    #[strum(serialize = "protected")]
    Listed,
    #[strum(serialize = "critical")]
    Critical,
    #[strum(serialize = "current")]
    Current,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionPolicy {
    listed: BTreeSet<String>,
    critical: BTreeSet<String>,
}

impl Default for ProtectionPolicy {
    fn default() -> Self {
        Self {
            listed: DEFAULT_PROTECTED.iter().map(|s| s.to_string()).collect(),
            critical: DEFAULT_CRITICAL.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ProtectionPolicy {
    /// Build the policy from environment lists and `--protect` values.
    ///
    /// Fails if the critical list resolves to nothing.
    pub fn new(env: &EnvSettings, extra: &[String]) -> anyhow::Result<Self> {
        let mut listed: BTreeSet<String> = match &env.protected {
            Some(names) => {
                if names.is_empty() {
                    log::warn!(
                        "PROTECTED_BRANCHES is set but empty; only critical, current and --protect branches are protected"
                    );
                }
                names.iter().cloned().collect()
            }
            None => DEFAULT_PROTECTED.iter().map(|s| s.to_string()).collect(),
        };
        listed.extend(
            extra
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(String::from),
        );

        let critical: BTreeSet<String> = match &env.critical {
            Some(names) => names.iter().cloned().collect(),
            None => DEFAULT_CRITICAL.iter().map(|s| s.to_string()).collect(),
        };
        if critical.is_empty() {
            bail!("{CRITICAL_BRANCHES_VAR} is set but names no branches");
        }

        log::debug!("Protected branches: {:?}", listed);
        log::debug!("Critical branches: {:?}", critical);
        Ok(Self { listed, critical })
    }

    /// Why `name` is protected, if it is.
    ///
    /// Listed names report as `protected` even when they are also critical
    /// or checked out.
    pub fn check(&self, name: &str, is_current: bool) -> Option<ProtectionReason> {
        if self.listed.contains(name) {
            Some(ProtectionReason::Listed)
        } else if self.critical.contains(name) {
            Some(ProtectionReason::Critical)
        } else if is_current {
            Some(ProtectionReason::Current)
        } else {
            None
        }
    }

    pub fn is_protected(&self, name: &str, is_current: bool) -> bool {
        self.check(name, is_current).is_some()
    }

    pub fn critical(&self) -> impl Iterator<Item = &str> {
        self.critical.iter().map(String::as_str)
    }
}

use std::path::PathBuf;

use anyhow::bail;
use clap::ArgAction;
use clap::Parser;
use clap::builder::NonEmptyStringValueParser;

use branch_sweep::config::{
    BASE_BRANCH_VAR, Checks, DEFAULT_BASE_BRANCH, DEFAULT_REMOTE, EnvSettings, RunConfig,
};
use branch_sweep::protection::ProtectionPolicy;

/// Delete local branches that are already merged into a base branch
#[derive(Parser, Debug)]
#[command(name = "branch-sweep", version, about)]
#[command(long_about = r#"Delete local branches that are already merged into a base branch

By default a branch is deleted when its tip commit is reachable from the base
branch. The --check-* flags add further conditions, each of which can only
keep a branch that would otherwise be deleted.

Protected branches are never touched:
  - PROTECTED_BRANCHES (comma-separated; replaces the default
    main,master,develop,dev,release,staging,production)
  - CRITICAL_BRANCHES (comma-separated; default master,dev)
  - every --protect value
  - the checked-out branch

A .env file in the working directory is read before the environment."#)]
pub struct Cli {
    /// Path to the local repository
    #[arg(long, value_name = "PATH")]
    pub repo: PathBuf,

    /// Remote to fetch and query
    #[arg(long, default_value = DEFAULT_REMOTE, value_parser = NonEmptyStringValueParser::new())]
    pub remote: String,

    /// Branch a tip must be reachable from to count as merged
    /// [default: $BASE_BRANCH_FOR_COMMIT_CHECK, else dev]
    #[arg(long, value_name = "BASE", value_parser = NonEmptyStringValueParser::new())]
    pub base: Option<String>,

    /// Report what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Delete with `git branch -D`, bypassing git's unmerged-branch check
    #[arg(long)]
    pub force: bool,

    /// Additional branch to protect (repeatable)
    #[arg(long, value_name = "BRANCH")]
    pub protect: Vec<String>,

    /// Run `git fetch <remote> --prune` before any check
    #[arg(long)]
    pub fetch: bool,

    /// Only consider branches that track an upstream on the chosen remote
    #[arg(long)]
    pub check_upstream_missing: bool,

    /// Only delete branches that no longer exist on the remote (uses ls-remote)
    #[arg(long)]
    pub check_remote_missing: bool,

    /// Only delete `<id>-...` branches whose issue is closed in the base history
    #[arg(long)]
    pub check_issue_closure: bool,

    /// Verbose output (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Resolve flags and environment into the configuration for this run.
    pub fn into_config(self, env: &EnvSettings) -> anyhow::Result<RunConfig> {
        let protection = ProtectionPolicy::new(env, &self.protect)?;
        let base = match (self.base, &env.base) {
            (Some(flag), _) => flag,
            (None, Some(from_env)) if from_env.is_empty() => {
                bail!("{BASE_BRANCH_VAR} is set but empty");
            }
            (None, Some(from_env)) => from_env.clone(),
            (None, None) => DEFAULT_BASE_BRANCH.to_string(),
        };
        Ok(RunConfig {
            repo: self.repo,
            remote: self.remote,
            base,
            dry_run: self.dry_run,
            force: self.force,
            fetch: self.fetch,
            checks: Checks {
                upstream_tracking: self.check_upstream_missing,
                remote_absent: self.check_remote_missing,
                issue_closure: self.check_issue_closure,
            },
            protection,
        })
    }
}

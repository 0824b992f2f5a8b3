use std::io::Write;
use std::process;

use clap::Parser;
use color_print::cformat;

use branch_sweep::config::EnvSettings;
use branch_sweep::git::{self, Repository};
use branch_sweep::styling::{
    DELETED, ERROR, ERROR_EMOJI, HINT, HINT_EMOJI, KEPT, WARNING, WARNING_EMOJI, eprintln,
};

mod cli;
mod commands;

use cli::Cli;
use commands::SweepSummary;
use commands::branch_deletion::ReportLine;

/// Exit code for anything that stops the sweep before it starts.
const FATAL_EXIT_CODE: i32 = 2;

fn main() {
    // Variables already set in the environment take precedence over .env
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = dotenv
        && !err.not_found()
    {
        log::warn!("Ignoring .env: {err}");
    }

    if let Err(err) = run(cli) {
        print_error(&err);
        process::exit(FATAL_EXIT_CODE);
    }
}

/// `-v` raises the default `warn` level; `RUST_LOG` overrides both.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let env = EnvSettings::from_env();
    let config = cli.into_config(&env)?;
    let repo = Repository::open(&config.repo)?;

    let mut stdout = anstream::stdout().lock();
    let summary = commands::sweep(&repo, &config, |line| print_line(&mut stdout, line))?;
    drop(stdout);

    print_summary(&summary, config.dry_run);
    Ok(())
}

fn print_line(out: &mut impl Write, line: &ReportLine) -> anyhow::Result<()> {
    let style = if line.is_deletion() { DELETED } else { KEPT };
    writeln!(
        out,
        "{style}{}{style:#} {} ({})",
        line.tag(),
        line.branch,
        line.reason
    )?;
    out.flush()?;
    Ok(())
}

fn print_summary(summary: &SweepSummary, dry_run: bool) {
    let verb = if dry_run { "Would delete" } else { "Deleted" };
    let deleted = summary.deleted;
    let kept = summary.kept + summary.protected;
    let noun = if deleted == 1 { "branch" } else { "branches" };
    eprintln!(
        "{}",
        cformat!("<green>{verb} {deleted} {noun}</><dim>, kept {kept}</>")
    );
    if summary.failed > 0 {
        let failed = summary.failed;
        eprintln!(
            "{WARNING_EMOJI} {WARNING}{failed} could not be deleted; see the [SKIP] lines above{WARNING:#}"
        );
    }
}

fn print_error(err: &anyhow::Error) {
    eprintln!("{ERROR_EMOJI} {ERROR}{err:#}{ERROR:#}");
    if let Some(hint) = git::hint(err) {
        eprintln!("{HINT_EMOJI} {HINT}{hint}{HINT:#}");
    }
}

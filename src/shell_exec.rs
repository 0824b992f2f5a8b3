//! External command execution
//!
//! Every git invocation goes through [`Cmd`] so that commands are logged
//! uniformly: the command line at debug level before it runs, and a
//! `[sweep-trace]` line with its duration and outcome afterwards.
//!
//! Enable with `-vv` or `RUST_LOG=branch_sweep=debug`.

use std::borrow::Cow;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::Instant;

/// Builder for a single external command.
///
/// ```no_run
/// use branch_sweep::shell_exec::Cmd;
///
/// let output = Cmd::new("git")
///     .args(["branch", "--show-current"])
///     .current_dir("/tmp/repo")
///     .context("repo")
///     .run()?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Cmd {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    context: Option<String>,
    envs: Vec<(String, String)>,
}

impl Cmd {
    /// Create a new command builder for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            context: None,
            envs: Vec::new(),
        }
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the command.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Set the logging context (typically the repository directory name).
    pub fn context(mut self, ctx: impl Into<String>) -> Self {
        self.context = Some(ctx.into());
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.envs.push((key.into(), val.into()));
        self
    }

    /// The command line as a shell would need it typed, for logs and errors.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|part| shell_escape::escape(Cow::Borrowed(part.as_str())))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Execute the command and capture its output.
    ///
    /// Stdin is closed so that nothing can block waiting for a prompt.
    pub fn run(self) -> std::io::Result<Output> {
        let cmd_str = self.display();

        match &self.context {
            Some(ctx) => log::debug!("$ {} [{}]", cmd_str, ctx),
            None => log::debug!("$ {}", cmd_str),
        }

        let t0 = Instant::now();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::null());
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, val) in &self.envs {
            cmd.env(key, val);
        }

        let result = cmd.output();

        let dur_us = t0.elapsed().as_micros();
        let ctx = self.context.as_deref().unwrap_or("-");
        match &result {
            Ok(output) => {
                log::debug!(
                    "[sweep-trace] context={} cmd=\"{}\" dur_us={} ok={}",
                    ctx,
                    cmd_str,
                    dur_us,
                    output.status.success()
                );
                if !output.status.success() {
                    log::trace!(
                        "  stderr: {}",
                        String::from_utf8_lossy(&output.stderr).trim_end()
                    );
                }
            }
            Err(e) => {
                log::debug!(
                    "[sweep-trace] context={} cmd=\"{}\" dur_us={} err=\"{}\"",
                    ctx,
                    cmd_str,
                    dur_us,
                    e
                );
            }
        }

        result
    }
}

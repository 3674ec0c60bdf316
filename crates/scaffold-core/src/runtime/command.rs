//! External command execution with errors as values
//!
//! [`CommandRunner::run`] never fails: spawn errors, non-zero exits and timeouts all come
//! back as a [`CommandOutput`] with `success == false`, and callers decide per call site
//! whether that is fatal. In dry-run mode the command is only logged.

use crate::logger::Logger;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Generous default; `bun create` and `bun add` download packages
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Combined stdout and stderr, or the error text on failure
    pub output: String,
}

impl CommandOutput {
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }

    /// First non-empty line of the output, for one-line summaries
    pub fn summary(&self) -> &str {
        self.output
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("no output")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions<'a> {
    pub cwd: &'a Path,
    pub dry_run: bool,
}

impl<'a> RunOptions<'a> {
    pub fn new(cwd: &'a Path, dry_run: bool) -> Self {
        Self { cwd, dry_run }
    }
}

/// Per-command results of a best-effort batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub results: Vec<(String, CommandOutput)>,
}

impl BatchOutcome {
    /// True only if every command succeeded
    pub fn success(&self) -> bool {
        self.results.iter().all(|(_, output)| output.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &(String, CommandOutput)> {
        self.results.iter().filter(|(_, output)| !output.success)
    }
}

#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, command: &str, options: RunOptions<'_>) -> CommandOutput;

    /// Run commands in order; a failure does not stop the ones after it
    async fn run_batch(&self, commands: &[String], options: RunOptions<'_>) -> BatchOutcome {
        let mut results = Vec::with_capacity(commands.len());
        for command in commands {
            let output = self.run(command, options).await;
            results.push((command.clone(), output));
        }
        BatchOutcome { results }
    }
}

/// Runs commands through `sh -c`
pub struct ShellRunner<'a> {
    logger: &'a dyn Logger,
    timeout: Duration,
}

impl<'a> ShellRunner<'a> {
    pub fn new(logger: &'a dyn Logger) -> Self {
        Self {
            logger,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl CommandRunner for ShellRunner<'_> {
    async fn run(&self, command: &str, options: RunOptions<'_>) -> CommandOutput {
        self.logger.command(command);
        if options.dry_run {
            return CommandOutput::succeeded("");
        }

        debug!(command, cwd = %options.cwd.display(), "running command");

        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(options.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                warn!(command, error = %e, "failed to spawn command");
                return CommandOutput::failed(format!("Failed to run `{command}`: {e}"));
            }
        };

        // Dropping the future on timeout kills the child (kill_on_drop)
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return CommandOutput::failed(format!("Failed to wait for `{command}`: {e}"));
            }
            Err(_) => {
                warn!(command, timeout_secs = self.timeout.as_secs(), "command timed out");
                return CommandOutput::failed(format!(
                    "`{command}` timed out after {} seconds",
                    self.timeout.as_secs()
                ));
            }
        };

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            debug!(command, "command succeeded");
            CommandOutput::succeeded(text)
        } else {
            warn!(command, status = %output.status, "command failed");
            if text.trim().is_empty() {
                text = format!("`{command}` exited with {}", output.status);
            }
            CommandOutput::failed(text)
        }
    }
}

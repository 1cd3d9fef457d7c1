//! External process execution.
//!
//! Commands are described as a program plus an argument vector, so values
//! containing whitespace (commit messages, paths) reach the child process
//! unchanged.

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// A command to run: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    /// Program to execute (looked up on `PATH`).
    pub program: String,
    /// Arguments, passed to the program verbatim.
    pub args: Vec<String>,
    /// Working directory; inherits the current directory when unset.
    pub current_dir: Option<PathBuf>,
}

impl ProcessCommand {
    /// Creates a command for the given program with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Creates a `git` command.
    #[must_use]
    pub fn git() -> Self {
        Self::new("git")
    }

    /// Appends a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// The command that produced this output.
    pub command: ProcessCommand,
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Fails unless the process exited with status zero.
    ///
    /// Returns the output on success so callers can read stdout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Command`] carrying the exit code and trimmed stderr.
    pub fn assert_success(self) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        let stderr = self.stderr.trim();
        Err(Error::command(
            self.command.to_string(),
            self.code,
            (!stderr.is_empty()).then(|| stderr.to_string()),
        ))
    }
}

/// Runs external commands to completion.
pub trait ProcessRunner: Send + Sync {
    /// Runs the command, blocking until it exits, and collects its output.
    ///
    /// A nonzero exit is not an error here; call
    /// [`ProcessOutput::assert_success`] to enforce it.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run(&self, command: &ProcessCommand) -> Result<ProcessOutput>;
}

/// [`ProcessRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command: &ProcessCommand) -> Result<ProcessOutput> {
        info!(command = %command, "Running");

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(dir) = &command.current_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| {
            Error::command(command.to_string(), None, Some(format!("failed to spawn: {e}")))
        })?;

        let result = ProcessOutput {
            command: command.clone(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(
            command = %command,
            code = ?result.code,
            stdout_len = result.stdout.len(),
            "Finished"
        );

        Ok(result)
    }
}

/// Runs a command through `runner` and fails on nonzero exit.
///
/// # Errors
///
/// Returns an error if the command cannot be spawned or exits nonzero.
pub fn run_checked(runner: &dyn ProcessRunner, command: &ProcessCommand) -> Result<ProcessOutput> {
    runner.run(command)?.assert_success()
}

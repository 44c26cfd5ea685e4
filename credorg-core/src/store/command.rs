//! External tool invocation for command-line secret managers.
//!
//! [`OpCommand`] assembles an argument list from named sections (subcommand,
//! target, flags, field assignments) that always render in the same order,
//! so optional flags never need to be spliced into a finished list.
//! [`CommandRunner`] executes it; [`ProcessRunner`] spawns a real process.

use std::io;
use std::process::{Command, Stdio};

use tracing::trace;

/// Captured result of one external tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  pub stdout: Vec<u8>,
  pub stderr: String,
  pub success: bool,
}

impl CommandOutput {
  /// Successful invocation printing `stdout`
  pub fn ok(stdout: impl Into<Vec<u8>>) -> Self {
    Self {
      stdout: stdout.into(),
      stderr: String::new(),
      success: true,
    }
  }

  /// Failed invocation reporting `stderr`
  pub fn failed(stderr: impl Into<String>) -> Self {
    Self {
      stdout: Vec::new(),
      stderr: stderr.into(),
      success: false,
    }
  }
}

/// Runs an external program to completion
pub trait CommandRunner {
  /// Run `program` with `args`; `Err` only when it could not be started
  fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// Spawns the program as a child process with stdin closed
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
  fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
    let output = Command::new(program).args(args).stdin(Stdio::null()).output()?;

    Ok(CommandOutput {
      stdout: output.stdout,
      stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      success: output.status.success(),
    })
  }
}

/// Argument list for one `op` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpCommand {
  subcommand: Vec<&'static str>,
  target: Option<String>,
  flags: Vec<(&'static str, String)>,
  assignments: Vec<(&'static str, String)>,
}

impl OpCommand {
  /// `op item <action>`
  pub fn item(action: &'static str) -> Self {
    Self {
      subcommand: vec!["item", action],
      ..Self::default()
    }
  }

  /// Positional item reference placed right after the subcommand
  pub fn target(mut self, target: impl Into<String>) -> Self {
    self.target = Some(target.into());
    self
  }

  /// `--<name> <value>`
  pub fn flag(mut self, name: &'static str, value: impl Into<String>) -> Self {
    self.flags.push((name, value.into()));
    self
  }

  /// `--<name> <value>` only when `value` is present
  pub fn optional_flag(self, name: &'static str, value: Option<&str>) -> Self {
    match value {
      Some(value) => self.flag(name, value),
      None => self,
    }
  }

  /// `<field>=<value>` assignment placed after the `--` separator
  pub fn assign(mut self, field: &'static str, value: impl Into<String>) -> Self {
    self.assignments.push((field, value.into()));
    self
  }

  /// Render as: subcommand, target, flags in insertion order, then `--` and
  /// the assignments
  pub fn to_args(&self) -> Vec<String> {
    let mut args: Vec<String> = self.subcommand.iter().map(|s| s.to_string()).collect();

    if let Some(target) = &self.target {
      args.push(target.clone());
    }

    for (name, value) in &self.flags {
      args.push(format!("--{name}"));
      args.push(value.clone());
    }

    if !self.assignments.is_empty() {
      args.push("--".to_string());
      args.extend(self.assignments.iter().map(|(field, value)| format!("{field}={value}")));
    }

    args
  }

  /// Like [`OpCommand::to_args`] with assignment values masked, for logging
  pub fn redacted(&self) -> String {
    let mut redacted = self.clone();
    for (_, value) in &mut redacted.assignments {
      *value = "***".to_string();
    }
    redacted.to_args().join(" ")
  }

  /// Execute with `runner`
  pub fn run(&self, runner: &dyn CommandRunner, program: &str) -> io::Result<CommandOutput> {
    trace!("Running {program} {}", self.redacted());
    runner.run(program, &self.to_args())
  }
}

//! External tool command lines.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::types::Tool;

/// Sources `$1`, then execs the remaining arguments in the activated environment.
const ACTIVATE_WRAPPER: &str = r#". "$1" && shift && exec "$@""#;

/// A fully specified invocation of one external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
  pub tool: Tool,
  pub program: OsString,
  pub args: Vec<OsString>,
  /// Script to source before running the program, if any.
  pub activate: Option<PathBuf>,
}

impl ToolCommand {
  pub fn new(tool: Tool, program: impl AsRef<OsStr>) -> Self {
    Self {
      tool,
      program: program.as_ref().to_os_string(),
      args: Vec::new(),
      activate: None,
    }
  }

  pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.args.push(arg.as_ref().to_os_string());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
    self
  }

  /// Run inside the environment set up by `script`.
  pub fn activated(mut self, script: Option<PathBuf>) -> Self {
    self.activate = script;
    self
  }

  /// Build the process, wrapping it in `shell` when an activation script is set.
  ///
  /// Arguments are passed positionally so nothing is re-parsed by the shell.
  pub fn to_process(&self, shell: &str) -> Command {
    match &self.activate {
      Some(script) => {
        let mut command = Command::new(shell);
        command
          .arg("-c")
          .arg(ACTIVATE_WRAPPER)
          .arg(shell)
          .arg(script)
          .arg(&self.program)
          .args(&self.args);
        command
      }
      None => {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
      }
    }
  }

  /// Arguments as displayable strings, for logs and assertions.
  pub fn args_lossy(&self) -> Vec<String> {
    self.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
  }

  pub fn activation_script(&self) -> Option<&Path> {
    self.activate.as_deref()
  }
}

impl fmt::Display for ToolCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(script) = &self.activate {
      write!(f, ". {} && ", script.display())?;
    }
    write!(f, "{}", self.program.to_string_lossy())?;
    for arg in &self.args {
      write!(f, " {}", arg.to_string_lossy())?;
    }
    Ok(())
  }
}

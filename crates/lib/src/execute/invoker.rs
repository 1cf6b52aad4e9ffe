//! External process invocation.
//!
//! Tools run synchronously with inherited standard streams so their output is
//! shown live. A non-zero exit is always fatal to the pipeline.

use std::path::Path;
use std::process::Stdio;

use tracing::{debug, info};

use super::command::ToolCommand;
use super::types::{PipelineError, StageResult};
use crate::config::Toolchain;

/// Runs external tool commands.
///
/// The pipeline only talks to tools through this trait.
pub trait Invoker {
  /// Run `command` in `cwd`, blocking until it exits.
  ///
  /// # Errors
  ///
  /// [`PipelineError::ExternalTool`] on a non-zero exit, [`PipelineError::Spawn`]
  /// if the process could not be started.
  fn run(&self, command: &ToolCommand, cwd: &Path) -> Result<StageResult, PipelineError>;
}

impl<T: Invoker + ?Sized> Invoker for &T {
  fn run(&self, command: &ToolCommand, cwd: &Path) -> Result<StageResult, PipelineError> {
    (**self).run(command, cwd)
  }
}

/// Spawns real processes.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
  shell: String,
}

impl ProcessInvoker {
  pub fn new(shell: impl Into<String>) -> Self {
    Self { shell: shell.into() }
  }

  pub fn from_toolchain(toolchain: &Toolchain) -> Self {
    Self::new(toolchain.shell.clone())
  }
}

impl Invoker for ProcessInvoker {
  fn run(&self, command: &ToolCommand, cwd: &Path) -> Result<StageResult, PipelineError> {
    info!(tool = %command.tool, cmd = %command, "running external tool");

    let mut process = command.to_process(&self.shell);
    process
      .current_dir(cwd)
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit());

    debug!(shell = %self.shell, working_dir = %cwd.display(), "spawning process");

    let status = process.status().map_err(|source| PipelineError::Spawn {
      program: command.program.to_string_lossy().into_owned(),
      source,
    })?;

    if !status.success() {
      return Err(PipelineError::ExternalTool {
        tool: command.tool,
        command: command.to_string(),
        code: status.code(),
      });
    }

    Ok(StageResult::success(command.tool.stage()))
  }
}

//! Types for stage execution.
//!
//! This module defines the pipeline stages, the external tool roles, the error
//! taxonomy and the per-stage result reported to callers.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// A step of the build pipeline, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
  Install,
  Configure,
  Build,
  Boot,
}

impl Stage {
  pub fn as_str(self) -> &'static str {
    match self {
      Stage::Install => "install",
      Stage::Configure => "configure",
      Stage::Build => "build",
      Stage::Boot => "boot",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The external tool role behind an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
  /// Fetches dependencies into the build directory (`conan install`).
  Installer,
  /// Generates native build scripts (`cmake <source>`).
  Generator,
  /// Runs the native build (`cmake --build`).
  Builder,
  /// Loads and runs the produced image (`boot`).
  BootHelper,
}

impl Tool {
  /// The stage this tool carries out.
  pub fn stage(self) -> Stage {
    match self {
      Tool::Installer => Stage::Install,
      Tool::Generator => Stage::Configure,
      Tool::Builder => Stage::Build,
      Tool::BootHelper => Stage::Boot,
    }
  }
}

impl fmt::Display for Tool {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Tool::Installer => "dependency installer",
      Tool::Generator => "build-system generator",
      Tool::Builder => "native build",
      Tool::BootHelper => "boot helper",
    })
  }
}

/// Errors that abort a pipeline run.
///
/// None of these are recovered from locally.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// The source directory has no dependency manifest.
  #[error("conanfile.txt not found at {}", dir.display())]
  ManifestNotFound { dir: PathBuf },

  /// The source directory has no build description.
  #[error("CMakeLists.txt not found at {}", dir.display())]
  BuildDescriptorNotFound { dir: PathBuf },

  /// A tool exited successfully but left the expected marker missing or unusable.
  #[error("{tool} {problem}: {}", path.display())]
  ToolContractViolation {
    tool: Tool,
    problem: &'static str,
    path: PathBuf,
  },

  /// A tool exited with a non-zero status.
  #[error("{tool} failed with exit code {code:?}: {command}")]
  ExternalTool {
    tool: Tool,
    command: String,
    code: Option<i32>,
  },

  /// The build ran but the named executable is still missing.
  #[error("executable not found: {}", path.display())]
  ExecutableNotProduced { path: PathBuf },

  /// A marker or directory could not be inspected or created.
  #[error("filesystem error at {}: {source}", path.display())]
  Filesystem { path: PathBuf, source: std::io::Error },

  /// The tool process could not be started.
  #[error("failed to run {program}: {source}")]
  Spawn { program: String, source: std::io::Error },
}

impl PipelineError {
  /// Process exit status reported for this error.
  pub fn exit_code(&self) -> i32 {
    match self {
      PipelineError::Filesystem { .. } | PipelineError::Spawn { .. } => 1,
      PipelineError::ManifestNotFound { .. } | PipelineError::BuildDescriptorNotFound { .. } => 3,
      PipelineError::ToolContractViolation { .. } => 4,
      PipelineError::ExternalTool { .. } => 5,
      PipelineError::ExecutableNotProduced { .. } => 6,
    }
  }
}

/// Outcome of a single stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageResult {
  pub stage: Stage,
  pub succeeded: bool,
  pub failure_reason: Option<String>,
}

impl StageResult {
  pub fn success(stage: Stage) -> Self {
    Self {
      stage,
      succeeded: true,
      failure_reason: None,
    }
  }

  pub fn failure(stage: Stage, error: &PipelineError) -> Self {
    Self {
      stage,
      succeeded: false,
      failure_reason: Some(error.to_string()),
    }
  }
}

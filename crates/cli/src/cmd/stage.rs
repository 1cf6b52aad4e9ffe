//! Implementation of the `install`, `configure`, `build` and `boot` commands.
//!
//! All four share one shape: resolve a build context from the arguments, run
//! the requested stage (and whatever it cascades into), then report.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::debug;

use includeos_lib::{
  BuildContext, ContextOptions, Invoker, Pipeline, PipelineError, ProcessInvoker, Stage, StageResult, ToolCommand,
  Toolchain,
};

use crate::output::{OutputFormat, format_duration, print_command, print_error, print_info, print_json, print_success};

/// Arguments shared by every stage command.
#[derive(Args, Debug)]
pub struct TargetArgs {
  /// Path to the service source directory
  pub path: PathBuf,

  /// Directory to build in (default: current directory, or <path>/build if that is the source)
  #[arg(short = 'b', long = "build-folder", visible_alias = "bf", value_name = "DIR")]
  pub build_folder: Option<PathBuf>,

  /// Options passed directly to conan install
  #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "CONAN_ARGS")]
  pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ReinstallArgs {
  /// Force re-run of conan install and cmake configure
  #[arg(long)]
  pub reinstall: bool,
}

#[derive(Debug, Serialize)]
struct StageReport<'a> {
  #[serde(flatten)]
  result: &'a StageResult,
  source_dir: &'a Path,
  build_dir: &'a Path,
  duration_ms: u64,
}

/// Echoes each command line before handing it to the wrapped invoker.
struct EchoInvoker<I> {
  inner: I,
}

impl<I: Invoker> Invoker for EchoInvoker<I> {
  fn run(&self, command: &ToolCommand, cwd: &Path) -> Result<StageResult, PipelineError> {
    print_command(&command.to_string());
    self.inner.run(command, cwd)
  }
}

/// Execute a stage command.
///
/// Pipeline failures are reported and mapped to their exit status; only
/// failures of the CLI itself are returned as errors.
pub fn cmd_stage(stage: Stage, target: TargetArgs, reinstall: bool, output: OutputFormat) -> Result<ExitCode> {
  let cwd = std::env::current_dir().context("Failed to determine current directory")?;
  let ctx = BuildContext::resolve(
    ContextOptions {
      source: target.path,
      build_folder: target.build_folder,
      extra_args: target.args,
      force_reinstall: reinstall,
    },
    &cwd,
  );

  if !output.is_json() {
    print_info(&format!("Build folder: {}", ctx.build_dir().display()));
  }

  let toolchain = Toolchain::from_env();
  debug!(?toolchain, "resolved toolchain");

  let invoker = EchoInvoker {
    inner: ProcessInvoker::from_toolchain(&toolchain),
  };
  let pipeline = Pipeline::new(invoker, toolchain);

  let start = Instant::now();
  let outcome = pipeline.run(stage, &ctx);
  let elapsed = start.elapsed();

  let (result, code) = match &outcome {
    Ok(_) => (StageResult::success(stage), ExitCode::SUCCESS),
    Err(err) => (StageResult::failure(stage, err), exit_code(err)),
  };

  if output.is_json() {
    print_json(&StageReport {
      result: &result,
      source_dir: ctx.source_dir(),
      build_dir: ctx.build_dir(),
      duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    })?;
  } else if let Some(reason) = &result.failure_reason {
    print_error(&format!("{stage} failed: {reason}"));
  } else {
    print_success(&format!("{stage} complete ({})", format_duration(elapsed)));
  }

  Ok(code)
}

fn exit_code(err: &PipelineError) -> ExitCode {
  ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
}

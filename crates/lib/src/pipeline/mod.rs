//! The staged build pipeline.
//!
//! Four stages, each of which runs its prerequisite when the marker files say
//! it has not happened yet:
//!
//! ```text
//! install -> configure -> build -> boot
//! ```
//!
//! Markers are re-checked after every tool invocation. Any failure aborts the
//! whole run; nothing is retried.

mod plan;

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::Toolchain;
use crate::consts::{ACTIVATE_SCRIPT, BINARY_NAME_FILE, BUILD_INFO_FILE, MANIFEST_FILE};
use crate::context::BuildContext;
use crate::execute::{Invoker, PipelineError, Stage, StageResult, Tool, ToolCommand};
use crate::markers;

pub use plan::{BuildPlan, ConfigurePlan, plan_build, plan_configure};

/// Drives the external tools through an [`Invoker`].
pub struct Pipeline<I> {
  invoker: I,
  toolchain: Toolchain,
  jobs: usize,
}

impl<I: Invoker> Pipeline<I> {
  pub fn new(invoker: I, toolchain: Toolchain) -> Self {
    Self {
      invoker,
      toolchain,
      jobs: num_cpus(),
    }
  }

  /// Override the parallelism hint passed to the native build.
  pub fn with_jobs(mut self, jobs: usize) -> Self {
    self.jobs = jobs.max(1);
    self
  }

  pub fn invoker(&self) -> &I {
    &self.invoker
  }

  /// Run `stage` and whatever prerequisites it needs.
  pub fn run(&self, stage: Stage, ctx: &BuildContext) -> Result<StageResult, PipelineError> {
    match stage {
      Stage::Install => self.install(ctx),
      Stage::Configure => self.configure(ctx),
      Stage::Build => self.build(ctx),
      Stage::Boot => self.boot(ctx),
    }
  }

  /// Fetch dependencies into the build directory.
  ///
  /// # Errors
  ///
  /// - [`PipelineError::ManifestNotFound`] if the source has no `conanfile.txt`
  /// - [`PipelineError::ToolContractViolation`] if the installer left no build info behind
  pub fn install(&self, ctx: &BuildContext) -> Result<StageResult, PipelineError> {
    let source_dir = ctx.source_dir();
    let build_dir = ctx.build_dir();

    if !markers::exists(source_dir, MANIFEST_FILE)? {
      return Err(PipelineError::ManifestNotFound {
        dir: source_dir.to_path_buf(),
      });
    }

    fs::create_dir_all(build_dir).map_err(|source| PipelineError::Filesystem {
      path: build_dir.to_path_buf(),
      source,
    })?;

    let command = ToolCommand::new(Tool::Installer, &self.toolchain.conan)
      .arg("install")
      .arg(source_dir)
      .arg("-if")
      .arg(build_dir)
      .args(ctx.extra_args());
    self.invoker.run(&command, build_dir)?;

    if !markers::exists(build_dir, BUILD_INFO_FILE)? {
      return Err(PipelineError::ToolContractViolation {
        tool: Tool::Installer,
        problem: "did not produce",
        path: build_dir.join(BUILD_INFO_FILE),
      });
    }

    Ok(StageResult::success(Stage::Install))
  }

  /// Generate native build scripts, installing dependencies first if needed.
  ///
  /// Without an activation script in the build directory the generator step
  /// is skipped with a warning.
  pub fn configure(&self, ctx: &BuildContext) -> Result<StageResult, PipelineError> {
    self.configure_with(ctx, ctx.force_reinstall())
  }

  /// Run the native build, configuring first if needed.
  pub fn build(&self, ctx: &BuildContext) -> Result<StageResult, PipelineError> {
    self.build_with(ctx, ctx.force_reinstall())
  }

  /// Boot the executable named in `binary.txt`, producing it first if needed.
  ///
  /// A forced reinstall happens at most once per run, however far the
  /// cascade reaches.
  ///
  /// The name is joined onto the build directory, so an absolute name in
  /// `binary.txt` points outside it and is booted as is.
  ///
  /// # Errors
  ///
  /// - [`PipelineError::ToolContractViolation`] if configure left no usable `binary.txt`
  /// - [`PipelineError::ExecutableNotProduced`] if the build did not produce the executable
  pub fn boot(&self, ctx: &BuildContext) -> Result<StageResult, PipelineError> {
    let build_dir = ctx.build_dir();
    let mut force_reinstall = ctx.force_reinstall();

    if !markers::exists(build_dir, BINARY_NAME_FILE)? {
      cascade(Stage::Boot, Stage::Configure);
      self.configure_with(ctx, force_reinstall)?;
      force_reinstall = false;

      if !markers::exists(build_dir, BINARY_NAME_FILE)? {
        return Err(PipelineError::ToolContractViolation {
          tool: Tool::Generator,
          problem: "did not produce",
          path: build_dir.join(BINARY_NAME_FILE),
        });
      }
    }

    let name = markers::read_first_line(build_dir, BINARY_NAME_FILE)?;
    if name.is_empty() {
      return Err(PipelineError::ToolContractViolation {
        tool: Tool::Generator,
        problem: "left an empty executable name in",
        path: build_dir.join(BINARY_NAME_FILE),
      });
    }

    let executable = build_dir.join(&name);
    if !markers::exists(build_dir, &name)? {
      cascade(Stage::Boot, Stage::Build);
      self.build_with(ctx, force_reinstall)?;

      if !markers::exists(build_dir, &name)? {
        return Err(PipelineError::ExecutableNotProduced { path: executable });
      }
    }

    let activate = self.activation_script(ctx)?;
    if activate.is_none() {
      warn!(dir = %build_dir.display(), "no {ACTIVATE_SCRIPT} found, booting outside the activated environment");
    }

    info!(executable = %executable.display(), "booting");
    let command = ToolCommand::new(Tool::BootHelper, &self.toolchain.boot)
      .arg(&executable)
      .activated(activate);
    self.invoker.run(&command, build_dir)
  }

  fn configure_with(&self, ctx: &BuildContext, force_reinstall: bool) -> Result<StageResult, PipelineError> {
    let plan = plan_configure(ctx, force_reinstall)?;

    if plan.install {
      cascade(Stage::Configure, Stage::Install);
      self.install(ctx)?;
    }

    let Some(activate) = self.activation_script(ctx)? else {
      warn!(
        dir = %ctx.build_dir().display(),
        "no {ACTIVATE_SCRIPT} found, skipping build-system generator"
      );
      return Ok(StageResult::success(Stage::Configure));
    };

    let command = ToolCommand::new(Tool::Generator, &self.toolchain.cmake)
      .arg(ctx.source_dir())
      .activated(Some(activate));
    self.invoker.run(&command, ctx.build_dir())
  }

  fn build_with(&self, ctx: &BuildContext, force_reinstall: bool) -> Result<StageResult, PipelineError> {
    let build_dir = ctx.build_dir();

    if let BuildPlan::ConfigureFirst { force_reinstall } = plan_build(ctx, force_reinstall)? {
      cascade(Stage::Build, Stage::Configure);
      self.configure_with(ctx, force_reinstall)?;
    }

    let command = ToolCommand::new(Tool::Builder, &self.toolchain.cmake)
      .arg("--build")
      .arg(build_dir)
      .arg("-j")
      .arg(self.jobs.to_string());
    self.invoker.run(&command, build_dir)
  }

  fn activation_script(&self, ctx: &BuildContext) -> Result<Option<PathBuf>, PipelineError> {
    let build_dir = ctx.build_dir();
    Ok(markers::exists(build_dir, ACTIVATE_SCRIPT)?.then(|| build_dir.join(ACTIVATE_SCRIPT)))
  }
}

fn cascade(stage: Stage, prerequisite: Stage) {
  info!(%stage, %prerequisite, "running prerequisite stage");
}

/// Get the number of CPUs for the native build's parallelism hint.
fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}

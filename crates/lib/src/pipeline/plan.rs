//! Prerequisite decisions for the cascading stages.
//!
//! These only inspect markers; nothing is spawned.

use crate::consts::{BUILD_DESCRIPTOR_FILE, BUILD_INFO_FILE, BUILD_SCRIPT_FILE};
use crate::context::BuildContext;
use crate::execute::PipelineError;
use crate::markers;

/// What `configure` has to do before running the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurePlan {
  /// Run the dependency installer first.
  pub install: bool,
}

/// What `build` has to do before running the native build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPlan {
  /// Build scripts are in place.
  BuildOnly,
  /// Configure first.
  ConfigureFirst { force_reinstall: bool },
}

/// Decide whether configure needs the installer.
///
/// # Errors
///
/// [`PipelineError::BuildDescriptorNotFound`] if the source has no build description.
pub fn plan_configure(ctx: &BuildContext, force_reinstall: bool) -> Result<ConfigurePlan, PipelineError> {
  if !markers::exists(ctx.source_dir(), BUILD_DESCRIPTOR_FILE)? {
    return Err(PipelineError::BuildDescriptorNotFound {
      dir: ctx.source_dir().to_path_buf(),
    });
  }

  let install = force_reinstall || !markers::exists(ctx.build_dir(), BUILD_INFO_FILE)?;
  Ok(ConfigurePlan { install })
}

/// Decide whether build needs configure.
///
/// A missing build script requires configure. If the build description is
/// missing too, configure is planned with a forced reinstall; configure then
/// rejects the missing description before anything is spawned.
pub fn plan_build(ctx: &BuildContext, force_reinstall: bool) -> Result<BuildPlan, PipelineError> {
  let has_script = markers::exists(ctx.build_dir(), BUILD_SCRIPT_FILE)?;

  if has_script {
    return Ok(if force_reinstall {
      BuildPlan::ConfigureFirst { force_reinstall: true }
    } else {
      BuildPlan::BuildOnly
    });
  }

  let has_descriptor = markers::exists(ctx.source_dir(), BUILD_DESCRIPTOR_FILE)?;
  Ok(BuildPlan::ConfigureFirst {
    force_reinstall: force_reinstall || !has_descriptor,
  })
}

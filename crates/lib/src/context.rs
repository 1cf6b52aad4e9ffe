//! Per-invocation build context.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::consts::DEFAULT_BUILD_DIR;

/// Unresolved inputs for a [`BuildContext`], as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
  /// Path to the service source directory
  pub source: PathBuf,
  /// Build folder; defaults to the working directory
  pub build_folder: Option<PathBuf>,
  /// Arguments passed verbatim to the dependency installer
  pub extra_args: Vec<String>,
  /// Re-run the dependency installer even if its marker is present
  pub force_reinstall: bool,
}

/// Resolved directories and flags for one pipeline run.
///
/// Both directories are absolute. When source and build folder name the same
/// location the build directory is `<source>/build` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
  source_dir: PathBuf,
  build_dir: PathBuf,
  extra_args: Vec<String>,
  force_reinstall: bool,
}

impl BuildContext {
  /// Resolve `options` against an explicit working directory.
  ///
  /// `cwd` must be absolute; relative paths in `options` are joined to it.
  pub fn resolve(options: ContextOptions, cwd: &Path) -> Self {
    let source_dir = absolutize(&options.source, cwd);
    let build_folder = options.build_folder.as_deref().unwrap_or(Path::new("."));
    let mut build_dir = absolutize(build_folder, cwd);

    if same_location(&source_dir, &build_dir) {
      build_dir = source_dir.join(DEFAULT_BUILD_DIR);
    }

    debug!(source = %source_dir.display(), build = %build_dir.display(), "resolved build context");

    Self {
      source_dir,
      build_dir,
      extra_args: options.extra_args,
      force_reinstall: options.force_reinstall,
    }
  }

  pub fn source_dir(&self) -> &Path {
    &self.source_dir
  }

  pub fn build_dir(&self) -> &Path {
    &self.build_dir
  }

  pub fn extra_args(&self) -> &[String] {
    &self.extra_args
  }

  pub fn force_reinstall(&self) -> bool {
    self.force_reinstall
  }
}

/// Join `path` to `cwd` and drop `.` components lexically.
fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
  let joined = cwd.join(path);
  let normalized: PathBuf = joined.components().filter(|c| !matches!(c, Component::CurDir)).collect();
  dunce::simplified(&normalized).to_path_buf()
}

/// Compare canonical forms when both paths exist, lexical forms otherwise.
fn same_location(a: &Path, b: &Path) -> bool {
  match (dunce::canonicalize(a), dunce::canonicalize(b)) {
    (Ok(a), Ok(b)) => a == b,
    _ => a == b,
  }
}

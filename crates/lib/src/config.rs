//! Toolchain configuration.
//!
//! The external tools are looked up on `PATH` by name unless overridden through
//! environment variables. Resolution happens once, when the pipeline is built.

use crate::consts::{BOOT_ENV, CMAKE_ENV, CONAN_ENV, SHELL_ENV};

/// The executables that play each external role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  /// Dependency installer
  pub conan: String,
  /// Build-system generator and native build driver
  pub cmake: String,
  /// Boot helper
  pub boot: String,
  /// POSIX shell used to source activation scripts
  pub shell: String,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      conan: "conan".to_string(),
      cmake: "cmake".to_string(),
      boot: "boot".to_string(),
      shell: default_shell().to_string(),
    }
  }
}

impl Toolchain {
  /// Resolve the toolchain from `INCLUDEOS_*` environment variables.
  ///
  /// Unset or empty variables fall back to the defaults.
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      conan: env_or(CONAN_ENV, defaults.conan),
      cmake: env_or(CMAKE_ENV, defaults.cmake),
      boot: env_or(BOOT_ENV, defaults.boot),
      shell: env_or(SHELL_ENV, defaults.shell),
    }
  }
}

fn env_or(var: &str, default: String) -> String {
  std::env::var(var).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}

#[cfg(unix)]
fn default_shell() -> &'static str {
  "/bin/sh"
}

#[cfg(windows)]
fn default_shell() -> &'static str {
  "sh.exe"
}

//! Stage-completion marker files.
//!
//! External tools signal that a stage completed by leaving files behind in the
//! source or build directory. These helpers only ever read them.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::execute::PipelineError;

/// Returns whether `dir/marker` exists and is a regular file.
///
/// A missing file or missing directory is `Ok(false)`. Any other I/O failure,
/// such as an unreadable directory, is a [`PipelineError::Filesystem`].
pub fn exists(dir: &Path, marker: &str) -> Result<bool, PipelineError> {
  let path = dir.join(marker);
  let found = match fs::metadata(&path) {
    Ok(meta) => meta.is_file(),
    Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => false,
    Err(source) => return Err(PipelineError::Filesystem { path, source }),
  };
  debug!(path = %path.display(), found, "checked marker");
  Ok(found)
}

/// Read the first line of `dir/marker`, without its line terminator.
///
/// Any further lines are ignored. Surrounding spaces are kept.
pub fn read_first_line(dir: &Path, marker: &str) -> Result<String, PipelineError> {
  let path = dir.join(marker);
  let content = fs::read_to_string(&path).map_err(|source| PipelineError::Filesystem { path, source })?;
  Ok(content.lines().next().unwrap_or_default().trim_end_matches(['\r', '\n']).to_string())
}

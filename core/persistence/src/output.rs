//! FILENAME: core/persistence/src/output.rs
//! Writing artifacts to disk.

use crate::{Artifact, ExportError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Write `artifact` into `dir` under its fixed file name.
///
/// The bytes go to a temporary file in the same directory which is then
/// renamed over the target, so a failed write leaves any previous file intact.
pub fn write_artifact(dir: &Path, artifact: &Artifact) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let target = dir.join(&artifact.file_name);

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(&artifact.bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(&target).map_err(|e| ExportError::Io(e.error))?;

    log::info!("wrote {} ({} bytes)", target.display(), artifact.bytes.len());
    Ok(target)
}

//! Writes generated files to disk

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::codegen::OutputObject;
use crate::error::Result;

/// Write each output to `<dir>/<output_path>/<file_name>`, creating
/// directories as needed. In dry-run mode nothing is written.
///
/// Returns the paths written (or that would have been written).
pub fn write_outputs(outputs: &[OutputObject], dir: &Path, dry_run: bool) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(outputs.len());
    for output in outputs {
        let path = dir.join(output.relative_path());
        if dry_run {
            info!("Would write {} ({} bytes)", path.display(), output.body.len());
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &output.body)?;
            debug!("Wrote {}", path.display());
        }
        written.push(path);
    }
    Ok(written)
}

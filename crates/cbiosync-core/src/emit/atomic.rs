//! Atomic file replacement
//!
//! Writes go to a sibling temp file that is renamed over the target, so a
//! reader never sees a half-written output.

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use std::fs;
use std::path::Path;

/// Replace `target_path` with `content`, creating parent directories
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_output_dir", parent, e))?;
    }

    let mut temp_name = target_path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    fs::write(temp_path, content).map_err(|e| io_error("write_output_temp", temp_path, e))?;
    fs::rename(temp_path, target_path)
        .map_err(|e| io_error("rename_output_temp", target_path, e))?;

    Ok(())
}

/// Remove `target_path` if present; `Ok(false)` when there was nothing to remove
///
/// The file is first renamed to a sibling name, so readers see either the
/// old file or no file.
pub fn atomic_remove(target_path: &Path) -> Result<bool> {
    let mut retired_name = target_path.as_os_str().to_owned();
    retired_name.push(".retired");
    let retired_path = Path::new(&retired_name);

    match fs::rename(target_path, retired_path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(io_error("retire_output", target_path, e)),
    }
    fs::remove_file(retired_path).map_err(|e| io_error("remove_output", retired_path, e))?;
    Ok(true)
}

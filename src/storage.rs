use crate::error::{Result, TrackerError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Replaces `path` with `bytes` by writing a sibling temp file and renaming it
/// over the target, so readers see either the old or the new file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| TrackerError::persistence(parent, e))?;
        }
    }
    let tmp = temp_path(path);
    {
        let mut file = fs::File::create(&tmp).map_err(|e| TrackerError::persistence(&tmp, e))?;
        file.write_all(bytes).map_err(|e| TrackerError::persistence(&tmp, e))?;
        file.sync_all().map_err(|e| TrackerError::persistence(&tmp, e))?;
    }
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        TrackerError::persistence(path, e)
    })?;
    debug!("storage: wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

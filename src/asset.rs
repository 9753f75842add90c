//! Persisting the encoded asset to disk

use log::debug;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Write `bytes` to `path`, creating missing parent directories and
/// replacing any existing file. Returns the size of the file on disk.
pub fn write_asset(path: &Path, bytes: &[u8]) -> Result<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, bytes).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;

    let size = fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| Error::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("Wrote {} bytes to {}", size, path.display());
    Ok(size)
}

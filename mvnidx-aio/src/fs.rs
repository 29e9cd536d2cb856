// mvnidx-aio/src/fs.rs
// Primitive synchronous filesystem operations.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mvnidx_common::error::{IdxError, Result};
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

/// Checks if a path points to a regular file (resolving symlinks).
pub fn is_regular_file(path: &Path) -> bool {
    path.is_file()
}

/// Last modification time of a file, `None` if it does not exist.
pub fn modified_time(path: &Path) -> Result<Option<DateTime<Utc>>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(DateTime::<Utc>::from(metadata.modified()?))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(IdxError::from(e)),
    }
}

/// Removes a file. A missing file is not an error; returns whether
/// something was removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    debug!("Removing file: {}", path.display());
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => {
            error!("Failed remove file {}: {}", path.display(), e);
            Err(IdxError::from(e))
        }
    }
}

/// Atomically writes data to a file using a temporary file in the same
/// directory. Preserves original permissions if possible.
pub fn atomic_write_file(original_path: &Path, content: &[u8]) -> Result<()> {
    let dir = original_path.parent().ok_or_else(|| {
        IdxError::IoError(format!(
            "Cannot get parent directory for {}",
            original_path.display()
        ))
    })?;
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };

    fs::create_dir_all(dir).map_err(|e| {
        error!("Failed create dir {}: {}", dir.display(), e);
        IdxError::from(e)
    })?;

    let original_perms = fs::metadata(original_path).map(|m| m.permissions()).ok();

    let mut temp_file = NamedTempFile::new_in(dir)?;
    let temp_path = temp_file.path().to_path_buf();

    debug!(
        "Atomically writing {} bytes to {} via temp file {}",
        content.len(),
        original_path.display(),
        temp_path.display()
    );

    temp_file.write_all(content)?;
    temp_file.flush()?;
    temp_file.as_file().sync_all()?;

    temp_file.persist(original_path).map_err(|e| {
        error!(
            "Failed to persist temporary file {} over {}: {}",
            temp_path.display(),
            original_path.display(),
            e.error
        );
        IdxError::Io(Arc::new(e.error))
    })?;

    if let Some(perms) = original_perms {
        if let Err(e) = fs::set_permissions(original_path, perms) {
            warn!(
                "Failed to restore original permissions on {}: {}",
                original_path.display(),
                e
            );
        }
    }

    Ok(())
}

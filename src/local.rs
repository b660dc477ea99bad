//! Local file access for uploads and downloads

use crate::error::{Operation, Result, TransferError};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Read a whole file into memory
///
/// # Errors
///
/// [`TransferError::FileRead`] tagged with `operation` if the file is
/// missing or unreadable.
pub async fn read_all_bytes(operation: Operation, path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|source| TransferError::FileRead {
            operation,
            path: path.to_path_buf(),
            source,
        })
}

/// Write `bytes` to `path`, replacing any existing file
///
/// The content goes to a uniquely named temp file in the same directory and
/// is renamed over the target, so the target is either the old file or one
/// complete new one, even with several writers racing on the same path.
/// The parent directory must already exist.
///
/// # Errors
///
/// Returns the underlying I/O error; callers attach download context.
pub async fn write_all_bytes(path: &Path, bytes: Vec<u8>) -> io::Result<()> {
    let target = path.to_path_buf();
    let len = bytes.len();
    tokio::task::spawn_blocking(move || replace_file(&target, &bytes))
        .await
        .map_err(|e| io::Error::other(format!("write task failed: {e}")))??;
    debug!(path = %path.display(), bytes = len, "file written");
    Ok(())
}

fn replace_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Dropped (and removed) on any error before persist
    let mut temp = tempfile::Builder::new()
        .prefix(".glb-transfer-")
        .suffix(".part")
        .tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    let _ = temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// File name component of `path`, used as the upload name
///
/// # Errors
///
/// [`TransferError::InvalidArgument`] tagged with `operation` if the path
/// has no file name or the name is not valid UTF-8.
pub fn base_name(operation: Operation, path: &Path) -> Result<String> {
    let invalid = |reason: &str| TransferError::InvalidArgument {
        operation,
        reason: format!("{} {reason}", path.display()),
    };
    let name = path
        .file_name()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| invalid("does not name a file"))?;
    name.to_str()
        .map(str::to_string)
        .ok_or_else(|| invalid("has a file name that is not valid UTF-8"))
}

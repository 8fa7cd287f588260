//! Common filesystem utilities

use filetime::FileTime;
use std::io;
use std::path::Path;

/// Ensure a file's parent directory exists.
///
/// Creates the parent directory (and all ancestors) if it doesn't exist.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// True if anything (file, directory, even a dangling symlink) sits at `path`.
pub fn entry_exists(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// Copy a file, creating parent directories as needed.
///
/// Permission bits are carried by `std::fs::copy`; access and modification
/// times are copied afterwards.
pub fn copy_preserving(src: &Path, dest: &Path) -> io::Result<u64> {
    ensure_parent_dir(dest)?;
    let bytes = std::fs::copy(src, dest)?;

    let meta = std::fs::metadata(src)?;
    filetime::set_file_times(
        dest,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )?;

    Ok(bytes)
}

//! Conflict-safe tree merge
//!
//! Copies an extracted source tree into the destination. Existing files are
//! never overwritten unless `force` is set; instead they are collected and
//! reported together once the whole tree has been walked. Files without a
//! conflict are written even when others conflict.

use crate::core::error::{Conflicts, CopyError};
use std::path::Path;
use walkdir::WalkDir;

use super::internal::fs_utils;

/// What a merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub files_copied: usize,
    pub files_overwritten: usize,
    pub dirs_ensured: usize,
}

/// Merge the contents of `source_root` (not the folder itself) into `dest`.
pub fn copy_tree(source_root: &Path, dest: &Path, force: bool) -> Result<CopySummary, CopyError> {
    let mut summary = CopySummary::default();
    let mut conflicts = Conflicts::new();

    for entry in WalkDir::new(source_root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(source_root) else {
            continue;
        };
        let target = dest.join(relative);
        let io_err = |source: std::io::Error| CopyError::Io {
            from: entry.path().to_path_buf(),
            to: target.clone(),
            source,
        };

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(io_err)?;
            summary.dirs_ensured += 1;
            continue;
        }

        let exists = fs_utils::entry_exists(&target);
        if exists && !force {
            conflicts.push(relative.to_path_buf());
            continue;
        }

        fs_utils::copy_preserving(entry.path(), &target).map_err(io_err)?;
        summary.files_copied += 1;
        if exists {
            summary.files_overwritten += 1;
        }
    }

    if !conflicts.is_empty() {
        return Err(CopyError::Conflicts(conflicts));
    }

    Ok(summary)
}

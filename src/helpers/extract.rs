//! Zip extraction
//!
//! GitHub source archives wrap everything in one folder named after the
//! repository and commit (`Owner-Repo-abc1234/`). [`unpack`] finds that
//! folder, extracts the whole archive and hands back the folder's path.

use crate::core::error::ExtractError;
use crate::core::output;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use super::internal::fs_utils;
use super::internal::progress;

/// Finder metadata that macOS tools add to zips.
const MACOS_METADATA_DIR: &str = "__MACOSX/";

/// Name of the top-level folder, taken from the first non-metadata entry.
pub fn detect_root_folder<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<String, ExtractError> {
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        let name = entry.name();
        if name.is_empty() || name.starts_with(MACOS_METADATA_DIR) {
            continue;
        }

        let root = name.split('/').next().unwrap_or_default();
        if !root.is_empty() {
            return Ok(root.to_string());
        }
    }

    Err(ExtractError::EmptyArchive)
}

/// Extract every entry of `archive` below `dest`.
///
/// Entries whose names would land outside `dest` are skipped.
pub fn extract_all<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    dest: &Path,
) -> Result<(), ExtractError> {
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;

        let outpath = match file.enclosed_name() {
            Some(path) => dest.join(path),
            None => continue,
        };
        let io_err = |source: std::io::Error| ExtractError::Io {
            path: outpath.clone(),
            source,
        };

        if file.is_dir() {
            std::fs::create_dir_all(&outpath).map_err(io_err)?;
            continue;
        }

        fs_utils::ensure_parent_dir(&outpath).map_err(io_err)?;
        let mut outfile = File::create(&outpath).map_err(io_err)?;
        std::io::copy(&mut file, &mut outfile).map_err(io_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                    .map_err(io_err)?;
            }
        }
    }

    Ok(())
}

/// Extract the zip at `archive_path` into `workspace` and return the source root.
pub fn unpack(archive_path: &Path, workspace: &Path) -> Result<PathBuf, ExtractError> {
    let file = File::open(archive_path).map_err(|source| ExtractError::Io {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file)?;

    let root_name = detect_root_folder(&mut archive)?;

    let pb = progress::create_spinner(&format!("extracting {} entries", archive.len()));
    let result = extract_all(&mut archive, workspace);
    pb.finish_and_clear();
    result?;

    let source_root = workspace.join(&root_name);
    if !source_root.is_dir() {
        return Err(ExtractError::MissingRoot(source_root));
    }

    output::detail(&format!("extracted {} ({} entries)", root_name, archive.len()));
    Ok(source_root)
}

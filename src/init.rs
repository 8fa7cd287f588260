//! The `init` routine
//!
//! resolve source → download → extract → copy, staged in a temporary
//! workspace that is removed however the run ends.

use crate::core::error::InitError;
use crate::core::output;
use crate::github::GitHubClient;
use crate::helpers::download::download;
use crate::helpers::extract::unpack;
use crate::helpers::tree::{CopySummary, copy_tree};
use crate::resolve::{self, Source};
use std::path::PathBuf;

/// Prefix of the temporary staging directory
const WORKSPACE_PREFIX: &str = "lazyfox-init-";

/// File name of the downloaded archive inside the workspace
const ARCHIVE_NAME: &str = "source.zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOptions {
    /// `latest` or a tag name
    pub version: String,
    pub dest: PathBuf,
    /// Overwrite files that already exist in `dest`
    pub force: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            version: resolve::LATEST.to_string(),
            dest: PathBuf::from("."),
            force: false,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub source: Source,
    /// Canonical destination path
    pub dest: PathBuf,
    pub summary: CopySummary,
}

pub fn run(client: &GitHubClient, options: &InitOptions) -> Result<InitReport, InitError> {
    let dest = prepare_dest(&options.dest)?;

    output::action(&format!("Resolving {}", options.version));
    let source = resolve::resolve(client, &options.version)?;

    output::field("repository", client.upstream().repo_url());
    output::field("source", &source.source_type);
    output::field("version", &source.tag_name);
    output::field("destination", dest.display());
    if options.force {
        output::info("--force: existing files will be overwritten");
    }

    let workspace = tempfile::Builder::new()
        .prefix(WORKSPACE_PREFIX)
        .tempdir()
        .map_err(InitError::Workspace)?;

    output::sub_action("download");
    let archive_path = workspace.path().join(ARCHIVE_NAME);
    download(client, &source.zipball_url, &archive_path)?;

    output::sub_action("extract");
    let source_root = unpack(&archive_path, workspace.path())?;

    output::sub_action("copy");
    let summary = copy_tree(&source_root, &dest, options.force)?;

    if let Err(e) = workspace.close() {
        output::warning(&format!("could not remove temporary workspace: {}", e));
    }

    if summary.files_overwritten > 0 {
        output::warning(&format!("overwrote {} existing file(s)", summary.files_overwritten));
    }
    output::success(&format!(
        "Done: {} file(s) written to {}",
        summary.files_copied,
        dest.display()
    ));

    Ok(InitReport {
        source,
        dest,
        summary,
    })
}

/// Create the destination tree and return its canonical path.
fn prepare_dest(dest: &std::path::Path) -> Result<PathBuf, InitError> {
    let io_err = |source: std::io::Error| InitError::Destination {
        path: dest.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(dest).map_err(io_err)?;
    std::fs::canonicalize(dest).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = InitOptions::default();
        assert_eq!(opts.version, "latest");
        assert_eq!(opts.dest, PathBuf::from("."));
        assert!(!opts.force);
    }

    #[test]
    fn test_prepare_dest_creates_and_canonicalizes() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/../c");

        let dest = prepare_dest(&nested).unwrap();
        assert!(dest.is_dir());
        assert!(dest.is_absolute());
        assert!(dest.ends_with("a/c"));
    }

    #[test]
    fn test_prepare_dest_fails_on_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        std::fs::write(&file, "x").unwrap();

        let err = prepare_dest(&file).unwrap_err();
        assert!(matches!(err, InitError::Destination { .. }));
    }
}

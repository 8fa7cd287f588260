//! Error types for every init stage.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Maximum number of conflicting paths listed in a conflict report.
pub const CONFLICT_PREVIEW_LIMIT: usize = 20;

/// Errors returned by the GitHub API client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    #[error("failed to parse GitHub response: {0}")]
    Decode(String),
}

impl ApiError {
    /// True for a 404 response, the only API failure the resolver falls through on.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// Errors that can occur while turning a version label into a download source.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("version `{0}` not found: no matching release or tag")]
    VersionNotFound(String),

    #[error("repository info has no default branch")]
    NoDefaultBranch,

    #[error("{0} has no zipball_url, cannot download sources")]
    MissingArchiveUrl(String),
}

/// Errors that can occur while downloading the archive.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while unpacking the archive.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("archive is empty")]
    EmptyArchive,

    #[error("zip read error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("source directory {} not found after extraction", .0.display())]
    MissingRoot(PathBuf),

    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while merging the extracted tree into the destination.
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("{0}")]
    Conflicts(Conflicts),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("copy failed: {} -> {}: {source}", from.display(), to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level init failure; each variant names the stage it came from.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("cannot create destination {}: {source}", path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve download source: {0}")]
    Resolve(#[from] ResolveError),

    #[error("cannot create temporary workspace: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("{0}")]
    Copy(#[from] CopyError),
}

/// Relative paths that already existed in the destination and were left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conflicts {
    paths: Vec<PathBuf>,
}

impl Conflicts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl fmt::Display for Conflicts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "destination already contains {} file(s) from the archive; they were left untouched and all other files were written. Use --force to overwrite.",
            self.paths.len()
        )?;
        write!(f, "conflicting files:")?;
        for path in self.paths.iter().take(CONFLICT_PREVIEW_LIMIT) {
            write!(f, "\n  - {}", path.display())?;
        }
        if self.paths.len() > CONFLICT_PREVIEW_LIMIT {
            write!(
                f,
                "\n  ... and {} more conflicting files",
                self.paths.len() - CONFLICT_PREVIEW_LIMIT
            )?;
        }
        Ok(())
    }
}

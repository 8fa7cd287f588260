//! Fetch and unpack LazyFox sources
//!
//! `lazyfox` downloads the source archive of the fixed upstream repository
//! (`AmethystDev-Labs/LazyFox`) and merges it into a local directory.
//!
//! # Pipeline
//!
//! 1. [`resolve`] - turn `latest` or a tag name into a [`Source`]
//!    (latest release → newest tag → default branch, or release → tag scan)
//! 2. [`helpers::download`] - stream the zipball into a temporary workspace
//! 3. [`helpers::extract`] - unpack it and locate the wrapper folder
//! 4. [`helpers::tree`] - copy the folder's contents into the destination,
//!    refusing to overwrite existing files unless forced
//!
//! [`init::run`] wires these together.
//!
//! # Example
//!
//! ```no_run
//! use lazyfox::{GitHubClient, InitOptions, Upstream};
//!
//! let client = GitHubClient::new(Upstream::default());
//! let report = lazyfox::init::run(&client, &InitOptions::default())?;
//! println!("{} files from {}", report.summary.files_copied, report.source.tag_name);
//! # Ok::<(), lazyfox::InitError>(())
//! ```

pub mod config;
pub mod core;
pub mod github;
pub mod helpers;
pub mod init;
pub mod resolve;

pub use crate::core::error::{
    ApiError, Conflicts, CopyError, DownloadError, ExtractError, InitError, ResolveError,
};
pub use crate::core::output;
pub use config::Upstream;
pub use github::GitHubClient;
pub use init::{InitOptions, InitReport};
pub use resolve::{Source, SourceKind};

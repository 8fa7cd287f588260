//! Version resolution
//!
//! Turns a version label (`latest` or an explicit tag) into a [`Source`]
//! by trying a fixed sequence of lookups. The first step that yields a
//! source wins. Only a 404 from a release lookup falls through to the next
//! step; every other failure stops the chain.
//!
//! | label    | steps                                              |
//! |----------|----------------------------------------------------|
//! | `latest` | latest release → newest tag → default branch       |
//! | `V`      | release tagged `V` → tag named `V` (first 100)     |

use crate::config;
use crate::core::error::{ApiError, ResolveError};
use crate::github::{GitHubClient, Release};
use std::fmt;

/// The version label that selects the newest available source.
pub const LATEST: &str = "latest";

/// How the archive was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    LatestRelease,
    LatestTag,
    DefaultBranch(String),
    ReleaseTag,
    GitTag,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::LatestRelease => write!(f, "latest release"),
            SourceKind::LatestTag => write!(f, "latest tag"),
            SourceKind::DefaultBranch(branch) => write!(f, "default branch ({})", branch),
            SourceKind::ReleaseTag => write!(f, "release tag"),
            SourceKind::GitTag => write!(f, "git tag"),
        }
    }
}

/// A resolved, downloadable archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub source_type: SourceKind,
    pub tag_name: String,
    pub zipball_url: String,
}

type Step<'a> = Box<dyn FnOnce() -> Result<Option<Source>, ResolveError> + 'a>;

fn step<'a>(f: impl FnOnce() -> Result<Option<Source>, ResolveError> + 'a) -> Step<'a> {
    Box::new(f)
}

/// Run steps in order and return the first source produced.
fn first_source(steps: Vec<Step<'_>>) -> Result<Option<Source>, ResolveError> {
    for next in steps {
        if let Some(source) = next()? {
            return Ok(Some(source));
        }
    }
    Ok(None)
}

/// Treat a 404 as "nothing here", keep every other error.
fn not_found_as_none<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Resolve a version label to a download source.
pub fn resolve(client: &GitHubClient, version: &str) -> Result<Source, ResolveError> {
    if version == LATEST {
        resolve_latest(client)
    } else {
        resolve_version(client, version)
    }
}

fn resolve_latest(client: &GitHubClient) -> Result<Source, ResolveError> {
    let steps = vec![
        step(|| latest_release(client)),
        step(|| latest_tag(client)),
        step(|| default_branch(client).map(Some)),
    ];

    // The default branch step never yields None.
    first_source(steps)?.ok_or(ResolveError::NoDefaultBranch)
}

fn resolve_version(client: &GitHubClient, version: &str) -> Result<Source, ResolveError> {
    let steps = vec![
        step(|| release_by_tag(client, version)),
        step(|| tag_by_name(client, version)),
    ];

    first_source(steps)?.ok_or_else(|| ResolveError::VersionNotFound(version.to_string()))
}

/// A release only counts when it links an archive.
fn release_source(release: Release, kind: SourceKind, fallback_tag: &str) -> Option<Source> {
    let zipball_url = release.zipball_url.filter(|u| !u.is_empty())?;
    Some(Source {
        source_type: kind,
        tag_name: release
            .tag_name
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| fallback_tag.to_string()),
        zipball_url,
    })
}

fn latest_release(client: &GitHubClient) -> Result<Option<Source>, ResolveError> {
    let release = not_found_as_none(client.latest_release())?;
    Ok(release.and_then(|r| release_source(r, SourceKind::LatestRelease, LATEST)))
}

fn release_by_tag(client: &GitHubClient, version: &str) -> Result<Option<Source>, ResolveError> {
    let release = not_found_as_none(client.release_by_tag(version))?;
    Ok(release.and_then(|r| release_source(r, SourceKind::ReleaseTag, version)))
}

fn latest_tag(client: &GitHubClient) -> Result<Option<Source>, ResolveError> {
    let Some(tag) = client.tags(1)?.into_iter().next() else {
        return Ok(None);
    };

    let tag_name = tag
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "latest-tag".to_string());
    let zipball_url = tag
        .zipball_url
        .ok_or_else(|| ResolveError::MissingArchiveUrl(format!("tag `{}`", tag_name)))?;

    Ok(Some(Source {
        source_type: SourceKind::LatestTag,
        tag_name,
        zipball_url,
    }))
}

fn tag_by_name(client: &GitHubClient, version: &str) -> Result<Option<Source>, ResolveError> {
    let tags = client.tags(config::TAG_SCAN_LIMIT)?;
    let Some(tag) = tags.into_iter().find(|t| t.name.as_deref() == Some(version)) else {
        return Ok(None);
    };

    let zipball_url = tag
        .zipball_url
        .ok_or_else(|| ResolveError::MissingArchiveUrl(format!("tag `{}`", version)))?;

    Ok(Some(Source {
        source_type: SourceKind::GitTag,
        tag_name: version.to_string(),
        zipball_url,
    }))
}

fn default_branch(client: &GitHubClient) -> Result<Source, ResolveError> {
    let branch = client
        .repo_info()?
        .default_branch
        .filter(|b| !b.is_empty())
        .ok_or(ResolveError::NoDefaultBranch)?;

    Ok(Source {
        source_type: SourceKind::DefaultBranch(branch.clone()),
        zipball_url: client.upstream().branch_archive_url(&branch),
        tag_name: branch,
    })
}

//! Blocking GitHub API client
//!
//! Thin wrapper over ureq that knows the four metadata endpoints lazyfox needs
//! and how to turn HTTP failures into [`ApiError`].
//!
//! ## GitHub Authentication
//!
//! Pass a token (the CLI reads `GITHUB_TOKEN`) to raise the rate limit from
//! 60/hr to 5000/hr. The token is only sent to the API host.

use crate::config::{self, Upstream};
use crate::core::error::ApiError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Release metadata (`/releases/latest`, `/releases/tags/{tag}`)
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Release {
    pub tag_name: Option<String>,
    pub zipball_url: Option<String>,
}

/// One entry of the `/tags` listing
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub name: Option<String>,
    pub zipball_url: Option<String>,
}

/// Repository metadata (`/repos/{repo}`)
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RepoInfo {
    pub default_branch: Option<String>,
}

pub struct GitHubClient {
    api_agent: ureq::Agent,
    download_agent: ureq::Agent,
    upstream: Upstream,
    token: Option<String>,
}

/// Agent whose timeout bounds each connect and each socket read, never the
/// whole transfer.
fn agent_with_timeout(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(timeout)
        .timeout_read(timeout)
        .build()
}

impl GitHubClient {
    pub fn new(upstream: Upstream) -> Self {
        Self {
            api_agent: agent_with_timeout(config::METADATA_TIMEOUT),
            download_agent: agent_with_timeout(config::DOWNLOAD_TIMEOUT),
            upstream,
            token: None,
        }
    }

    /// Attach a bearer token to API requests. Empty strings are ignored.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Replace the per-read timeout used for archive downloads.
    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_agent = agent_with_timeout(timeout);
        self
    }

    pub fn upstream(&self) -> &Upstream {
        &self.upstream
    }

    /// GET request for an archive download.
    pub(crate) fn download_request(&self, url: &str) -> ureq::Request {
        self.request(&self.download_agent, url)
    }

    /// Create a GET request with the identifying headers and optional auth.
    fn request(&self, agent: &ureq::Agent, url: &str) -> ureq::Request {
        let mut request = agent
            .get(url)
            .set("Accept", config::ACCEPT)
            .set("User-Agent", config::USER_AGENT);

        if let Some(token) = &self.token {
            if self.is_api_url(url) {
                request = request.set("Authorization", &format!("Bearer {}", token));
            }
        }

        request
    }

    /// True when `url` is on the API host itself, not a host that merely
    /// shares its prefix.
    fn is_api_url(&self, url: &str) -> bool {
        match url.strip_prefix(self.upstream.api_base.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
            None => false,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .request(&self.api_agent, url)
            .call()
            .map_err(api_error)?;

        response
            .into_json()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub fn latest_release(&self) -> Result<Release, ApiError> {
        self.get_json(&format!("{}/releases/latest", self.upstream.api_url()))
    }

    pub fn release_by_tag(&self, tag: &str) -> Result<Release, ApiError> {
        self.get_json(&format!("{}/releases/tags/{}", self.upstream.api_url(), tag))
    }

    /// Most recent tags first, at most `per_page` of them.
    pub fn tags(&self, per_page: usize) -> Result<Vec<Tag>, ApiError> {
        self.get_json(&format!(
            "{}/tags?per_page={}",
            self.upstream.api_url(),
            per_page
        ))
    }

    pub fn repo_info(&self) -> Result<RepoInfo, ApiError> {
        self.get_json(&self.upstream.api_url())
    }
}

/// Split ureq failures into status (with body) and transport errors.
fn api_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => ApiError::Status {
            status,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(t) => ApiError::Transport(t.to_string()),
    }
}

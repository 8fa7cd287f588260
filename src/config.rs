//! Upstream coordinates and HTTP settings
//!
//! The repository is fixed at compile time. Only the base URLs can be swapped,
//! which lets tests point the client at a mock server.

use std::time::Duration;

/// Upstream repository in "owner/repo" format
pub const REPO: &str = "AmethystDev-Labs/LazyFox";

/// GitHub REST API base URL
pub const API_BASE: &str = "https://api.github.com";

/// GitHub web base URL (used for branch archive links)
pub const WEB_BASE: &str = "https://github.com";

/// Identifying client header sent with every request
pub const USER_AGENT: &str = "LazyFox-CLI";

/// Accepted content type for API calls
pub const ACCEPT: &str = "application/vnd.github+json";

/// Timeout for metadata calls (release, tag and repository lookups)
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(20);

/// Timeout for the archive download
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Page size when scanning tags for an explicit version
pub const TAG_SCAN_LIMIT: usize = 100;

/// Where the sources come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub repo: String,
    pub api_base: String,
    pub web_base: String,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            repo: REPO.to_string(),
            api_base: API_BASE.to_string(),
            web_base: WEB_BASE.to_string(),
        }
    }
}

impl Upstream {
    /// Same repository, different hosts.
    pub fn with_bases(api_base: impl Into<String>, web_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            web_base: web_base.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// `https://api.github.com/repos/owner/repo`
    pub fn api_url(&self) -> String {
        format!("{}/repos/{}", self.api_base, self.repo)
    }

    /// `https://github.com/owner/repo`
    pub fn repo_url(&self) -> String {
        format!("{}/{}", self.web_base, self.repo)
    }

    /// Archive link for the tip of a branch.
    pub fn branch_archive_url(&self, branch: &str) -> String {
        format!("{}/archive/refs/heads/{}.zip", self.repo_url(), branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_github() {
        let up = Upstream::default();
        assert_eq!(
            up.api_url(),
            "https://api.github.com/repos/AmethystDev-Labs/LazyFox"
        );
        assert_eq!(up.repo_url(), "https://github.com/AmethystDev-Labs/LazyFox");
    }

    #[test]
    fn test_branch_archive_url() {
        let up = Upstream::default();
        assert_eq!(
            up.branch_archive_url("main"),
            "https://github.com/AmethystDev-Labs/LazyFox/archive/refs/heads/main.zip"
        );
    }

    #[test]
    fn test_with_bases_strips_trailing_slash() {
        let up = Upstream::with_bases("http://127.0.0.1:9000/", "http://127.0.0.1:9000");
        assert_eq!(up.api_url(), "http://127.0.0.1:9000/repos/AmethystDev-Labs/LazyFox");
        assert_eq!(up.repo, REPO);
    }

    #[test]
    fn test_metadata_timeout_shorter_than_download() {
        assert!(METADATA_TIMEOUT < DOWNLOAD_TIMEOUT);
    }
}

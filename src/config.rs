//! Configuration for the Gitblit MCP server.
//!
//! All settings come from the environment:
//! - `GITBLIT_URL` - Base URL of the Gitblit instance (required)
//! - `GITBLIT_API_ROOT` - Base path of the Search API plugin (default: `/api/mcp-server`)
//! - `GITBLIT_REPO_CACHE_TTL` - Seconds to cache repository names (default: 300)
//!
//! Configuration is loaded once at startup and passed explicitly to the
//! components that need it; a bad `GITBLIT_URL` refuses to start the server.

use std::time::Duration;

use thiserror::Error;

/// Base path of the Search API plugin when `GITBLIT_API_ROOT` is unset.
const DEFAULT_API_ROOT: &str = "/api/mcp-server";

/// Repository-name cache TTL when `GITBLIT_REPO_CACHE_TTL` is unset.
const DEFAULT_REPO_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GITBLIT_URL environment variable is required. Set it to the base URL of your Gitblit instance.")]
    MissingUrl,

    #[error("invalid GITBLIT_URL: must be an http:// or https:// URL, got '{0}'")]
    InvalidUrl(String),

    #[error("invalid GITBLIT_REPO_CACHE_TTL: must be a number of seconds, got '{0}'")]
    InvalidCacheTtl(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    gitblit_url: String,
    api_root: String,
    repo_cache_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_parts(
            std::env::var("GITBLIT_URL").ok(),
            std::env::var("GITBLIT_API_ROOT").ok(),
            std::env::var("GITBLIT_REPO_CACHE_TTL").ok(),
        )
    }

    /// Build and validate configuration from raw setting values.
    pub fn from_parts(
        gitblit_url: Option<String>,
        api_root: Option<String>,
        repo_cache_ttl: Option<String>,
    ) -> Result<Self, ConfigError> {
        let gitblit_url = gitblit_url
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingUrl)?;

        let parsed = reqwest::Url::parse(&gitblit_url)
            .map_err(|_| ConfigError::InvalidUrl(gitblit_url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(gitblit_url));
        }

        let repo_cache_ttl = match repo_cache_ttl {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidCacheTtl(raw))?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REPO_CACHE_TTL_SECS),
        };

        Ok(Self {
            gitblit_url: gitblit_url.trim_end_matches('/').to_string(),
            api_root: api_root.unwrap_or_else(|| DEFAULT_API_ROOT.to_string()),
            repo_cache_ttl,
        })
    }

    /// Base URL for Search API plugin endpoints.
    pub fn api_base_url(&self) -> String {
        format!("{}{}", self.gitblit_url, self.api_root)
    }

    pub fn repo_cache_ttl(&self) -> Duration {
        self.repo_cache_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_gitblit_url() {
        let result = Config::from_parts(None, None, None);
        assert!(matches!(result, Err(ConfigError::MissingUrl)));

        let result = Config::from_parts(Some(String::new()), None, None);
        assert!(matches!(result, Err(ConfigError::MissingUrl)));
    }

    #[test]
    fn rejects_non_http_schemes() {
        let result = Config::from_parts(Some("ftp://gitblit.local".to_string()), None, None);
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));

        let result = Config::from_parts(Some("not a url".to_string()), None, None);
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn strips_trailing_slash_and_applies_default_root() {
        let config = Config::from_parts(Some("https://git.example.com/".to_string()), None, None)
            .expect("valid config");
        assert_eq!(config.api_base_url(), "https://git.example.com/api/mcp-server");
    }

    #[test]
    fn api_root_is_configurable() {
        let config = Config::from_parts(
            Some("http://gitblit.local:8080".to_string()),
            Some("/api/.mcp-internal".to_string()),
            None,
        )
        .expect("valid config");
        assert_eq!(
            config.api_base_url(),
            "http://gitblit.local:8080/api/.mcp-internal"
        );
    }

    #[test]
    fn cache_ttl_parses_or_defaults() {
        let config = Config::from_parts(
            Some("http://gitblit.local".to_string()),
            None,
            Some("60".to_string()),
        )
        .expect("valid config");
        assert_eq!(config.repo_cache_ttl(), Duration::from_secs(60));

        let result = Config::from_parts(
            Some("http://gitblit.local".to_string()),
            None,
            Some("soon".to_string()),
        );
        assert!(matches!(result, Err(ConfigError::InvalidCacheTtl(_))));
    }
}

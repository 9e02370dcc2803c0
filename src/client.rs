//! HTTP client for the Gitblit Search API plugin.
//!
//! The single integration point with the backend: one operation per endpoint,
//! each issuing a parameterized GET and decoding the JSON body. Every failure
//! path - non-2xx status, transport error, timeout, undecodable body - comes
//! back as a normalized [`GitblitError`]; no transport error escapes raw.
//!
//! One `reqwest::Client` is constructed at startup and reused for the whole
//! process lifetime, so sequential tool invocations share pooled connections.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::error::{normalize, GitblitError};
use crate::types::{
    CommitSearchResponse, FileSearchResponse, FindFilesResponse, ListFilesResponse,
    ListReposResponse, ReadFileResponse,
};

/// Fixed budget for every backend call; a call past this surfaces as Internal.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GitblitClient {
    base_url: String,
    client: Client,
}

fn transport_error(err: reqwest::Error) -> GitblitError {
    if err.is_timeout() {
        GitblitError::internal("Request timed out connecting to Gitblit server")
    } else if err.is_connect() {
        GitblitError::internal("Failed to connect to Gitblit server")
    } else {
        GitblitError::internal(format!("Request failed: {err}"))
    }
}

impl GitblitClient {
    /// Create a client for the given API base URL (scheme, host, and API root).
    pub fn new(base_url: impl Into<String>) -> Result<Self, GitblitError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GitblitError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GitblitError> {
        Self::new(config.api_base_url())
    }

    /// GET an endpoint and decode the expected success shape.
    ///
    /// The HTTP status alone decides success or failure: a non-2xx response is
    /// normalized from its error body, and a 2xx body that does not match the
    /// expected shape raises Internal rather than being partially interpreted.
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, GitblitError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.ok();
            return Err(normalize(status, body.as_ref()));
        }

        response.json::<T>().await.map_err(|e| {
            GitblitError::internal(format!("Invalid JSON response from server: {e}"))
        })
    }

    /// List repositories, optionally filtered by a name substring.
    pub async fn list_repos(
        &self,
        query: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<ListReposResponse, GitblitError> {
        let mut params = vec![("limit", limit.to_string()), ("offset", offset.to_string())];
        if let Some(query) = query {
            params.push(("query", query.to_string()));
        }
        self.get("/repos", &params).await
    }

    /// List files and directories at a path within a repository.
    pub async fn list_files(
        &self,
        repo: &str,
        path: &str,
        revision: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<ListFilesResponse, GitblitError> {
        let mut params = vec![
            ("repo", repo.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        if !path.is_empty() {
            params.push(("path", path.to_string()));
        }
        if let Some(revision) = revision {
            params.push(("revision", revision.to_string()));
        }
        self.get("/files", &params).await
    }

    /// Read file content, optionally restricted to a 1-based line range.
    pub async fn read_file(
        &self,
        repo: &str,
        path: &str,
        revision: Option<&str>,
        start_line: Option<u32>,
        end_line: Option<u32>,
    ) -> Result<ReadFileResponse, GitblitError> {
        let mut params = vec![("repo", repo.to_string()), ("path", path.to_string())];
        if let Some(revision) = revision {
            params.push(("revision", revision.to_string()));
        }
        if let Some(start_line) = start_line {
            params.push(("startLine", start_line.to_string()));
        }
        if let Some(end_line) = end_line {
            params.push(("endLine", end_line.to_string()));
        }
        self.get("/file", &params).await
    }

    /// Search file contents via the backend's Lucene index.
    #[allow(clippy::too_many_arguments)]
    pub async fn search_files(
        &self,
        query: &str,
        repos: Option<&[String]>,
        path_pattern: Option<&str>,
        branch: Option<&str>,
        limit: u32,
        offset: u32,
        context_lines: u32,
    ) -> Result<FileSearchResponse, GitblitError> {
        let mut params = vec![
            ("query", query.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
            ("contextLines", context_lines.to_string()),
        ];
        if let Some(repos) = repos {
            params.push(("repos", repos.join(",")));
        }
        if let Some(path_pattern) = path_pattern {
            params.push(("pathPattern", path_pattern.to_string()));
        }
        if let Some(branch) = branch {
            params.push(("branch", branch.to_string()));
        }
        self.get("/search/files", &params).await
    }

    /// Search commit history via the backend's Lucene index.
    pub async fn search_commits(
        &self,
        query: &str,
        repos: &[String],
        authors: Option<&[String]>,
        branch: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<CommitSearchResponse, GitblitError> {
        let mut params = vec![
            ("query", query.to_string()),
            ("repos", repos.join(",")),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        if let Some(authors) = authors {
            params.push(("authors", authors.join(",")));
        }
        if let Some(branch) = branch {
            params.push(("branch", branch.to_string()));
        }
        self.get("/search/commits", &params).await
    }

    /// Find files matching a glob pattern via Git tree walking.
    pub async fn find_files(
        &self,
        path_pattern: &str,
        repos: Option<&[String]>,
        revision: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<FindFilesResponse, GitblitError> {
        let mut params = vec![
            ("pathPattern", path_pattern.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        if let Some(repos) = repos {
            params.push(("repos", repos.join(",")));
        }
        if let Some(revision) = revision {
            params.push(("revision", revision.to_string()));
        }
        self.get("/find", &params).await
    }
}

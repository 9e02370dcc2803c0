//! MCP server exposing Gitblit browsing and search tools.
//!
//! Six read-only tools, each a thin handler: apply documented defaults and
//! caps, validate repository names, dispatch through the backend client, and
//! return the decoded payload. Failures always surface as protocol-level
//! errors carrying a kind code plus message - never as a success-shaped
//! payload with an error tucked inside.

mod types;

use std::sync::Arc;

pub use types::*;

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;

use crate::client::GitblitClient;
use crate::config::Config;
use crate::error::{ErrorKind, GitblitError};
use crate::glob::Pattern;
use crate::types::{
    CommitSearchResponse, FileSearchResponse, FindFilesResponse, ListFilesResponse,
    ListReposResponse, ReadFileResponse,
};
use crate::validate::{validate_repo_names, RepoCache};

const LIST_REPOS_DEFAULT_LIMIT: u32 = 50;
const LIST_REPOS_MAX_LIMIT: u32 = 100;
const LIST_FILES_DEFAULT_LIMIT: u32 = 100;
const SEARCH_DEFAULT_LIMIT: u32 = 25;
const SEARCH_MAX_LIMIT: u32 = 200;
const FIND_FILES_DEFAULT_LIMIT: u32 = 50;
const FIND_FILES_MAX_LIMIT: u32 = 200;
const DEFAULT_CONTEXT_LINES: u32 = 10;
const MAX_CONTEXT_LINES: u32 = 200;

/// Apply the documented default, then clamp into `1..=max`.
fn clamp_limit(requested: Option<u32>, default: u32, max: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, max)
}

impl From<GitblitError> for McpError {
    fn from(err: GitblitError) -> Self {
        let data = Some(serde_json::json!({ "code": err.kind.code() }));
        match err.kind {
            ErrorKind::Internal => McpError::internal_error(err.message, data),
            _ => McpError::invalid_params(err.to_string(), data),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[derive(Clone)]
pub struct GitblitMcpServer {
    client: GitblitClient,
    repo_cache: Arc<RepoCache>,
    tool_router: ToolRouter<Self>,
}

impl GitblitMcpServer {
    pub fn new(client: GitblitClient, repo_cache: Arc<RepoCache>) -> Self {
        Self {
            client,
            repo_cache,
            tool_router: Self::tool_router(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, GitblitError> {
        let client = GitblitClient::from_config(config)?;
        let repo_cache = Arc::new(RepoCache::new(config.repo_cache_ttl()));
        Ok(Self::new(client, repo_cache))
    }

    /// Reject unknown repository names before any backend dispatch.
    async fn ensure_repos_exist(&self, repos: &[String]) -> Result<(), McpError> {
        if repos.is_empty() {
            return Ok(());
        }
        let known = self.repo_cache.repo_names(&self.client).await?;
        validate_repo_names(repos, &known)?;
        Ok(())
    }

    // ============================================================
    // Tool logic - also the seam the integration tests call
    // ============================================================

    pub async fn handle_list_repos(
        &self,
        req: ListReposRequest,
    ) -> Result<ListReposResponse, McpError> {
        let limit = clamp_limit(req.limit, LIST_REPOS_DEFAULT_LIMIT, LIST_REPOS_MAX_LIMIT);
        let offset = req.offset.unwrap_or(0);
        let query = req.query.as_deref().filter(|q| !q.is_empty());

        Ok(self.client.list_repos(query, limit, offset).await?)
    }

    pub async fn handle_list_files(
        &self,
        req: ListFilesRequest,
    ) -> Result<ListFilesResponse, McpError> {
        self.ensure_repos_exist(std::slice::from_ref(&req.repo))
            .await?;

        let limit = clamp_limit(req.limit, LIST_FILES_DEFAULT_LIMIT, u32::MAX);
        let offset = req.offset.unwrap_or(0);
        let path = req.path.as_deref().unwrap_or("");

        Ok(self
            .client
            .list_files(&req.repo, path, req.revision.as_deref(), limit, offset)
            .await?)
    }

    pub async fn handle_read_file(
        &self,
        req: ReadFileRequest,
    ) -> Result<ReadFileResponse, McpError> {
        if req.start_line == Some(0) || req.end_line == Some(0) {
            return Err(GitblitError::invalid_request(
                "startLine and endLine are 1-based; 0 is not a valid line number",
            )
            .into());
        }
        if let (Some(start), Some(end)) = (req.start_line, req.end_line) {
            if end < start {
                return Err(GitblitError::invalid_request(format!(
                    "endLine ({end}) must not be before startLine ({start})"
                ))
                .into());
            }
        }

        self.ensure_repos_exist(std::slice::from_ref(&req.repo))
            .await?;

        Ok(self
            .client
            .read_file(
                &req.repo,
                &req.path,
                req.revision.as_deref(),
                req.start_line,
                req.end_line,
            )
            .await?)
    }

    pub async fn handle_file_search(
        &self,
        req: FileSearchRequest,
    ) -> Result<FileSearchResponse, McpError> {
        if let Some(ref repos) = req.repos {
            self.ensure_repos_exist(repos).await?;
        }

        let limit = clamp_limit(req.limit, SEARCH_DEFAULT_LIMIT, SEARCH_MAX_LIMIT);
        let offset = req.offset.unwrap_or(0);
        let context_lines = req
            .context_lines
            .unwrap_or(DEFAULT_CONTEXT_LINES)
            .min(MAX_CONTEXT_LINES);

        Ok(self
            .client
            .search_files(
                &req.query,
                req.repos.as_deref(),
                req.path_pattern.as_deref(),
                req.branch.as_deref(),
                limit,
                offset,
                context_lines,
            )
            .await?)
    }

    pub async fn handle_commit_search(
        &self,
        req: CommitSearchRequest,
    ) -> Result<CommitSearchResponse, McpError> {
        if req.repos.is_empty() {
            return Err(GitblitError::invalid_request(
                "repos parameter is required; specify at least one repository",
            )
            .into());
        }
        self.ensure_repos_exist(&req.repos).await?;

        let limit = clamp_limit(req.limit, SEARCH_DEFAULT_LIMIT, SEARCH_MAX_LIMIT);
        let offset = req.offset.unwrap_or(0);

        Ok(self
            .client
            .search_commits(
                &req.query,
                &req.repos,
                req.authors.as_deref(),
                req.branch.as_deref(),
                limit,
                offset,
            )
            .await?)
    }

    pub async fn handle_find_files(
        &self,
        req: FindFilesRequest,
    ) -> Result<FindFilesResponse, McpError> {
        // Compile locally first so a malformed pattern fails fast with
        // INVALID_PATTERN and no network round-trip.
        let pattern = Pattern::compile(&req.path_pattern)?;

        if let Some(ref repos) = req.repos {
            self.ensure_repos_exist(repos).await?;
        }

        let limit = clamp_limit(req.limit, FIND_FILES_DEFAULT_LIMIT, FIND_FILES_MAX_LIMIT);
        let offset = req.offset.unwrap_or(0);

        Ok(self
            .client
            .find_files(
                pattern.as_str(),
                req.repos.as_deref(),
                req.revision.as_deref(),
                limit,
                offset,
            )
            .await?)
    }
}

#[tool_router]
impl GitblitMcpServer {
    #[tool(description = "Lists repositories in the Gitblit instance. \
Query uses case-insensitive substring matching on repository names; omit it to return all accessible repositories. \
Results are sorted alphabetically and paginated via 'offset'. \
Returns 'totalCount' (total matches) and 'limitHit' (whether more results exist).")]
    async fn list_repos(
        &self,
        params: Parameters<ListReposRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.handle_list_repos(params.0).await?;
        json_result(&result)
    }

    #[tool(description = "Lists files and directories at a path within a repository. \
If path is omitted, lists the repository root; if revision is omitted, uses HEAD of the default branch. \
Directories are listed first and end with '/'. Paginated via 'offset'. \
Returns 'totalCount' (total files) and 'limitHit' (whether more results exist).")]
    async fn list_files(
        &self,
        params: Parameters<ListFilesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.handle_list_files(params.0).await?;
        json_result(&result)
    }

    #[tool(description = "Reads file content from a repository. \
Returns content with 1-indexed line numbers prefixed (e.g., \"1: line\\n2: line\"). \
If revision is omitted, reads from HEAD of the default branch; if startLine/endLine are omitted, reads the entire file. \
Maximum file size is 128KB; larger files return an error.")]
    async fn read_file(
        &self,
        params: Parameters<ReadFileRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.handle_read_file(params.0).await?;
        json_result(&result)
    }

    #[tool(description = "Searches file contents across repositories using Gitblit's Lucene index. \
Returns matching code snippets with context. \
Supports Lucene syntax: exact phrases (\"foo\"), wildcards (foo*), AND/OR operators. \
If repos is omitted, searches all accessible repositories; if branch is omitted, searches only each repository's default branch (avoids duplicate results). \
Default limit 25 (max 200), contextLines 10 (max 200). Paginated via 'offset'. \
Returns 'totalCount' and 'limitHit'.")]
    async fn file_search(
        &self,
        params: Parameters<FileSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.handle_file_search(params.0).await?;
        json_result(&result)
    }

    #[tool(description = "Searches commit history across repositories using Gitblit's Lucene index. \
Supports Lucene syntax: exact phrases (\"foo\"), wildcards (foo*), AND/OR operators. \
The repos parameter is required; at least one repository must be named. \
If authors is given, multiple authors use OR logic; if branch is omitted, searches only each repository's default branch. \
Default limit 25 (max 200). Paginated via 'offset'. Returns 'totalCount' and 'limitHit'.")]
    async fn commit_search(
        &self,
        params: Parameters<CommitSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.handle_commit_search(params.0).await?;
        json_result(&result)
    }

    #[tool(description = "Finds files matching a glob pattern across repositories using Git tree walking. \
Use this to discover files by path or name without searching file contents. \
Glob patterns: * matches any chars except /, ** matches across path segments, ? matches a single char; '**/Dockerfile' matches at the root and at any depth. \
If repos is omitted, searches all accessible repositories; if revision is omitted, uses HEAD of each repository's default branch. \
Default limit 50 (max 200). Paginated via 'offset'. Results are grouped by repository. \
Returns 'totalCount' and 'limitHit'.")]
    async fn find_files(
        &self,
        params: Parameters<FindFilesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = self.handle_find_files(params.0).await?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for GitblitMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: rmcp::model::Implementation {
                name: "gitblit-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            instructions: Some(
                r#"Read-only access to a Gitblit instance.

DISCOVERY:
- list_repos: Find repositories by name substring, or list everything
- list_files: Browse the tree of one repository at any path and revision
- find_files: Locate files by glob pattern (e.g. '**/Dockerfile') without reading contents

CONTENT:
- read_file: Read a file, optionally a 1-based line range; files over 128KB are rejected
- file_search: Lucene full-text search over file contents with surrounding context
- commit_search: Lucene search over commit history; repos is required

All list/search tools paginate with 'limit' and 'offset' and report 'totalCount' and 'limitHit'.
Repository names include the '.git' suffix (e.g. 'team/project.git'); unknown names return
suggestions for the closest matches."#
                    .into(),
            ),
            ..Default::default()
        }
    }
}

/// Serve the MCP protocol over stdio until the client disconnects.
pub async fn run_stdio_server(config: &Config) -> anyhow::Result<()> {
    use tokio::io::{stdin, stdout};

    tracing::info!("Starting Gitblit MCP server via stdio");
    tracing::info!("Backend: {}", config.api_base_url());

    let service = GitblitMcpServer::from_config(config)?;
    let server = service.serve((stdin(), stdout())).await?;

    let quit_reason = server.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", quit_reason);

    Ok(())
}

//! Request types for MCP tools.
//!
//! Optional parameters stay `Option` here; documented defaults and caps are
//! applied by the tool handlers so the wire request always carries explicit
//! values. Field names follow the backend vocabulary (camelCase).

use rmcp::schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListReposRequest {
    #[schemars(
        description = "Filter repositories by name (case-insensitive substring match). Omit to return all repositories."
    )]
    #[serde(default)]
    pub query: Option<String>,
    #[schemars(description = "Maximum repositories to return. Default: 50, max: 100.")]
    #[serde(default)]
    pub limit: Option<u32>,
    #[schemars(description = "Results to skip for pagination. Default: 0.")]
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListFilesRequest {
    #[schemars(description = "Repository name with .git suffix (e.g., 'team/project.git').")]
    pub repo: String,
    #[schemars(
        description = "Directory path relative to root, no leading slash. Omit or use empty string for root."
    )]
    #[serde(default)]
    pub path: Option<String>,
    #[schemars(description = "Branch, tag, or commit SHA. Omit to use HEAD of default branch.")]
    #[serde(default)]
    pub revision: Option<String>,
    #[schemars(description = "Maximum files to return. Default: 100.")]
    #[serde(default)]
    pub limit: Option<u32>,
    #[schemars(description = "Results to skip for pagination. Default: 0.")]
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileRequest {
    #[schemars(description = "Repository name with .git suffix (e.g., 'team/project.git').")]
    pub repo: String,
    #[schemars(
        description = "File path relative to root, no leading slash (e.g., 'src/main.py')."
    )]
    pub path: String,
    #[schemars(description = "Branch, tag, or commit SHA. Omit to use HEAD of default branch.")]
    #[serde(default)]
    pub revision: Option<String>,
    #[schemars(description = "1-based starting line. Omit to start from line 1.")]
    #[serde(default)]
    pub start_line: Option<u32>,
    #[schemars(description = "1-based ending line (inclusive). Omit to read to end of file.")]
    #[serde(default)]
    pub end_line: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchRequest {
    #[schemars(
        description = "Lucene query for file contents. Supports phrases (\"foo\"), wildcards (foo*), AND/OR."
    )]
    pub query: String,
    #[schemars(
        description = "Repository names to search. Omit to search all accessible repositories."
    )]
    #[serde(default)]
    pub repos: Option<Vec<String>>,
    #[schemars(
        description = "Glob pattern for file paths (e.g., '*.java', 'src/**/*.py'). Omit to search all files."
    )]
    #[serde(default)]
    pub path_pattern: Option<String>,
    #[schemars(
        description = "Branch to search (e.g., 'refs/heads/main'). Omit to search default branch only."
    )]
    #[serde(default)]
    pub branch: Option<String>,
    #[schemars(description = "Maximum results. Default: 25, max: 200.")]
    #[serde(default)]
    pub limit: Option<u32>,
    #[schemars(description = "Results to skip for pagination. Default: 0.")]
    #[serde(default)]
    pub offset: Option<u32>,
    #[schemars(description = "Context lines around matches. Default: 10, max: 200.")]
    #[serde(default)]
    pub context_lines: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CommitSearchRequest {
    #[schemars(
        description = "Lucene query for commit messages. Supports phrases (\"fix\"), wildcards (feat*), AND/OR."
    )]
    pub query: String,
    #[schemars(description = "Repository names to search. Required, at least one.")]
    pub repos: Vec<String>,
    #[schemars(
        description = "Filter by author names. Multiple authors use OR logic. Omit to include all authors."
    )]
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[schemars(
        description = "Branch to search (e.g., 'refs/heads/main'). Omit to search default branch only."
    )]
    #[serde(default)]
    pub branch: Option<String>,
    #[schemars(description = "Maximum results. Default: 25, max: 200.")]
    #[serde(default)]
    pub limit: Option<u32>,
    #[schemars(description = "Results to skip for pagination. Default: 0.")]
    #[serde(default)]
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindFilesRequest {
    #[schemars(
        description = "Glob pattern to match file paths (e.g., '*.java', '**/Dockerfile', 'src/**/test_*.py')."
    )]
    pub path_pattern: String,
    #[schemars(
        description = "Repository names to search. Omit to search all accessible repositories."
    )]
    #[serde(default)]
    pub repos: Option<Vec<String>>,
    #[schemars(description = "Branch, tag, or commit SHA. Omit to use HEAD of default branch.")]
    #[serde(default)]
    pub revision: Option<String>,
    #[schemars(description = "Maximum files to return. Default: 50, max: 200.")]
    #[serde(default)]
    pub limit: Option<u32>,
    #[schemars(description = "Results to skip for pagination. Default: 0.")]
    #[serde(default)]
    pub offset: Option<u32>,
}

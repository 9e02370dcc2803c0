//! Wire types for the Gitblit Search API plugin.
//!
//! These shapes are shared by the backend client (decoding responses) and the
//! MCP tools (serializing tool payloads). The backend speaks camelCase
//! (`totalCount`, `limitHit`, `startLine`); field names here must stay in
//! sync with it.

use serde::{Deserialize, Serialize};

/// True when a result page was truncated relative to the full match set.
///
/// Holds for every paginated response: `offset + returned < total_count`.
pub fn limit_hit(offset: usize, returned: usize, total_count: usize) -> bool {
    offset + returned < total_count
}

// ============================================================
// Repositories
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Full repository name (e.g., 'team/project.git').
    pub name: String,
    pub description: String,
    /// ISO 8601 timestamp of last change.
    #[serde(default)]
    pub last_change: Option<String>,
    pub has_commits: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReposResponse {
    pub repositories: Vec<Repository>,
    /// Total number of matching repositories, irrespective of limit/offset.
    pub total_count: usize,
    pub limit_hit: bool,
}

// ============================================================
// File listing
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// File or directory path; directories end with '/'.
    pub path: String,
    pub is_directory: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesResponse {
    pub files: Vec<FileInfo>,
    pub total_count: usize,
    pub limit_hit: bool,
}

// ============================================================
// File content
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadFileResponse {
    /// File content with line numbers prefixed (e.g., "1: line one\n2: line two").
    pub content: String,
}

// ============================================================
// File content search
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchChunk {
    /// 1-based starting line number.
    pub start_line: u32,
    /// 1-based ending line number, inclusive.
    pub end_line: u32,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchResult {
    pub repository: String,
    pub path: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub commit_id: Option<String>,
    pub chunks: Vec<SearchChunk>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchResponse {
    /// Echo of the executed query; not repeated in tool payloads.
    #[serde(default, skip_serializing)]
    pub query: String,
    pub total_count: usize,
    pub limit_hit: bool,
    pub results: Vec<FileSearchResult>,
}

// ============================================================
// Commit search
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSearchResult {
    pub repository: String,
    /// Commit SHA.
    pub commit: String,
    pub author: String,
    #[serde(default)]
    pub committer: Option<String>,
    /// ISO 8601 timestamp.
    pub date: String,
    /// First line of the commit message.
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSearchResponse {
    #[serde(default, skip_serializing)]
    pub query: String,
    pub total_count: usize,
    pub limit_hit: bool,
    pub commits: Vec<CommitSearchResult>,
}

// ============================================================
// Find files
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindFilesResult {
    pub repository: String,
    /// Resolved revision reference.
    #[serde(default)]
    pub revision: Option<String>,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindFilesResponse {
    pub pattern: String,
    pub total_count: usize,
    pub limit_hit: bool,
    pub results: Vec<FindFilesResult>,
}

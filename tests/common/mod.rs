//! In-process fake Gitblit Search API backend for integration tests.
//!
//! Serves the six plugin endpoints over a real TCP socket with fixture data
//! and records every request (path + query parameters) so tests can assert
//! on the exact wire vocabulary the client sends.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use gitblit_mcp::glob::Pattern;
use gitblit_mcp::types::limit_hit;

/// (path, query parameters) for every request the backend received, in order.
pub type RequestLog = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

#[derive(Clone)]
struct Backend {
    log: RequestLog,
}

impl Backend {
    fn record(&self, path: &str, params: &HashMap<String, String>) {
        self.log
            .lock()
            .unwrap()
            .push((path.to_string(), params.clone()));
    }
}

pub struct FakeBackend {
    pub base_url: String,
    pub log: RequestLog,
}

impl FakeBackend {
    /// Query parameters of every request made to `path`, in order.
    pub fn requests_to(&self, path: &str) -> Vec<HashMap<String, String>> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, params)| params.clone())
            .collect()
    }
}

/// Repository fixtures: (name, description).
const REPOS: &[(&str, &str)] = &[
    ("api-a.git", "First API"),
    ("api-b.git", "Second API"),
    ("other.git", "Unrelated project"),
    ("x.git", "Test repository"),
];

/// Tree fixture for `x.git`; other repositories are empty.
const X_GIT_TREE: &[&str] = &["Dockerfile", "infra/Dockerfile", "src/app.py", "src/main.rs"];

const MAX_FILE_BYTES: usize = 128 * 1024;

fn error_body(status: StatusCode, message: &str) -> Response {
    let body = json!({ "error": message, "status": status.as_u16() });
    (status, Json(body)).into_response()
}

fn usize_param(params: &HashMap<String, String>, key: &str, default: usize) -> usize {
    params
        .get(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

async fn repos(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    backend.record("/repos", &params);

    let query = params.get("query").map(|q| q.to_lowercase());
    let mut matches: Vec<&(&str, &str)> = REPOS
        .iter()
        .filter(|(name, _)| match &query {
            Some(q) => name.to_lowercase().contains(q),
            None => true,
        })
        .collect();
    matches.sort_by_key(|(name, _)| *name);

    let total = matches.len();
    let offset = usize_param(&params, "offset", 0);
    let limit = usize_param(&params, "limit", 50);
    let page: Vec<Value> = matches
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|(name, description)| {
            json!({
                "name": name,
                "description": description,
                "lastChange": "2024-01-01T00:00:00Z",
                "hasCommits": true,
            })
        })
        .collect();

    let body = json!({
        "repositories": page,
        "totalCount": total,
        "limitHit": limit_hit(offset, page.len(), total),
    });
    Json(body).into_response()
}

async fn files(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    backend.record("/files", &params);

    match params.get("repo").map(String::as_str) {
        Some("secret.git") => return error_body(StatusCode::FORBIDDEN, "Access denied"),
        Some("broken.git") => {
            return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Tree walk failed")
        }
        Some("x.git") => {}
        _ => return error_body(StatusCode::NOT_FOUND, "Repository not found"),
    }

    let entries = [("src/", true), ("Cargo.toml", false), ("README.md", false)];
    let total = entries.len();
    let offset = usize_param(&params, "offset", 0);
    let limit = usize_param(&params, "limit", 100);
    let page: Vec<Value> = entries
        .iter()
        .skip(offset)
        .take(limit)
        .map(|(path, is_dir)| json!({ "path": path, "isDirectory": is_dir }))
        .collect();

    let body = json!({
        "files": page,
        "totalCount": total,
        "limitHit": limit_hit(offset, page.len(), total),
    });
    Json(body).into_response()
}

async fn file(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    backend.record("/file", &params);

    match params.get("path").map(String::as_str) {
        Some("README.md") => {
            Json(json!({ "content": "1: # Readme\n2: hello" })).into_response()
        }
        // Exactly at the 128KB cap: still served
        Some("exact.bin") => {
            Json(json!({ "content": "x".repeat(MAX_FILE_BYTES) })).into_response()
        }
        // One byte over the cap
        Some("huge.bin") => error_body(
            StatusCode::PAYLOAD_TOO_LARGE,
            "File exceeds maximum size of 128KB",
        ),
        // A 200 whose body is not the expected shape
        Some("garbage") => (StatusCode::OK, "this is not json").into_response(),
        Some(path) => error_body(StatusCode::NOT_FOUND, &format!("File not found: {path}")),
        None => error_body(StatusCode::BAD_REQUEST, "path parameter is required"),
    }
}

async fn search_files(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    backend.record("/search/files", &params);

    let query = params.get("query").cloned().unwrap_or_default();
    if query.is_empty() {
        return error_body(StatusCode::BAD_REQUEST, "query parameter is required");
    }

    let body = json!({
        "query": query,
        "totalCount": 1,
        "limitHit": false,
        "results": [{
            "repository": "x.git",
            "path": "src/lib.rs",
            "branch": "refs/heads/main",
            "commitId": "abc123",
            "chunks": [{
                "startLine": 1,
                "endLine": 2,
                "content": "1: pub fn run() {}\n2: ",
            }],
        }],
    });
    Json(body).into_response()
}

async fn search_commits(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    backend.record("/search/commits", &params);

    let query = params.get("query").cloned().unwrap_or_default();
    let repos: Vec<&str> = params
        .get("repos")
        .map(|r| r.split(',').filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    if repos.is_empty() {
        return error_body(StatusCode::BAD_REQUEST, "repos parameter is required");
    }

    // Only default-branch commits exist in the fixture; a 'fix' commit
    // reachable from other branches deliberately does not appear.
    let commits: Vec<Value> = if query.contains("fix") && repos.contains(&"x.git") {
        vec![json!({
            "repository": "x.git",
            "commit": "deadbeef",
            "author": "Dev One",
            "committer": "Dev One",
            "date": "2024-02-01T12:00:00Z",
            "title": "fix: handle empty tree",
            "message": "fix: handle empty tree\n\nDetails.",
            "branch": "refs/heads/main",
        })]
    } else {
        vec![]
    };

    let body = json!({
        "query": query,
        "totalCount": commits.len(),
        "limitHit": false,
        "commits": commits,
    });
    Json(body).into_response()
}

async fn find(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    backend.record("/find", &params);

    let raw_pattern = params.get("pathPattern").cloned().unwrap_or_default();
    let pattern = match Pattern::compile(&raw_pattern) {
        Ok(pattern) => pattern,
        Err(_) => return error_body(StatusCode::BAD_REQUEST, "invalid pathPattern"),
    };

    let searched: Vec<&str> = params
        .get("repos")
        .map(|r| r.split(',').filter(|s| !s.is_empty()).collect())
        .unwrap_or_else(|| REPOS.iter().map(|(name, _)| *name).collect());

    let mut matches: Vec<(&str, &str)> = Vec::new();
    for repo in searched {
        if repo == "x.git" {
            for path in X_GIT_TREE {
                if pattern.matches(path) {
                    matches.push((repo, path));
                }
            }
        }
    }

    let total = matches.len();
    let offset = usize_param(&params, "offset", 0);
    let limit = usize_param(&params, "limit", 50);
    let page: Vec<(&str, &str)> = matches.into_iter().skip(offset).take(limit).collect();
    let returned = page.len();

    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (repo, path) in page {
        match grouped.last_mut() {
            Some((last, files)) if last == repo => files.push(path.to_string()),
            _ => grouped.push((repo.to_string(), vec![path.to_string()])),
        }
    }
    let results: Vec<Value> = grouped
        .into_iter()
        .map(|(repository, files)| {
            json!({ "repository": repository, "revision": "refs/heads/main", "files": files })
        })
        .collect();

    let body = json!({
        "pattern": raw_pattern,
        "totalCount": total,
        "limitHit": limit_hit(offset, returned, total),
        "results": results,
    });
    Json(body).into_response()
}

/// Bind an ephemeral port and serve the fake backend until the test exits.
pub async fn spawn_backend() -> FakeBackend {
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let backend = Backend { log: log.clone() };

    let app = Router::new()
        .route("/repos", get(repos))
        .route("/files", get(files))
        .route("/file", get(file))
        .route("/search/files", get(search_files))
        .route("/search/commits", get(search_commits))
        .route("/find", get(find))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake backend");
    });

    FakeBackend {
        base_url: format!("http://{addr}"),
        log,
    }
}

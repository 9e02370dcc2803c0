//! Repository-name validation with "did you mean" suggestions.
//!
//! Tool calls naming repositories are checked against the live repository set
//! before any backend dispatch, so a typo answers with a `NotFound` error and
//! the closest matching names instead of an opaque backend failure.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::client::GitblitClient;
use crate::error::GitblitError;

const MAX_SUGGESTIONS: usize = 3;

/// Relative edit distance above which a candidate is considered unrelated.
const MAX_RELATIVE_DISTANCE: f64 = 0.6;

/// Page size used when enumerating all repositories.
const REFRESH_PAGE_LIMIT: u32 = 100;

#[derive(Default)]
struct CacheState {
    names: Vec<String>,
    refreshed_at: Option<Instant>,
}

/// TTL cache of all repository names.
///
/// The mutex guards both reads and the refresh, so concurrent first uses
/// perform a single enumeration rather than racing duplicate fetches.
pub struct RepoCache {
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl RepoCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// All repository names, refreshed through the client when stale.
    pub async fn repo_names(&self, client: &GitblitClient) -> Result<Vec<String>, GitblitError> {
        let mut state = self.state.lock().await;
        let fresh = state
            .refreshed_at
            .is_some_and(|at| at.elapsed() <= self.ttl);
        if !fresh {
            let mut names = Vec::new();
            let mut offset = 0u32;
            loop {
                let page = client.list_repos(None, REFRESH_PAGE_LIMIT, offset).await?;
                let returned = page.repositories.len() as u32;
                names.extend(page.repositories.into_iter().map(|r| r.name));
                if !page.limit_hit || returned == 0 {
                    break;
                }
                offset += returned;
            }
            state.names = names;
            state.refreshed_at = Some(Instant::now());
        }
        Ok(state.names.clone())
    }
}

/// Levenshtein distance via two-row dynamic programming.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let (short, long): (Vec<char>, Vec<char>) = if a.chars().count() <= b.chars().count() {
        (a.chars().collect(), b.chars().collect())
    } else {
        (b.chars().collect(), a.chars().collect())
    };

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0usize; short.len() + 1];

    for (j, &lc) in long.iter().enumerate() {
        curr[0] = j + 1;
        for (i, &sc) in short.iter().enumerate() {
            curr[i + 1] = if sc == lc {
                prev[i]
            } else {
                1 + prev[i].min(prev[i + 1]).min(curr[i])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Bare repository name: namespace and `.git` suffix stripped, lowercased.
///
/// 'team/ZigbeeControl.git' compares as 'zigbeecontrol', which matches typos
/// like 'zigbee.git' far better than comparing full paths.
fn bare_repo_name(full: &str) -> String {
    let name = full.rsplit('/').next().unwrap_or(full);
    let name = name.strip_suffix(".git").unwrap_or(name);
    name.to_lowercase()
}

/// The closest repository names to an unknown one, best first.
pub fn find_similar_repos(unknown: &str, all_repos: &[String]) -> Vec<String> {
    let unknown_name = bare_repo_name(unknown);

    let mut candidates: Vec<(f64, &String)> = all_repos
        .iter()
        .filter_map(|repo| {
            let repo_name = bare_repo_name(repo);
            let dist = levenshtein(&unknown_name, &repo_name);
            let max_len = unknown_name.chars().count().max(repo_name.chars().count());
            let rel_dist = if max_len > 0 {
                dist as f64 / max_len as f64
            } else {
                0.0
            };
            (rel_dist <= MAX_RELATIVE_DISTANCE).then_some((rel_dist, repo))
        })
        .collect();

    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
    candidates
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, repo)| repo.clone())
        .collect()
}

/// Check every requested repository against the known set.
///
/// Fails with a single `NotFound` covering all unknown names, each with its
/// suggestions when any are close enough.
pub fn validate_repo_names(repos: &[String], known: &[String]) -> Result<(), GitblitError> {
    let unknown: Vec<&String> = repos.iter().filter(|r| !known.contains(r)).collect();
    if unknown.is_empty() {
        return Ok(());
    }

    let mut parts = Vec::with_capacity(unknown.len());
    for repo in unknown {
        let suggestions = find_similar_repos(repo, known);
        if suggestions.is_empty() {
            parts.push(format!("Repository '{repo}' not found."));
        } else {
            let quoted: Vec<String> = suggestions.iter().map(|s| format!("'{s}'")).collect();
            let listed = match quoted.split_last() {
                Some((last, rest)) if !rest.is_empty() => {
                    format!("{} or {last}", rest.join(", "))
                }
                _ => quoted.join(", "),
            };
            parts.push(format!(
                "Repository '{repo}' not found. Did you mean: {listed}?"
            ));
        }
    }

    Err(GitblitError::not_found(parts.join(" ")))
}

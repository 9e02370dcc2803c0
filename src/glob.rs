//! Glob pattern compilation for repository path matching.
//!
//! Patterns match slash-delimited relative paths, case-sensitively, with `/`
//! as the separator regardless of host OS:
//!
//! - `*` matches zero or more characters within one path segment
//! - `**` matches zero or more characters across segments
//! - `?` matches exactly one character, never `/`
//! - everything else, including `.`, matches itself literally
//!
//! A compiled pattern is anchored to the whole path, so `*.java` matches only
//! root-level files; prefix the pattern with `**/` to match at any depth.
//! `**/Dockerfile` matches both `Dockerfile` and `infra/Dockerfile` because
//! the leading `**/` stands for zero or more whole segments.

use regex::Regex;

use crate::error::{ErrorKind, GitblitError};

/// One pattern token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// A literal character, matched exactly.
    Literal(char),
    /// `?` - one character within a segment.
    AnyChar,
    /// `*` - zero or more characters within a segment.
    AnyWithinSegment,
    /// `**/` - zero or more whole segments, including none.
    AnySegments,
    /// `**` not followed by `/` - crosses directory boundaries.
    CrossDirectory,
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    tokens.push(Token::AnySegments);
                } else {
                    tokens.push(Token::CrossDirectory);
                }
            }
            '*' => tokens.push(Token::AnyWithinSegment),
            '?' => tokens.push(Token::AnyChar),
            c => tokens.push(Token::Literal(c)),
        }
    }
    tokens
}

/// A compiled, reusable path matcher. Holds no mutable state.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a glob pattern into an anchored full-path matcher.
    ///
    /// Fails with `InvalidPattern` if the pattern is empty.
    pub fn compile(pattern: &str) -> Result<Self, GitblitError> {
        if pattern.is_empty() {
            return Err(GitblitError::new(
                ErrorKind::InvalidPattern,
                "pathPattern must not be empty",
            ));
        }

        let mut source = String::with_capacity(pattern.len() + 16);
        source.push('^');
        for token in tokenize(pattern) {
            match token {
                Token::Literal(c) => {
                    let mut buf = [0u8; 4];
                    source.push_str(&regex::escape(c.encode_utf8(&mut buf)));
                }
                Token::AnyChar => source.push_str("[^/]"),
                Token::AnyWithinSegment => source.push_str("[^/]*"),
                Token::AnySegments => source.push_str("(?:.*/)?"),
                Token::CrossDirectory => source.push_str(".*"),
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| {
            GitblitError::new(
                ErrorKind::InvalidPattern,
                format!("unsupported pathPattern '{pattern}': {e}"),
            )
        })?;

        Ok(Self {
            raw: pattern.to_string(),
            regex,
        })
    }

    /// The pattern text this matcher was compiled from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Test whether a slash-delimited relative path matches the entire pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

//! MCP server bridging AI assistants to a Gitblit instance.
//!
//! Every tool forwards validated parameters as an HTTP GET to the Gitblit
//! Search API plugin and maps the JSON response, or error, back into the
//! MCP tool-call contract. Nothing is persisted; all operations are reads.

pub mod client;
pub mod config;
pub mod error;
pub mod glob;
pub mod mcp;
pub mod types;
pub mod validate;

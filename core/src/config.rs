//! Client configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "api.twitter.com";
pub const DEFAULT_API_VERSION: &str = "1";
pub const SEARCH_HOST: &str = "search.twitter.com";

/// Where requests go and how responses are returned.
///
/// Missing fields fall back to the `Default` values when deserialized, so a
/// config file only needs to name what differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    /// Version path segment; `None` drops the segment from the URL.
    pub api_version: Option<String>,
    /// Use `https` instead of `http`.
    pub secure: bool,
    /// Return newline-delimited JSON as a lazy stream.
    pub stream: bool,
    /// Return the transport response untouched. Wins over `stream`.
    pub raw_response: bool,
}

impl ClientConfig {
    /// The search endpoint: its own host and no version segment.
    pub fn search() -> Self {
        Self {
            host: SEARCH_HOST.to_string(),
            api_version: None,
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_version: Some(DEFAULT_API_VERSION.to_string()),
            secure: true,
            stream: false,
            raw_response: false,
        }
    }
}

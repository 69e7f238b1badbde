//! Synchronous client for the Twitter REST API.
//!
//! # Overview
//! Resolves `:name` placeholders in a path template, lets a pluggable `Auth`
//! strategy encode the remaining parameters and produce headers, sends the
//! request over a blocking `Transport`, and returns the body as JSON, as a
//! lazy stream of newline-delimited JSON documents, or untouched.
//!
//! # Design
//! - `TwitterClient` is immutable once built; clones share auth and transport.
//! - `build_get` / `build_post` and `TwitterClient::parse` expose the I/O
//!   boundary, so the round-trip can also be executed by the caller.
//! - No process-wide clients exist. `get` and `search` below construct a
//!   fresh default client on each call.
//!
//! ```no_run
//! use twitter_core::{Params, TwitterClient};
//!
//! let client = TwitterClient::default();
//! let status = client
//!     .get("statuses/show/:id", &Params::new().with("id", 20))?
//!     .into_json();
//! # Ok::<(), twitter_core::ApiError>(())
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod path;
pub mod response;
pub mod transport;

pub use auth::{Auth, BasicAuth, BearerAuth, NoAuth};
pub use client::{ClientBuilder, TwitterClient};
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::Params;
pub use path::make_url;
pub use response::{handle_response, JsonStream, Response};
pub use transport::{Transport, UreqTransport};

/// GET `path` from `api.twitter.com/1` without authentication.
pub fn get(path: &str, params: &Params) -> Result<Response, ApiError> {
    TwitterClient::default().get(path, params)
}

/// Search `search.twitter.com` for `query`.
pub fn search(query: &str, params: &Params) -> Result<Response, ApiError> {
    TwitterClient::search_api().search(query, params)
}

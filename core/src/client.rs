//! Request dispatch for the Twitter REST API.
//!
//! # Design
//! `TwitterClient` holds an immutable `ClientConfig` plus shared handles to an
//! `Auth` strategy and a `Transport`, so cloning it is cheap and clones can be
//! used from several threads. Every call is split the same way: `build_*`
//! resolves the path template and lets the auth strategy encode parameters
//! and produce headers, the transport executes the request, and
//! `handle_response` interprets the result. `build_*` and `parse` are public
//! so a caller can run the HTTP round-trip with its own stack.

use std::sync::Arc;

use tracing::{debug, field::Empty, instrument, Span};

use crate::auth::{Auth, NoAuth};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::Params;
use crate::path::make_url;
use crate::response::{handle_response, Response};
use crate::transport::{Transport, UreqTransport};

/// Synchronous client for a Twitter-style REST API.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    config: ClientConfig,
    auth: Arc<dyn Auth>,
    transport: Arc<dyn Transport>,
}

impl TwitterClient {
    /// Client for `config` with no authentication over `UreqTransport`.
    pub fn new(config: ClientConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Unauthenticated client for the search host.
    pub fn search_api() -> Self {
        Self::new(ClientConfig::search())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_get(&self, path: &str, params: &Params) -> Result<HttpRequest, ApiError> {
        let (url, remaining) = self.resolve(path, params)?;
        let query = self.auth.encode_params(&url, HttpMethod::Get, &remaining);
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{url}?{query}"),
            headers: self.auth.generate_headers(),
            body: None,
        })
    }

    pub fn build_post(&self, path: &str, params: &Params) -> Result<HttpRequest, ApiError> {
        let (url, remaining) = self.resolve(path, params)?;
        let body = self.auth.encode_params(&url, HttpMethod::Post, &remaining);
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url,
            headers: self.auth.generate_headers(),
            body: Some(body),
        })
    }

    /// Interpret a response according to this client's `raw_response` and
    /// `stream` flags.
    pub fn parse(&self, response: HttpResponse) -> Result<Response, ApiError> {
        handle_response(response, self.config.raw_response, self.config.stream)
    }

    /// GET the resource named by the `path` template.
    #[instrument(
        name = "api_request",
        skip(self, params),
        fields(http.method = "GET", http.url = Empty, http.status_code = Empty)
    )]
    pub fn get(&self, path: &str, params: &Params) -> Result<Response, ApiError> {
        let request = self.build_get(path, params)?;
        self.dispatch(request)
    }

    /// POST to the resource named by the `path` template, parameters as a
    /// form body.
    #[instrument(
        name = "api_request",
        skip(self, params),
        fields(http.method = "POST", http.url = Empty, http.status_code = Empty)
    )]
    pub fn post(&self, path: &str, params: &Params) -> Result<Response, ApiError> {
        let request = self.build_post(path, params)?;
        self.dispatch(request)
    }

    /// Run a search for `query`; `params` adds extra filters such as `rpp`
    /// or `lang`. `query` replaces any `q` already present in `params`.
    pub fn search(&self, query: &str, params: &Params) -> Result<Response, ApiError> {
        let mut params = params.clone();
        params.insert("q", query);
        self.get("search", &params)
    }

    fn resolve(&self, path: &str, params: &Params) -> Result<(String, Params), ApiError> {
        make_url(
            self.config.secure,
            &self.config.host,
            self.config.api_version.as_deref(),
            path,
            params,
        )
    }

    fn dispatch(&self, request: HttpRequest) -> Result<Response, ApiError> {
        let span = Span::current();
        let resource = request.url.split('?').next().unwrap_or_default();
        span.record("http.url", resource);
        debug!(url = resource, "dispatching request");

        let response = self.transport.send(request)?;
        span.record("http.status_code", response.status);
        self.parse(response)
    }
}

impl Default for TwitterClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

/// Builder for a `TwitterClient` with a non-default auth or transport.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    auth: Option<Arc<dyn Auth>>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn api_version(mut self, api_version: Option<&str>) -> Self {
        self.config.api_version = api_version.map(str::to_string);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.config.secure = secure;
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.config.stream = stream;
        self
    }

    pub fn raw_response(mut self, raw_response: bool) -> Self {
        self.config.raw_response = raw_response;
        self
    }

    pub fn auth(mut self, auth: impl Auth + 'static) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> TwitterClient {
        TwitterClient {
            config: self.config,
            auth: self.auth.unwrap_or_else(|| Arc::new(NoAuth)),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(UreqTransport::new())),
        }
    }
}

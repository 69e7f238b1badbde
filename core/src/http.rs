//! HTTP request and response types exchanged with the transport.
//!
//! # Design
//! `HttpRequest` is plain data: the client builds it, a `Transport` (or the
//! caller, for host-executed requests) sends it. `HttpResponse` keeps status
//! and headers as plain data but owns its body as a reader, so a streaming
//! body is pulled lazily and the underlying connection is released exactly
//! when the response, or whatever consumed its body, is dropped.

use std::fmt;
use std::io::{BufRead, Cursor, Read};

use serde_json::Value;

use crate::error::ApiError;
use crate::response::JsonStream;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `TwitterClient::build_get` / `build_post`. `url` is absolute and,
/// for GET, already carries the encoded query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response whose body has not been consumed yet.
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    body: Box<dyn BufRead + Send + Sync>,
}

impl HttpResponse {
    /// Wrap a body reader. Transports hand over the live connection here.
    pub fn new(
        status: u16,
        headers: Vec<(String, String)>,
        body: impl BufRead + Send + Sync + 'static,
    ) -> Self {
        Self {
            status,
            headers,
            body: Box::new(body),
        }
    }

    /// Build a response from an already-buffered body.
    ///
    /// Used when the caller executed the request itself, and in tests.
    pub fn from_body(status: u16, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
        Self::new(status, headers, Cursor::new(body.into()))
    }

    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Read the whole body as UTF-8 text.
    pub fn text(mut self) -> Result<String, ApiError> {
        let mut buf = String::new();
        self.body.read_to_string(&mut buf)?;
        Ok(buf)
    }

    /// Parse the whole body as one JSON document.
    pub fn json(self) -> Result<Value, ApiError> {
        Ok(serde_json::from_reader(self.body)?)
    }

    /// Turn the body into a lazy sequence of newline-delimited JSON documents.
    pub fn into_json_stream(self) -> JsonStream {
        JsonStream::new(self.body)
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

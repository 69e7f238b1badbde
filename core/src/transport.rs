//! Blocking HTTP transport.
//!
//! `Transport` is the seam between request building and the network. The
//! default `UreqTransport` disables ureq's status-as-error behavior so that
//! 4xx/5xx responses come back as data and the response interpreter decides
//! what they mean.

use std::fmt;
use std::io::BufReader;

use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub trait Transport: fmt::Debug + Send + Sync {
    /// Execute `request` and hand back the response with its body unread.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a preconfigured agent, e.g. one with proxy or timeout settings.
    ///
    /// Leave `http_status_as_error` off to keep error bodies; with it on, a
    /// bad status still surfaces as `ApiError::UnexpectedStatus`, with an
    /// empty body.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let sent = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match request.body {
                    Some(body) => builder
                        .content_type(FORM_CONTENT_TYPE)
                        .send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let response = match sent {
            Ok(response) => response,
            // An agent with status-as-error left on drops the body; keep the
            // status so the interpreter still reports it as a bad status.
            Err(ureq::Error::StatusCode(status)) => {
                return Ok(HttpResponse::from_body(status, Vec::new(), String::new()))
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = BufReader::new(response.into_body().into_reader());
        Ok(HttpResponse::new(status, headers, body))
    }
}

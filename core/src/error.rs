//! Error types for the Twitter API client.
//!
//! # Design
//! Two failures originate in this crate: a path placeholder with no value
//! (`MissingParameter`) and a non-200 response (`UnexpectedStatus`). The
//! latter keeps the whole `HttpResponse`, body unread, so callers can inspect
//! the status, headers and error payload themselves. Everything else is a
//! collaborator's error passed through untouched.

use std::string::FromUtf8Error;

use thiserror::Error;

use crate::http::HttpResponse;

/// Errors returned by `TwitterClient` and the response interpreter.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A `:name` segment in the path template had no matching parameter.
    #[error("missing parameter for '{placeholder}'")]
    MissingParameter { placeholder: String },

    /// The server answered with something other than 200.
    #[error("{message}")]
    UnexpectedStatus {
        message: String,
        response: Box<HttpResponse>,
    },

    /// The HTTP transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    /// The response body (or one streamed line) is not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// A streamed line is not valid UTF-8.
    #[error("streamed line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

impl ApiError {
    pub(crate) fn unexpected_status(response: HttpResponse) -> Self {
        ApiError::UnexpectedStatus {
            message: format!(
                "Twitter responded with invalid status code: {}",
                response.status
            ),
            response: Box::new(response),
        }
    }

    /// The offending response, if this is an `UnexpectedStatus` error.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::UnexpectedStatus { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Take ownership of the offending response, e.g. to read its body.
    pub fn into_response(self) -> Option<HttpResponse> {
        match self {
            ApiError::UnexpectedStatus { response, .. } => Some(*response),
            _ => None,
        }
    }

    /// HTTP status code carried by an `UnexpectedStatus` error.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }
}

//! Pluggable request authentication.
//!
//! An `Auth` strategy owns two decisions: how the remaining call parameters
//! are encoded (query string for GET, form body for POST) and which headers
//! accompany the request. Signing schemes such as OAuth 1.0a need the final
//! URL and method to compute a signature, which is why both are passed to
//! `encode_params`.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::http::HttpMethod;
use crate::params::Params;

pub trait Auth: fmt::Debug + Send + Sync {
    /// Encode `params` into a transport-ready query string or form body.
    fn encode_params(&self, url: &str, method: HttpMethod, params: &Params) -> String;

    /// Headers to send with every request.
    fn generate_headers(&self) -> Vec<(String, String)>;
}

/// No authentication: parameters are encoded as-is and no headers are added.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Auth for NoAuth {
    fn encode_params(&self, _url: &str, _method: HttpMethod, params: &Params) -> String {
        params.to_query_string()
    }

    fn generate_headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// HTTP basic authentication with a username and password.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Auth for BasicAuth {
    fn encode_params(&self, _url: &str, _method: HttpMethod, params: &Params) -> String {
        params.to_query_string()
    }

    fn generate_headers(&self) -> Vec<(String, String)> {
        let credentials = STANDARD.encode(format!("{}:{}", self.username, self.password));
        vec![("Authorization".to_string(), format!("Basic {credentials}"))]
    }
}

/// Application-only bearer token.
#[derive(Clone)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth").field("token", &"***").finish()
    }
}

impl Auth for BearerAuth {
    fn encode_params(&self, _url: &str, _method: HttpMethod, params: &Params) -> String {
        params.to_query_string()
    }

    fn generate_headers(&self) -> Vec<(String, String)> {
        vec![("Authorization".to_string(), format!("Bearer {}", self.token))]
    }
}

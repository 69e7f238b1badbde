//! Path template resolution.
//!
//! Templates are slash-delimited; a segment of the form `:name` is replaced
//! by the parameter `name`, percent-encoded as a single segment, which is then
//! no longer sent as a query or body parameter.

use tracing::trace;

use crate::error::ApiError;
use crate::params::{percent_encode, Params};

/// Resolve `path` against `params` and build the absolute resource URL.
///
/// Returns the URL (`http[s]://host/[api_version/]path.json`) together with
/// the parameters that were not consumed by a placeholder.
pub fn make_url(
    secure: bool,
    host: &str,
    api_version: Option<&str>,
    path: &str,
    params: &Params,
) -> Result<(String, Params), ApiError> {
    let mut remaining = params.clone();
    let segments = path
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(key) => remaining
                .remove(key)
                .map(|value| percent_encode(&value))
                .ok_or_else(|| ApiError::MissingParameter {
                    placeholder: segment.to_string(),
                }),
            None => Ok(segment.to_string()),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let real_path = segments.join("/");

    let scheme = if secure { "https" } else { "http" };
    let version = api_version.map(|v| format!("{v}/")).unwrap_or_default();
    let url = format!("{scheme}://{host}/{version}{real_path}.json");
    trace!(%url, remaining = remaining.len(), "resolved path template");
    Ok((url, remaining))
}

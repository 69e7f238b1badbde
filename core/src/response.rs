//! Response interpretation: raw passthrough, one JSON document, or a stream.

use std::io::BufRead;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{trace, warn};

use crate::error::ApiError;
use crate::http::HttpResponse;

/// What a successful call produced, as selected by the client's flags.
#[derive(Debug)]
pub enum Response {
    /// The untouched transport response (`raw_response` flag).
    Raw(HttpResponse),
    /// The body parsed as a single JSON document.
    Json(Value),
    /// Newline-delimited JSON documents, read on demand (`stream` flag).
    Stream(JsonStream),
}

impl Response {
    pub fn into_json(self) -> Option<Value> {
        match self {
            Response::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_stream(self) -> Option<JsonStream> {
        match self {
            Response::Stream(stream) => Some(stream),
            _ => None,
        }
    }

    pub fn into_raw(self) -> Option<HttpResponse> {
        match self {
            Response::Raw(response) => Some(response),
            _ => None,
        }
    }

    /// Deserialize a `Json` response, or the body of a `Raw` one, into `T`.
    ///
    /// A `Stream` is not a single document and yields `None`.
    pub fn deserialize<T: DeserializeOwned>(self) -> Option<Result<T, ApiError>> {
        match self {
            Response::Json(value) => Some(serde_json::from_value(value).map_err(ApiError::from)),
            Response::Raw(response) => Some(
                response
                    .json()
                    .and_then(|value| serde_json::from_value(value).map_err(ApiError::from)),
            ),
            Response::Stream(_) => None,
        }
    }
}

/// Check the status, then shape the response according to the flags.
///
/// Order is fixed: a non-200 status always fails, `raw_response` wins over
/// `stream`, and only then is the body parsed.
pub fn handle_response(
    response: HttpResponse,
    raw_response: bool,
    stream: bool,
) -> Result<Response, ApiError> {
    if response.status != 200 {
        warn!(status = response.status, "request failed");
        return Err(ApiError::unexpected_status(response));
    }
    if raw_response {
        Ok(Response::Raw(response))
    } else if stream {
        Ok(Response::Stream(response.into_json_stream()))
    } else {
        Ok(Response::Json(response.json()?))
    }
}

/// Lazy iterator over newline-delimited JSON documents.
///
/// Owns the response body; dropping the stream releases the connection.
/// Blank keep-alive lines are skipped. A line that fails to decode yields an
/// error and iteration moves on to the next line; a read error ends the
/// stream.
pub struct JsonStream {
    body: Option<Box<dyn BufRead + Send + Sync>>,
}

impl JsonStream {
    pub(crate) fn new(body: Box<dyn BufRead + Send + Sync>) -> Self {
        Self { body: Some(body) }
    }

    fn finish(&mut self) {
        self.body = None;
    }
}

impl Iterator for JsonStream {
    type Item = Result<Value, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let body = self.body.as_mut()?;
            let mut line = Vec::new();
            match body.read_until(b'\n', &mut line) {
                Ok(0) => {
                    self.finish();
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.finish();
                    return Some(Err(e.into()));
                }
            }

            let text = match String::from_utf8(line) {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            let text = text.trim_end_matches(['\n', '\r']);
            if text.trim().is_empty() {
                continue;
            }
            trace!(bytes = text.len(), "stream document");
            return Some(serde_json::from_str(text).map_err(ApiError::from));
        }
    }
}

impl std::iter::FusedIterator for JsonStream {}

impl std::fmt::Debug for JsonStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStream")
            .field("open", &self.body.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use serde::Deserialize;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;

    fn ok(body: &str) -> HttpResponse {
        HttpResponse::from_body(200, Vec::new(), body)
    }

    #[test]
    fn plain_json_is_parsed() {
        let result = handle_response(ok(r#"{"a":1}"#), false, false).unwrap();
        assert_eq!(result.into_json(), Some(json!({"a": 1})));
    }

    #[traced_test]
    #[test]
    fn non_200_is_an_error_carrying_the_response() {
        let response = HttpResponse::from_body(404, Vec::new(), r#"{"errors":[]}"#);
        let err = handle_response(response, false, false).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(matches!(err, ApiError::UnexpectedStatus { .. }));
        assert!(logs_contain("request failed"));
    }

    #[test]
    fn non_200_wins_over_raw_flag() {
        let response = HttpResponse::from_body(500, Vec::new(), "");
        let err = handle_response(response, true, true).unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn raw_flag_returns_response_untouched() {
        let result = handle_response(ok("not json at all"), true, false).unwrap();
        let raw = result.into_raw().unwrap();
        assert_eq!(raw.status, 200);
        assert_eq!(raw.text().unwrap(), "not json at all");
    }

    #[test]
    fn raw_flag_takes_precedence_over_stream() {
        let result = handle_response(ok("{\"id\":1}\n"), true, true).unwrap();
        assert!(matches!(result, Response::Raw(_)));
    }

    #[test]
    fn stream_yields_each_line_in_order() {
        let result = handle_response(ok("{\"id\":1}\n{\"id\":2}\n"), false, true).unwrap();
        let values: Vec<Value> = result
            .into_stream()
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(values, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn stream_skips_keep_alive_lines_and_crlf() {
        let mut stream = ok("\r\n{\"id\":1}\r\n\r\n{\"id\":2}").into_json_stream();
        assert_eq!(stream.next().unwrap().unwrap(), json!({"id": 1}));
        assert_eq!(stream.next().unwrap().unwrap(), json!({"id": 2}));
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn stream_reports_bad_line_and_continues() {
        let mut stream = ok("{\"id\":1}\nnope\n{\"id\":3}\n").into_json_stream();
        assert!(stream.next().unwrap().is_ok());
        assert!(matches!(
            stream.next().unwrap(),
            Err(ApiError::Deserialization(_))
        ));
        assert_eq!(stream.next().unwrap().unwrap(), json!({"id": 3}));
        assert!(stream.next().is_none());
    }

    #[test]
    fn stream_rejects_invalid_utf8() {
        let body = io::Cursor::new(b"\xff\xfe\n{\"id\":2}\n".to_vec());
        let mut stream = HttpResponse::new(200, Vec::new(), body).into_json_stream();
        assert!(matches!(
            stream.next().unwrap(),
            Err(ApiError::InvalidUtf8(_))
        ));
        assert_eq!(stream.next().unwrap().unwrap(), json!({"id": 2}));
    }

    /// Yields one line, then fails every read.
    struct BrokenPipe {
        first: io::Cursor<&'static [u8]>,
    }

    impl Read for BrokenPipe {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.first.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn stream_ends_after_read_error() {
        let reader = io::BufReader::new(BrokenPipe {
            first: io::Cursor::new(&b"{\"id\":1}\n"[..]),
        });
        let mut stream = HttpResponse::new(200, Vec::new(), reader).into_json_stream();
        assert!(stream.next().unwrap().is_ok());
        assert!(matches!(stream.next().unwrap(), Err(ApiError::Io(_))));
        assert!(stream.next().is_none());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Status {
        id: u64,
        text: String,
    }

    #[test]
    fn deserialize_into_typed_value() {
        let result = handle_response(ok(r#"{"id":9,"text":"hi"}"#), false, false).unwrap();
        let status: Status = result.deserialize().unwrap().unwrap();
        assert_eq!(
            status,
            Status {
                id: 9,
                text: "hi".to_string()
            }
        );
    }

    #[test]
    fn deserialize_is_none_for_streams() {
        let result = handle_response(ok(""), false, true).unwrap();
        assert!(result.deserialize::<Status>().is_none());
    }
}

//! Response model and its normalization rules.
//!
//! Every [`Response`] is normalized once, at construction:
//!
//! - the body is stored as bytes (strings as UTF-8, other displayable values
//!   via [`Response::from_display`]);
//! - `Content-Type` defaults to [`DEFAULT_CONTENT_TYPE`] when the caller did
//!   not supply one;
//! - `Content-Length` is always recomputed from the final body length,
//!   overwriting whatever the caller set.
//!
//! Header names keep the caller's spelling, but a name is never stored twice:
//! setting a header whose name matches an existing one (ASCII
//! case-insensitively) replaces the value in place.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;

/// Content type applied when a response does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Content type used by [`Response::json`].
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Reason phrase for a status code, or `"Unknown"` for codes outside the table.
#[must_use]
pub fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        _ => "Unknown",
    }
}

/// An HTTP response: status, ordered headers and a byte body.
///
/// Immutable once built; use [`Response::builder`] or one of the shorthand
/// constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Response {
    /// A `200 OK` response with default headers.
    #[must_use]
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self::builder().body(body)
    }

    /// A response with the given status and default headers.
    #[must_use]
    pub fn with_status(body: impl Into<Bytes>, status: u16) -> Self {
        Self::builder().status(status).body(body)
    }

    /// A response whose body is the string form of `value`.
    #[must_use]
    pub fn from_display(value: impl fmt::Display, status: u16) -> Self {
        Self::with_status(value.to_string(), status)
    }

    /// A JSON response with `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(value: &T, status: u16) -> serde_json::Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::builder()
            .status(status)
            .header("Content-Type", JSON_CONTENT_TYPE)
            .body(body))
    }

    /// Start building a response. Status defaults to `200`.
    #[must_use]
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::default()
    }

    /// Numeric status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Look up a header value by name (ASCII case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Status line without the protocol version, e.g. `"404 Not Found"`.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!("{} {}", self.status, status_text(self.status))
    }

    /// Headers as owned `(name, value)` pairs, ready for a server adapter.
    #[must_use]
    pub fn headers_list(&self) -> Vec<(String, String)> {
        self.headers.clone()
    }
}

/// Builder for [`Response`]. Normalization happens in [`ResponseBuilder::body`].
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    status: u16,
    headers: Vec<(String, String)>,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
        }
    }
}

impl ResponseBuilder {
    /// Set the status code.
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set a header. The value is stringified.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        set_header(&mut self.headers, name.into(), value.to_string());
        self
    }

    /// Set several headers in order.
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: fmt::Display,
    {
        for (name, value) in headers {
            set_header(&mut self.headers, name.into(), value.to_string());
        }
        self
    }

    /// Attach the body and produce the normalized response.
    #[must_use]
    pub fn body(self, body: impl Into<Bytes>) -> Response {
        let body = body.into();
        let mut headers = self.headers;

        if !headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("Content-Type"))
        {
            headers.push(("Content-Type".to_owned(), DEFAULT_CONTENT_TYPE.to_owned()));
        }
        set_header(
            &mut headers,
            "Content-Length".to_owned(),
            body.len().to_string(),
        );

        Response {
            status: self.status,
            headers,
            body,
        }
    }
}

fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
        Some((_, existing)) => *existing = value,
        None => headers.push((name, value)),
    }
}

//! The raw exchange boundary between a server adapter and the dispatcher.
//!
//! An [`Exchange`] is one inbound request paired with the means to produce its
//! response. The dispatcher reads the input side once while building a
//! [`Request`](crate::Request) and writes the output side once when it
//! serializes the final [`Response`](crate::Response):
//!
//! ```text
//! method/path/query/headers/body  ->  App::call  ->  start_response + write_body
//! ```

use std::io::{self, Cursor, Read};

use bytes::Bytes;

/// One HTTP exchange as seen by [`App::call`](crate::App::call).
///
/// `content_type` and `content_length` are structured metadata kept apart
/// from the generic header list, the same split CGI-style gateways use.
pub trait Exchange {
    /// Request method as received (any case).
    fn method(&self) -> &str;

    /// Request path, without the query string.
    fn path(&self) -> &str;

    /// Raw query string, without the leading `?`. Empty when absent.
    fn query_string(&self) -> &str;

    /// Generic transport headers with their raw names.
    fn headers(&self) -> &[(String, String)];

    /// Declared content type, if any.
    fn content_type(&self) -> Option<&str>;

    /// Declared content length as received, unparsed.
    fn content_length(&self) -> Option<&str>;

    /// Body source. Callers must not read past the declared content length.
    fn body_reader(&mut self) -> &mut dyn Read;

    /// Begin the response with a status line (`"200 OK"`) and header list.
    fn start_response(&mut self, status_line: &str, headers: &[(String, String)]);

    /// Write the response body.
    fn write_body(&mut self, body: &[u8]) -> io::Result<()>;
}

/// An in-memory [`Exchange`].
///
/// The input side is populated with the `with_*` builder methods; the output
/// side is captured and can be read back once the dispatcher has run.
///
/// # Examples
///
/// ```
/// use switchyard_http::{App, BufferedExchange, Reply};
///
/// let mut app = App::new();
/// app.route("/ping").to(|_req: &switchyard_http::Request| Ok(Reply::from("pong")));
///
/// let mut exchange = BufferedExchange::new("GET", "/ping");
/// app.call(&mut exchange);
///
/// assert_eq!(exchange.status_line(), Some("200 OK"));
/// assert_eq!(exchange.response_body(), b"pong");
/// ```
#[derive(Debug, Default)]
pub struct BufferedExchange {
    method: String,
    path: String,
    query: String,
    headers: Vec<(String, String)>,
    content_type: Option<String>,
    content_length: Option<String>,
    input: Cursor<Bytes>,
    status_line: Option<String>,
    response_headers: Vec<(String, String)>,
    response_body: Vec<u8>,
}

impl BufferedExchange {
    /// Create an exchange with the given method and path and an empty body.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the raw query string.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Append a transport header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the structured content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the structured content length verbatim, valid or not.
    #[must_use]
    pub fn with_content_length(mut self, content_length: impl Into<String>) -> Self {
        self.content_length = Some(content_length.into());
        self
    }

    /// Set the body and declare its exact length.
    #[must_use]
    pub fn with_body(self, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        let len = body.len();
        self.with_input(body).with_content_length(len.to_string())
    }

    /// Set the body source without touching the declared length.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<Bytes>) -> Self {
        self.input = Cursor::new(input.into());
        self
    }

    /// Number of body bytes consumed so far.
    #[must_use]
    pub fn input_position(&self) -> u64 {
        self.input.position()
    }

    /// The status line passed to `start_response`, if the response has started.
    #[must_use]
    pub fn status_line(&self) -> Option<&str> {
        self.status_line.as_deref()
    }

    /// The numeric status code parsed from the status line.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status_line
            .as_deref()
            .and_then(|line| line.split(' ').next())
            .and_then(|code| code.parse().ok())
    }

    /// Response headers captured from `start_response`.
    #[must_use]
    pub fn response_headers(&self) -> &[(String, String)] {
        &self.response_headers
    }

    /// Look up a captured response header (ASCII case-insensitive).
    #[must_use]
    pub fn response_header(&self, name: &str) -> Option<&str> {
        self.response_headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Response body bytes written so far.
    #[must_use]
    pub fn response_body(&self) -> &[u8] {
        &self.response_body
    }

    /// Consume the exchange, returning the captured status line, headers and body.
    #[must_use]
    pub fn into_output(self) -> (Option<String>, Vec<(String, String)>, Vec<u8>) {
        (self.status_line, self.response_headers, self.response_body)
    }
}

impl Exchange for BufferedExchange {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query_string(&self) -> &str {
        &self.query
    }

    fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn content_length(&self) -> Option<&str> {
        self.content_length.as_deref()
    }

    fn body_reader(&mut self) -> &mut dyn Read {
        &mut self.input
    }

    fn start_response(&mut self, status_line: &str, headers: &[(String, String)]) {
        self.status_line = Some(status_line.to_owned());
        self.response_headers = headers.to_vec();
    }

    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        self.response_body.extend_from_slice(body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_declare_length_with_body() {
        let exchange = BufferedExchange::new("POST", "/users").with_body("abc");
        assert_eq!(exchange.content_length(), Some("3"));
        assert_eq!(exchange.input_position(), 0);
    }

    #[test]
    fn test_should_keep_input_without_declared_length() {
        let mut exchange = BufferedExchange::new("POST", "/").with_input("data");
        assert_eq!(exchange.content_length(), None);

        let mut buf = Vec::new();
        exchange.body_reader().read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"data");
    }

    #[test]
    fn test_should_capture_response_output() {
        let mut exchange = BufferedExchange::new("GET", "/");
        exchange.start_response(
            "201 Created",
            &[("Content-Type".to_owned(), "text/plain".to_owned())],
        );
        exchange.write_body(b"done").unwrap();

        assert_eq!(exchange.status_line(), Some("201 Created"));
        assert_eq!(exchange.status_code(), Some(201));
        assert_eq!(exchange.response_header("content-type"), Some("text/plain"));
        assert_eq!(exchange.response_body(), b"done");
    }

    #[test]
    fn test_should_report_no_status_before_start() {
        let exchange = BufferedExchange::new("GET", "/");
        assert_eq!(exchange.status_line(), None);
        assert_eq!(exchange.status_code(), None);
    }
}

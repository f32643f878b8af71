//! Handler contract and the tagged reply a handler produces.

use std::fmt;

use bytes::Bytes;

use crate::request::Request;
use crate::response::Response;

/// What a handler hands back on success.
///
/// Either a complete [`Response`] that the dispatcher passes through
/// unchanged, or a raw body that is wrapped in a `200` response with default
/// headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A fully formed response.
    Response(Response),
    /// A bare body to be coerced into a `200 OK` response.
    Body(Bytes),
}

impl Reply {
    /// A body built from any displayable value.
    #[must_use]
    pub fn display(value: impl fmt::Display) -> Self {
        Self::Body(Bytes::from(value.to_string()))
    }

    /// Coerce into the response that will be serialized.
    #[must_use]
    pub fn into_response(self) -> Response {
        match self {
            Self::Response(response) => response,
            Self::Body(body) => Response::new(body),
        }
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl From<&'static str> for Reply {
    fn from(body: &'static str) -> Self {
        Self::Body(Bytes::from_static(body.as_bytes()))
    }
}

impl From<String> for Reply {
    fn from(body: String) -> Self {
        Self::Body(Bytes::from(body))
    }
}

impl From<&'static [u8]> for Reply {
    fn from(body: &'static [u8]) -> Self {
        Self::Body(Bytes::from_static(body))
    }
}

impl From<Vec<u8>> for Reply {
    fn from(body: Vec<u8>) -> Self {
        Self::Body(Bytes::from(body))
    }
}

impl From<Bytes> for Reply {
    fn from(body: Bytes) -> Self {
        Self::Body(body)
    }
}

/// Result of invoking a handler. Any error is a handler fault.
pub type HandlerResult = anyhow::Result<Reply>;

/// Application-supplied behavior bound to one or more `(path, method)` pairs.
///
/// Closures of the shape `Fn(&Request) -> HandlerResult` implement this trait
/// directly; implement it by hand for handlers that carry their own state.
pub trait Handler: Send + Sync + 'static {
    /// Produce a reply for `request`, or fail.
    fn call(&self, request: &Request) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
{
    fn call(&self, request: &Request) -> HandlerResult {
        self(request)
    }
}

//! Minimal synchronous HTTP request dispatch.
//!
//! This crate turns one inbound HTTP exchange into one outbound response:
//!
//! - **Request**: an immutable view of method, path, headers, query and body
//! - **Response**: status, ordered headers and a byte body, normalized at
//!   construction
//! - **Router**: exact `(path, METHOD)` lookup
//! - **App**: resolves a handler, contains its faults (404 / 500) and
//!   serializes the result
//! - **Service**: hyper `Service` adapter plus a graceful accept loop
//!
//! ```text
//! hyper request ──► DispatchService ──► BufferedExchange ──► App::call
//!                                                              │
//!                       Request::from_exchange ◄───────────────┤
//!                       Router::resolve ──► Handler::call      │
//!                       Reply / 404 / 500 ──► Response ────────┘
//! ```

pub mod app;
pub mod error;
pub mod exchange;
pub mod handler;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod service;

pub use app::{App, Route};
pub use error::{RequestError, RequestResult};
pub use exchange::{BufferedExchange, Exchange};
pub use handler::{Handler, HandlerResult, Reply};
pub use request::{Query, QueryValue, Request};
pub use response::{Response, ResponseBuilder};
pub use router::{Methods, Router};
pub use server::serve;
pub use service::{DispatchConfig, DispatchService};

//! The dispatcher: resolves a handler, invokes it inside a failure boundary,
//! and serializes the resulting response onto the exchange.
//!
//! Each call moves through three states:
//!
//! ```text
//! Resolving  -- no route -------------------------------> Responding (404)
//! Resolving  -- route ----> Invoking -- Ok(reply) ------> Responding (reply)
//!                                    -- Err / panic ----> Responding (500)
//! ```
//!
//! Nothing raised by a handler escapes [`App::call`]; every exchange receives
//! exactly one response.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::exchange::Exchange;
use crate::handler::{Handler, HandlerResult};
use crate::request::Request;
use crate::response::Response;
use crate::router::{Methods, Router};

/// An application: a route table plus the dispatch pipeline.
///
/// Built once at startup, then shared read-only (typically behind an `Arc`)
/// by every worker serving requests.
///
/// # Examples
///
/// ```
/// use switchyard_http::{App, BufferedExchange, Reply, Request, Response};
///
/// let mut app = App::new();
/// app.route("/hello").to(|req: &Request| {
///     let name = req.query().first("name").unwrap_or("World").to_owned();
///     Ok(Reply::from(Response::new(format!("Hello, {name}!"))))
/// });
///
/// let mut exchange = BufferedExchange::new("GET", "/hello").with_query("name=Ada");
/// app.call(&mut exchange);
/// assert_eq!(exchange.response_body(), b"Hello, Ada!");
/// ```
#[derive(Debug, Default)]
pub struct App {
    router: Router,
}

impl App {
    /// Create an application with an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The route table.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Register `handler` for `path` under `methods`. Last registration wins.
    pub fn register<H: Handler>(
        &mut self,
        path: &str,
        methods: impl Into<Methods>,
        handler: H,
    ) -> &mut Self {
        self.router.add_route(path, methods, Arc::new(handler));
        self
    }

    /// Start registering a route for `path`. Methods default to `GET`.
    pub fn route(&mut self, path: impl Into<String>) -> Route<'_> {
        Route {
            app: self,
            path: path.into(),
            methods: Methods::default(),
        }
    }

    /// Serve one exchange end to end.
    pub fn call<E: Exchange + ?Sized>(&self, exchange: &mut E) {
        let response = match Request::from_exchange(exchange) {
            Ok(request) => self.handle(&request),
            Err(err) => {
                warn!(error = %err, "failed to build request");
                internal_error(&err)
            }
        };

        if let Err(err) = respond(&response, exchange) {
            warn!(error = %err, "failed to write response body");
        }
    }

    /// Resolve and invoke the handler for an already-built request.
    #[must_use]
    pub fn handle(&self, request: &Request) -> Response {
        let Some(handler) = self.router.resolve(request.path(), request.method()) else {
            debug!(
                method = request.method(),
                path = request.path(),
                "no route matched"
            );
            return not_found();
        };

        debug!(
            method = request.method(),
            path = request.path(),
            "dispatching request"
        );
        invoke(handler, request)
    }
}

/// Pending registration returned by [`App::route`].
#[must_use = "a route is only registered once `to` or `to_handler` is called"]
pub struct Route<'a> {
    app: &'a mut App,
    path: String,
    methods: Methods,
}

impl<'a> Route<'a> {
    /// Replace the default `GET` with the given methods.
    pub fn methods(mut self, methods: impl Into<Methods>) -> Self {
        self.methods = methods.into();
        self
    }

    /// Register a closure handler.
    pub fn to<F>(self, handler: F) -> &'a mut App
    where
        F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.to_handler(handler)
    }

    /// Register any [`Handler`] implementation.
    pub fn to_handler<H: Handler>(self, handler: H) -> &'a mut App {
        self.app.register(&self.path, self.methods, handler)
    }
}

impl std::fmt::Debug for Route<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

fn invoke(handler: &dyn Handler, request: &Request) -> Response {
    match panic::catch_unwind(AssertUnwindSafe(|| handler.call(request))) {
        Ok(Ok(reply)) => reply.into_response(),
        Ok(Err(err)) => {
            warn!(
                method = request.method(),
                path = request.path(),
                error = %err,
                "handler failed"
            );
            internal_error(&format!("{err:#}"))
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(
                method = request.method(),
                path = request.path(),
                panic = %message,
                "handler panicked"
            );
            internal_error(&message)
        }
    }
}

fn respond<E: Exchange + ?Sized>(response: &Response, exchange: &mut E) -> io::Result<()> {
    exchange.start_response(&response.status_line(), &response.headers_list());
    exchange.write_body(response.body())
}

fn not_found() -> Response {
    Response::with_status("404 Not Found", 404)
}

fn internal_error(fault: &dyn std::fmt::Display) -> Response {
    Response::with_status(format!("500 Internal Server Error: {fault}"), 500)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_owned()
    }
}

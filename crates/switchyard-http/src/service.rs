//! Hyper `Service` adapter that feeds HTTP requests through an [`App`].

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use tracing::{debug, warn};

use crate::app::App;
use crate::exchange::BufferedExchange;
use crate::response::Response;

/// Default cap on a collected request body (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Configuration for the HTTP adapter.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Largest request body accepted before answering `413`.
    pub max_body_size: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

/// Hyper `Service` implementation wrapping an [`App`].
///
/// Each request body is collected (up to the configured limit), replayed
/// through a [`BufferedExchange`], and dispatched on the blocking pool since
/// handlers are synchronous.
#[derive(Debug)]
pub struct DispatchService {
    app: Arc<App>,
    config: Arc<DispatchConfig>,
}

impl DispatchService {
    /// Create a new `DispatchService` owning `app`.
    #[must_use]
    pub fn new(app: App, config: DispatchConfig) -> Self {
        Self::from_shared(Arc::new(app), config)
    }

    /// Create a new `DispatchService` over an already shared `app`.
    #[must_use]
    pub fn from_shared(app: Arc<App>, config: DispatchConfig) -> Self {
        Self {
            app,
            config: Arc::new(config),
        }
    }

    /// The application being served.
    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// The adapter configuration.
    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }
}

impl Clone for DispatchService {
    fn clone(&self) -> Self {
        Self {
            app: Arc::clone(&self.app),
            config: Arc::clone(&self.config),
        }
    }
}

impl<B> hyper::service::Service<http::Request<B>> for DispatchService
where
    B: http_body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let app = Arc::clone(&self.app);
        let config = Arc::clone(&self.config);

        Box::pin(async move { Ok(process_request(req, app, &config).await) })
    }
}

#[derive(Debug, thiserror::Error)]
enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    Read(Box<dyn std::error::Error + Send + Sync>),
}

impl BodyError {
    fn into_response(self) -> Response {
        match self {
            Self::TooLarge { .. } => Response::with_status("413 Payload Too Large", 413),
            Self::Read(_) => Response::with_status("400 Bad Request", 400),
        }
    }
}

/// Process a single HTTP request through the full pipeline.
async fn process_request<B>(
    req: http::Request<B>,
    app: Arc<App>,
    config: &DispatchConfig,
) -> http::Response<Full<Bytes>>
where
    B: http_body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();

    // 1. Collect body within the configured limit.
    let body = match collect_body(body, config.max_body_size).await {
        Ok(body) => body,
        Err(err) => {
            warn!(
                method = %parts.method,
                path = parts.uri.path(),
                error = %err,
                "rejecting request body"
            );
            return to_http(&err.into_response());
        }
    };

    // 2. Replay the request as an in-memory exchange.
    let exchange = exchange_from_parts(&parts, body);

    // 3. Dispatch on the blocking pool.
    let exchange = match tokio::task::spawn_blocking(move || {
        let mut exchange = exchange;
        app.call(&mut exchange);
        exchange
    })
    .await
    {
        Ok(exchange) => exchange,
        Err(err) => {
            warn!(error = %err, "dispatch task failed");
            return to_http(&Response::with_status("500 Internal Server Error", 500));
        }
    };

    // 4. Convert the captured output.
    let status = exchange.status_code().unwrap_or(500);
    debug!(
        method = %parts.method,
        path = parts.uri.path(),
        status,
        "request completed"
    );
    let (_, headers, body) = exchange.into_output();
    build_http_response(status, &headers, Bytes::from(body))
}

async fn collect_body<B>(body: B, limit: usize) -> Result<Bytes, BodyError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Limited::new(body, limit)
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|err| {
            if err.downcast_ref::<LengthLimitError>().is_some() {
                BodyError::TooLarge { limit }
            } else {
                BodyError::Read(err)
            }
        })
}

/// Build an exchange from request parts and a collected body.
///
/// `Content-Type` and `Content-Length` move to the structured metadata. A
/// chunked request carries no length header, so one is synthesized from the
/// collected body.
fn exchange_from_parts(parts: &http::request::Parts, body: Bytes) -> BufferedExchange {
    let mut exchange = BufferedExchange::new(parts.method.as_str(), parts.uri.path())
        .with_query(parts.uri.query().unwrap_or_default());

    for (name, value) in &parts.headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        if name == http::header::CONTENT_TYPE {
            exchange = exchange.with_content_type(value);
        } else if name == http::header::CONTENT_LENGTH {
            exchange = exchange.with_content_length(value);
        } else {
            exchange = exchange.with_header(name.as_str(), value);
        }
    }

    let declared = parts.headers.contains_key(http::header::CONTENT_LENGTH);
    if !declared && !body.is_empty() {
        exchange = exchange.with_content_length(body.len().to_string());
    }
    exchange.with_input(body)
}

fn to_http(response: &Response) -> http::Response<Full<Bytes>> {
    build_http_response(response.status(), response.headers(), response.body().clone())
}

fn build_http_response(
    status: u16,
    headers: &[(String, String)],
    body: Bytes,
) -> http::Response<Full<Bytes>> {
    let mut builder = http::Response::builder().status(status);
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder.body(Full::new(body)).unwrap_or_else(|err| {
        warn!(status, error = %err, "invalid response, answering 500");
        let mut response = http::Response::new(Full::new(Bytes::from_static(
            b"500 Internal Server Error",
        )));
        *response.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}

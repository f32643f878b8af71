//! Accept loop serving a [`DispatchService`] over TCP.

use std::future::Future;
use std::io;

use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::service::DispatchService;

/// Serve connections from `listener` until `shutdown` resolves, then wait for
/// in-flight connections to drain.
///
/// HTTP/1.1 and HTTP/2 are negotiated per connection. Accept errors are
/// logged and skipped; the only failure is an unusable listener.
pub async fn serve(
    listener: TcpListener,
    service: DispatchService,
    shutdown: impl Future<Output = ()>,
) -> io::Result<()> {
    let local_addr = listener.local_addr()?;
    info!(
        %local_addr,
        max_body_size = service.config().max_body_size,
        routes = service.app().router().len(),
        "accepting connections"
    );

    let graceful = GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());
    let mut accepted: u64 = 0;

    tokio::pin!(shutdown);

    loop {
        let (stream, peer_addr) = tokio::select! {
            result = listener.accept() => match result {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                    continue;
                }
            },
            () = &mut shutdown => break,
        };

        accepted += 1;
        debug!(%peer_addr, accepted, "connection accepted");

        let conn = http.serve_connection(TokioIo::new(stream), service.clone());
        let conn = graceful.watch(conn.into_owned());
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                error!(%peer_addr, error = %e, "connection error");
            }
        });
    }

    info!(accepted, "shutting down, draining connections");
    graceful.shutdown().await;
    info!(%local_addr, "server stopped");

    Ok(())
}

//! Switchyard demo server.
//!
//! Serves a small example application: an index page, a query-driven greeting,
//! a JSON users API and an HTML form that appends to the same user list.
//!
//! # Usage
//!
//! ```text
//! LISTEN_ADDR=127.0.0.1:8000 switchyard-demo
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LISTEN_ADDR` | `127.0.0.1:8000` | Bind address |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `MAX_BODY_SIZE` | `1048576` | Largest accepted request body in bytes |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod config;
mod handlers;
mod pages;
mod store;

use std::sync::Arc;

use anyhow::{Context, Result};
use switchyard_http::{DispatchConfig, DispatchService};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::DemoConfig;
use crate::store::UserStore;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = DemoConfig::from_env()?;
    init_tracing(&config.log_level)?;

    let store = Arc::new(UserStore::seeded());
    let app = handlers::build_app(Arc::clone(&store));
    info!(
        routes = app.router().len(),
        users = store.count(),
        "application ready"
    );

    let service = DispatchService::new(
        app,
        DispatchConfig {
            max_body_size: config.max_body_size,
        },
    );

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.listen_addr))?;
    let addr = listener.local_addr()?;
    info!(%addr, "switchyard demo listening, visit http://{addr}/");

    switchyard_http::serve(listener, service, async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    })
    .await
    .context("server failed")?;

    Ok(())
}

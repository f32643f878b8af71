//! Integration tests for the switchyard demo server.
//!
//! These tests require a running `switchyard-demo` at `localhost:8000`.
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo run -p switchyard-demo &
//! cargo test -p switchyard-integration -- --ignored
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("SWITCHYARD_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8000".to_owned())
}

/// Absolute URL for `path` on the server under test.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", endpoint_url().trim_end_matches('/'))
}

/// Create an HTTP client for the server under test.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// A name unlikely to collide with users created by other tests.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("{prefix}-{id}")
}

mod test_errors;
mod test_form;
mod test_pages;
mod test_users;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_generate_distinct_prefixed_names() {
        let first = unique_name("Zoe");
        let second = unique_name("Zoe");

        assert!(first.starts_with("Zoe-"));
        assert_eq!(first.len(), "Zoe-".len() + 8);
        assert_ne!(first, second);
    }
}

//! Exact-match route table.
//!
//! Routes are keyed by the literal request path and the upper-cased method.
//! There is no prefix, wildcard or parameter matching and no trailing-slash
//! normalization: `/users` and `/users/` are different routes.
//!
//! Registering the same `(path, method)` pair twice replaces the earlier
//! handler without error.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::handler::Handler;

/// The HTTP methods a route is registered for.
///
/// Converts from a single token (`"GET"`) or an ordered sequence of tokens
/// (`["GET", "POST"]`). Tokens are upper-cased on registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Methods(Vec<String>);

impl Methods {
    /// Iterate over the method tokens as given.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for Methods {
    fn default() -> Self {
        Self(vec!["GET".to_owned()])
    }
}

impl From<&str> for Methods {
    fn from(method: &str) -> Self {
        Self(vec![method.to_owned()])
    }
}

impl From<String> for Methods {
    fn from(method: String) -> Self {
        Self(vec![method])
    }
}

impl From<http::Method> for Methods {
    fn from(method: http::Method) -> Self {
        Self(vec![method.as_str().to_owned()])
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for Methods {
    fn from(methods: [S; N]) -> Self {
        Self(methods.iter().map(|m| m.as_ref().to_owned()).collect())
    }
}

impl<S: AsRef<str>> From<&[S]> for Methods {
    fn from(methods: &[S]) -> Self {
        Self(methods.iter().map(|m| m.as_ref().to_owned()).collect())
    }
}

impl<S: AsRef<str>> From<Vec<S>> for Methods {
    fn from(methods: Vec<S>) -> Self {
        Self(methods.iter().map(|m| m.as_ref().to_owned()).collect())
    }
}

/// Route table mapping `(path, METHOD)` to a handler.
///
/// Populated during startup and read concurrently while serving; the router
/// itself performs no locking, so registration must finish before the first
/// request is dispatched.
#[derive(Default)]
pub struct Router {
    routes: HashMap<String, HashMap<String, Arc<dyn Handler>>>,
}

impl Router {
    /// Create an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `path` under every method in `methods`.
    ///
    /// All methods share the same handler. An existing registration for the
    /// same pair is replaced.
    pub fn add_route(
        &mut self,
        path: &str,
        methods: impl Into<Methods>,
        handler: Arc<dyn Handler>,
    ) {
        let methods: Methods = methods.into();
        let by_method = self.routes.entry(path.to_owned()).or_default();
        for method in methods.iter() {
            let method = method.to_ascii_uppercase();
            if by_method.insert(method.clone(), Arc::clone(&handler)).is_some() {
                tracing::debug!(path, %method, "replacing existing route");
            }
        }
    }

    /// Find the handler registered for `path` and `method`.
    ///
    /// The method is matched case-insensitively; the path must match exactly.
    #[must_use]
    pub fn resolve(&self, path: &str, method: &str) -> Option<&dyn Handler> {
        self.routes
            .get(path)?
            .get(method.to_ascii_uppercase().as_str())
            .map(|handler| &**handler)
    }

    /// All registered `(path, method)` pairs, sorted.
    #[must_use]
    pub fn routes(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<_> = self
            .routes
            .iter()
            .flat_map(|(path, by_method)| {
                by_method
                    .keys()
                    .map(move |method| (path.as_str(), method.as_str()))
            })
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Number of registered `(path, method)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    /// Whether no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::BufferedExchange;
    use crate::handler::{HandlerResult, Reply};
    use crate::request::Request;

    fn text_handler(text: &'static str) -> Arc<dyn Handler> {
        Arc::new(move |_: &Request| -> HandlerResult { Ok(Reply::from(text)) })
    }

    fn call_text(router: &Router, path: &str, method: &str) -> Option<Reply> {
        let mut exchange = BufferedExchange::new(method, path);
        let request = Request::from_exchange(&mut exchange).unwrap();
        router
            .resolve(path, method)
            .map(|handler| handler.call(&request).unwrap())
    }

    #[test]
    fn test_should_resolve_registered_route() {
        let mut router = Router::new();
        router.add_route("/test", "GET", text_handler("test"));

        assert!(router.resolve("/test", "GET").is_some());
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_should_return_none_for_unknown_path() {
        let mut router = Router::new();
        router.add_route("/test", "GET", text_handler("test"));

        assert!(router.resolve("/other", "GET").is_none());
    }

    #[test]
    fn test_should_return_none_for_unregistered_method() {
        let mut router = Router::new();
        router.add_route("/test", "GET", text_handler("test"));

        assert!(router.resolve("/test", "POST").is_none());
    }

    #[test]
    fn test_should_match_method_case_insensitively() {
        let mut router = Router::new();
        router.add_route("/test", "get", text_handler("test"));

        assert!(router.resolve("/test", "GET").is_some());
        assert!(router.resolve("/test", "Get").is_some());
        assert_eq!(router.routes(), vec![("/test", "GET")]);
    }

    #[test]
    fn test_should_match_path_exactly() {
        let mut router = Router::new();
        router.add_route("/users", "GET", text_handler("users"));

        assert!(router.resolve("/users/", "GET").is_none());
        assert!(router.resolve("/Users", "GET").is_none());
        assert!(router.resolve("/users/1", "GET").is_none());
        assert!(router.resolve("/user", "GET").is_none());
    }

    #[test]
    fn test_should_register_every_method_in_sequence() {
        let mut router = Router::new();
        router.add_route("/api", ["GET", "post"], text_handler("api"));

        assert!(router.resolve("/api", "GET").is_some());
        assert!(router.resolve("/api", "POST").is_some());
        assert_eq!(router.routes(), vec![("/api", "GET"), ("/api", "POST")]);
    }

    #[test]
    fn test_should_replace_handler_on_duplicate_registration() {
        let mut router = Router::new();
        router.add_route("/dup", "GET", text_handler("first"));
        router.add_route("/dup", "GET", text_handler("second"));

        assert_eq!(router.len(), 1);
        assert_eq!(
            call_text(&router, "/dup", "GET"),
            Some(Reply::from("second"))
        );
    }

    #[test]
    fn test_should_replace_only_overlapping_methods() {
        let mut router = Router::new();
        router.add_route("/mix", vec!["GET", "POST"], text_handler("both"));
        router.add_route("/mix", "POST", text_handler("post"));

        assert_eq!(call_text(&router, "/mix", "GET"), Some(Reply::from("both")));
        assert_eq!(call_text(&router, "/mix", "POST"), Some(Reply::from("post")));
    }

    #[test]
    fn test_should_register_nothing_for_empty_methods() {
        let mut router = Router::new();
        router.add_route("/none", Vec::<&str>::new(), text_handler("none"));

        assert!(router.is_empty());
    }

    #[test]
    fn test_should_default_methods_to_get() {
        assert_eq!(Methods::default(), Methods::from("GET"));
        assert_eq!(Methods::from(http::Method::PUT), Methods::from("PUT"));
    }
}

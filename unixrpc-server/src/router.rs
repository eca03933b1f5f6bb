//! Method dispatch registry
//!
//! The router maps exact method names to handlers and invokes them. It is
//! built once before the server starts and then shared read-only by every
//! session, so dispatch needs no locking.
//!
//! # Examples
//!
//! ```rust
//! use unixrpc_core::{Error, ResultType, Value};
//! use unixrpc_server::Router;
//!
//! let router = Router::with_builtins();
//!
//! let out = router.dispatch("floor", &[Value::from(3.7)]).unwrap();
//! assert_eq!(out.value, Value::from(3.0));
//! assert_eq!(out.result_type, ResultType::Int);
//!
//! let err = router.dispatch("Floor", &[Value::from(3.7)]).unwrap_err();
//! assert_eq!(err, Error::UnknownMethod("Floor".into()));
//! ```

use crate::handler::Handler;
use crate::methods;
use std::collections::HashMap;
use std::sync::Arc;
use unixrpc_core::{Dispatched, Error, Result, Value};

/// Registry of method handlers
///
/// Cloning is cheap: the handler map sits behind an `Arc` and is copied only
/// when a clone registers a new method.
#[derive(Clone)]
pub struct Router {
    handlers: Arc<HashMap<String, Arc<dyn Handler>>>,
}

impl Router {
    /// Create an empty router
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(HashMap::new()),
        }
    }

    /// Create a router with `floor`, `nroot`, `reverse`, `validAnagram` and
    /// `sort` registered
    pub fn with_builtins() -> Self {
        let mut router = Self::new();
        methods::register_builtins(&mut router);
        router
    }

    /// Register a handler, replacing any previous handler with the same name
    pub fn register(&mut self, method: impl Into<String>, handler: Box<dyn Handler>) {
        let handlers = Arc::make_mut(&mut self.handlers);
        handlers.insert(method.into(), Arc::from(handler));
    }

    /// Get the handler for a method
    pub fn get(&self, method: &str) -> Option<Arc<dyn Handler>> {
        self.handlers.get(method).cloned()
    }

    /// Check if a method is registered
    pub fn has_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Registered method names, sorted
    pub fn methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Look up `method` by exact name and run its handler on `params`
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownMethod`] if nothing is registered under `method`
    /// - whatever the handler returns, normally [`Error::Validation`]
    pub fn dispatch(&self, method: &str, params: &[Value]) -> Result<Dispatched> {
        let handler = self
            .handlers
            .get(method)
            .ok_or_else(|| Error::UnknownMethod(method.to_string()))?;
        handler.call(params)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a router
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Start from an empty router
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Start from a router with the built-in methods
    pub fn with_builtins() -> Self {
        Self {
            router: Router::with_builtins(),
        }
    }

    /// Add a handler for a method
    pub fn handler(mut self, method: impl Into<String>, handler: Box<dyn Handler>) -> Self {
        self.router.register(method, handler);
        self
    }

    /// Build the router
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::from_fn;
    use unixrpc_core::ResultType;

    #[test]
    fn test_router_basic() {
        let mut router = Router::new();
        router.register(
            "answer",
            from_fn(|_| Ok(Dispatched::new(42.0, ResultType::Int))),
        );

        assert!(router.has_method("answer"));
        assert!(!router.has_method("unknown"));

        let out = router.dispatch("answer", &[]).unwrap();
        assert_eq!(out.value, Value::Number(42.0));
    }

    #[test]
    fn test_router_unknown_method() {
        let router = Router::new();
        let err = router.dispatch("missing", &[]).unwrap_err();
        assert_eq!(err.to_string(), "unknown method: missing");
    }

    #[test]
    fn test_lookup_is_exact() {
        let router = Router::with_builtins();
        assert!(router.has_method("validAnagram"));
        assert!(!router.has_method("validanagram"));
        assert!(!router.has_method("sort "));
    }

    #[test]
    fn test_builtin_methods_listed() {
        let router = Router::with_builtins();
        assert_eq!(
            router.methods(),
            vec!["floor", "nroot", "reverse", "sort", "validAnagram"]
        );
    }

    #[test]
    fn test_register_after_clone_does_not_leak() {
        let base = Router::with_builtins();
        let mut extended = base.clone();
        extended.register("echo", from_fn(|p| Ok(Dispatched::new(p.len() as f64, ResultType::Int))));

        assert!(extended.has_method("echo"));
        assert!(!base.has_method("echo"));
    }

    #[test]
    fn test_router_builder() {
        let router = RouterBuilder::with_builtins()
            .handler("yes", from_fn(|_| Ok(Dispatched::new(true, ResultType::Bool))))
            .build();

        assert!(router.has_method("floor"));
        let out = router.dispatch("yes", &[]).unwrap();
        assert_eq!(out.value, Value::Boolean(true));
    }
}

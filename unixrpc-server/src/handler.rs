//! Handler trait for named methods
//!
//! A handler receives the positional parameters of one request and returns
//! either a [`Dispatched`] result or a call-level error. Handlers run inline
//! in the session task that owns the connection, so they are plain
//! synchronous functions: no I/O, no shared mutable state, deterministic for
//! a given input.
//!
//! # Examples
//!
//! ```rust
//! use unixrpc_core::{Dispatched, Error, ResultType, Value};
//! use unixrpc_server::{from_fn, Handler};
//!
//! let handler = from_fn(|params| match params {
//!     [Value::Boolean(b)] => Ok(Dispatched::new(!b, ResultType::Bool)),
//!     _ => Err(Error::validation("argument must be a boolean")),
//! });
//!
//! let out = handler.call(&[Value::from(true)]).unwrap();
//! assert_eq!(out.value, Value::from(false));
//! ```

use unixrpc_core::{Dispatched, Result, Value};

/// Trait for method handlers
///
/// `Send + Sync` because one router is shared by every session task.
pub trait Handler: Send + Sync {
    /// Validate `params` and compute the result.
    ///
    /// Validation failures must come back as [`unixrpc_core::Error::Validation`],
    /// never as a panic.
    fn call(&self, params: &[Value]) -> Result<Dispatched>;
}

/// Adapter that turns a closure into a [`Handler`]
pub struct FnHandler<F>
where
    F: Fn(&[Value]) -> Result<Dispatched> + Send + Sync,
{
    func: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&[Value]) -> Result<Dispatched> + Send + Sync,
{
    /// Wrap `func`.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&[Value]) -> Result<Dispatched> + Send + Sync,
{
    fn call(&self, params: &[Value]) -> Result<Dispatched> {
        (self.func)(params)
    }
}

/// Create a boxed handler from a function or closure
///
/// Plain `fn` items work too, which is how the built-in methods are
/// registered.
pub fn from_fn<F>(func: F) -> Box<dyn Handler>
where
    F: Fn(&[Value]) -> Result<Dispatched> + Send + Sync + 'static,
{
    Box::new(FnHandler::new(func))
}

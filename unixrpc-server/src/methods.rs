//! Built-in methods
//!
//! Each method checks its argument count and argument kinds before
//! computing anything, and reports problems as [`Error::Validation`].
//!
//! | method | params | result_type |
//! |---|---|---|
//! | `floor` | number | `int` |
//! | `nroot` | n, x | `float` |
//! | `reverse` | string | `string` |
//! | `validAnagram` | string, string | `bool` |
//! | `sort` | string, ... | `string[]` |

use crate::handler::from_fn;
use crate::router::Router;
use std::collections::HashMap;
use unixrpc_core::{Dispatched, Error, Result, ResultType, Value};

/// Register every built-in method on `router`.
pub fn register_builtins(router: &mut Router) {
    router.register("floor", from_fn(floor));
    router.register("nroot", from_fn(nroot));
    router.register("reverse", from_fn(reverse));
    router.register("validAnagram", from_fn(valid_anagram));
    router.register("sort", from_fn(sort));
}

fn expect_arity(params: &[Value], expected: usize) -> Result<()> {
    if params.len() != expected {
        return Err(Error::validation(format!(
            "invalid number of arguments: expected {}, got {}",
            expected,
            params.len()
        )));
    }
    Ok(())
}

/// Largest integer not greater than the argument.
///
/// Tagged `int` even though the value stays an `f64`.
pub fn floor(params: &[Value]) -> Result<Dispatched> {
    expect_arity(params, 1)?;
    match &params[0] {
        Value::Number(x) => Ok(Dispatched::new(x.floor(), ResultType::Int)),
        other => Err(Error::validation(format!(
            "argument must be a number, got {}",
            other.kind()
        ))),
    }
}

/// The `n`th root of `x`, computed as `x^(1/n)`.
pub fn nroot(params: &[Value]) -> Result<Dispatched> {
    expect_arity(params, 2)?;
    let (n, x) = match (&params[0], &params[1]) {
        (Value::Number(n), Value::Number(x)) => (*n, *x),
        _ => return Err(Error::validation("arguments must be numbers")),
    };
    if n <= 0.0 {
        return Err(Error::validation("root degree n must be greater than zero"));
    }
    if x < 0.0 {
        return Err(Error::validation("radicand x must not be negative"));
    }

    let root = x.powf(1.0 / n);
    // A tiny degree can overflow, and infinity has no JSON encoding.
    if !root.is_finite() {
        return Err(Error::validation("result is not a finite number"));
    }
    Ok(Dispatched::new(root, ResultType::Float))
}

/// The argument with its Unicode code points in reverse order.
pub fn reverse(params: &[Value]) -> Result<Dispatched> {
    expect_arity(params, 1)?;
    match &params[0] {
        Value::Text(s) => Ok(Dispatched::new(
            s.chars().rev().collect::<String>(),
            ResultType::String,
        )),
        other => Err(Error::validation(format!(
            "argument must be a string, got {}",
            other.kind()
        ))),
    }
}

fn char_counts(s: &str) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}

/// Whether both strings use exactly the same code points the same number of
/// times. Case and whitespace count.
pub fn valid_anagram(params: &[Value]) -> Result<Dispatched> {
    expect_arity(params, 2)?;
    match (&params[0], &params[1]) {
        (Value::Text(a), Value::Text(b)) => Ok(Dispatched::new(
            char_counts(a) == char_counts(b),
            ResultType::Bool,
        )),
        _ => Err(Error::validation("arguments must be strings")),
    }
}

/// All parameters in ascending lexicographic order.
pub fn sort(params: &[Value]) -> Result<Dispatched> {
    if params.is_empty() {
        return Err(Error::validation("params cannot be empty"));
    }

    let mut words = params
        .iter()
        .map(|p| match p {
            Value::Text(s) => Ok(s.clone()),
            _ => Err(Error::validation("all elements in params must be strings")),
        })
        .collect::<Result<Vec<String>>>()?;
    words.sort();

    Ok(Dispatched::new(words, ResultType::StringArray))
}

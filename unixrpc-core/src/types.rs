//! Message types and the dynamic value model
//!
//! Requests carry positional parameters of mixed kinds, and responses carry a
//! result whose shape depends on the method. Both use [`Value`], a closed
//! tagged variant that every handler pattern-matches on.
//!
//! # Numbers
//!
//! The wire format does not distinguish integers from fractions, so every
//! JSON number decodes to [`Value::Number`] holding an `f64`. When encoding,
//! integral numbers are written without a fractional part (`3`, not `3.0`),
//! which keeps the output identical to what existing peers produce.
//!
//! # Result type tags
//!
//! A [`Response`] names the shape of its `results` with a [`ResultType`]. The
//! tag is advisory for the caller: `floor` reports `"int"` even though the
//! value itself is a floating point number.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A dynamically typed parameter or result
///
/// JSON `null` and JSON objects have no variant; input containing them fails
/// to decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Any JSON number
    Number(f64),
    /// UTF-8 text
    Text(String),
    /// `true` or `false`
    Boolean(bool),
    /// Ordered sequence of values
    Sequence(Vec<Value>),
}

impl Value {
    /// Returns the number if this value is numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text if this value is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the flag if this value is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the items if this value is a sequence.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Human-readable name of the variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::Boolean(_) => "bool",
            Value::Sequence(_) => "sequence",
        }
    }
}

fn is_integral(n: f64) -> bool {
    n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) if is_integral(*n) => serializer.serialize_i64(*n as i64),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Sequence(items) => serializer.collect_seq(items),
        }
    }
}

impl fmt::Display for Value {
    /// Plain rendering for terminal output: text unquoted, integral numbers
    /// without a fraction, sequences as `[a b c]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) if is_integral(*n) => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

/// Tag naming the shape of a response's `results`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultType {
    /// `"int"`
    Int,
    /// `"float"`
    Float,
    /// `"string"`
    String,
    /// `"bool"`
    Bool,
    /// `"string[]"`
    StringArray,
}

impl ResultType {
    /// Wire spelling of the tag.
    pub fn as_str(self) -> &'static str {
        match self {
            ResultType::Int => "int",
            ResultType::Float => "float",
            ResultType::String => "string",
            ResultType::Bool => "bool",
            ResultType::StringArray => "string[]",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "int" => Ok(ResultType::Int),
            "float" => Ok(ResultType::Float),
            "string" => Ok(ResultType::String),
            "bool" => Ok(ResultType::Bool),
            "string[]" => Ok(ResultType::StringArray),
            other => Err(format!("unknown result type: {}", other)),
        }
    }
}

// On the wire a failed call carries `"result_type": ""`.
mod result_type_tag {
    use super::*;

    pub fn serialize<S: Serializer>(
        tag: &Option<ResultType>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(tag.map(ResultType::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<ResultType>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(de::Error::custom)
    }
}

/// The successful outcome of a dispatched call
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    /// Computed result
    pub value: Value,
    /// Shape tag reported to the caller
    pub result_type: ResultType,
}

impl Dispatched {
    /// Pair a value with its result type tag.
    pub fn new(value: impl Into<Value>, result_type: ResultType) -> Self {
        Self {
            value: value.into(),
            result_type,
        }
    }
}

/// A call to a named method with positional parameters
///
/// `id` is chosen by the sender and echoed back unchanged; nothing enforces
/// uniqueness or ordering.
///
/// # Examples
///
/// ```rust
/// use unixrpc_core::{Request, Value};
///
/// let req = Request::new("reverse", vec![Value::from("hello")], 7)
///     .with_param_types(["string"]);
/// assert_eq!(req.param_types, vec!["string".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Name of the method to invoke
    pub method: String,
    /// Positional parameters; absent or `null` reads as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub params: Vec<Value>,
    /// Advisory parameter type names, never consulted by the server
    #[serde(default, deserialize_with = "null_as_empty")]
    pub param_types: Vec<String>,
    /// Correlation token
    pub id: i64,
}

/// Read a JSON `null` list the same as an empty one.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Request {
    /// Create a request with no parameter type annotations.
    pub fn new(method: impl Into<String>, params: Vec<Value>, id: i64) -> Self {
        Self {
            method: method.into(),
            params,
            param_types: Vec::new(),
            id,
        }
    }

    /// Attach advisory parameter type names.
    pub fn with_param_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.param_types = types.into_iter().map(Into::into).collect();
        self
    }
}

/// The reply to exactly one [`Request`]
///
/// Either `results` and `result_type` are populated, or `error` is. The `id`
/// always matches the originating request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Result value, `null` on the wire when the call failed
    #[serde(default)]
    pub results: Option<Value>,
    /// Shape of `results`, empty on the wire when the call failed
    #[serde(default, with = "result_type_tag")]
    pub result_type: Option<ResultType>,
    /// Copied from the request
    pub id: i64,
    /// Failure description, omitted from the wire on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Build a successful response.
    pub fn success(dispatched: Dispatched, id: i64) -> Self {
        Self {
            results: Some(dispatched.value),
            result_type: Some(dispatched.result_type),
            id,
            error: None,
        }
    }

    /// Build a failed response carrying `message`.
    pub fn failure(message: impl Into<String>, id: i64) -> Self {
        Self {
            results: None,
            result_type: None,
            id,
            error: Some(message.into()),
        }
    }

    /// Build the response for a dispatch outcome.
    ///
    /// Call-level errors are prefixed the same way for every method, so
    /// clients see `Error executing method: unknown method: foo`.
    pub fn from_outcome(outcome: crate::Result<Dispatched>, id: i64) -> Self {
        match outcome {
            Ok(dispatched) => Self::success(dispatched, id),
            Err(e) => Self::failure(format!("Error executing method: {}", e), id),
        }
    }

    /// True when the call succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// True when the call failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

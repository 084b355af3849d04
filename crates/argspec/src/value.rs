//! Runtime values produced by conversion functions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A converted argument value.
///
/// Options and positionals carry a [`ValueParser`] that turns the raw token
/// into one of these variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

type ConvertFn = dyn Fn(&str) -> Result<Value, String> + Send + Sync;

/// Conversion function applied to a raw token (`string -> T`).
///
/// Cloning is cheap; specifications share parsers between copies.
#[derive(Clone)]
pub struct ValueParser {
    kind: &'static str,
    convert: Arc<ConvertFn>,
}

impl ValueParser {
    /// Keep the token as-is.
    pub fn string() -> Self {
        Self::named("string", |s| Ok(Value::String(s.to_string())))
    }

    pub fn integer() -> Self {
        Self::named("integer", |s| {
            s.parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| e.to_string())
        })
    }

    pub fn float() -> Self {
        Self::named("float", |s| {
            s.parse::<f64>().map(Value::Float).map_err(|e| e.to_string())
        })
    }

    /// Accepts `true` or `false`.
    pub fn boolean() -> Self {
        Self::named("boolean", |s| {
            s.parse::<bool>().map(Value::Bool).map_err(|e| e.to_string())
        })
    }

    /// Wrap an arbitrary conversion. An `Err` becomes an invalid-value parse failure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::named("custom", f)
    }

    fn named<F>(kind: &'static str, f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            kind,
            convert: Arc::new(f),
        }
    }

    pub fn parse(&self, raw: &str) -> Result<Value, String> {
        (self.convert)(raw)
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl Default for ValueParser {
    fn default() -> Self {
        Self::string()
    }
}

impl fmt::Debug for ValueParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueParser").field(&self.kind).finish()
    }
}

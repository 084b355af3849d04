use crate::value::Value;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// The value recorded for one option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// A boolean option that was given.
    Flag,
    Scalar(Value),
    List(Vec<Value>),
}

// Flags serialize as `true` so dumps read like the values a caller sees.
impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Flag => serializer.serialize_bool(true),
            Self::Scalar(v) => v.serialize(serializer),
            Self::List(values) => values.serialize(serializer),
        }
    }
}

/// Structured result of a successful scan, handed to the action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Parsed {
    positionals: IndexMap<String, Value>,
    extra: Vec<Value>,
    options: IndexMap<String, OptionValue>,
}

impl Parsed {
    pub(crate) fn new(
        positionals: IndexMap<String, Value>,
        extra: Vec<Value>,
        options: IndexMap<String, OptionValue>,
    ) -> Self {
        Self {
            positionals,
            extra,
            options,
        }
    }

    /// Value of a positional by name; `None` for an optional one not given.
    pub fn positional(&self, name: &str) -> Option<&Value> {
        self.positionals.get(name)
    }

    /// Given positionals in declaration order.
    pub fn positionals(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.positionals.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Values collected by the extra sink.
    pub fn extra(&self) -> &[Value] {
        &self.extra
    }

    /// Whether a boolean option was given.
    pub fn flag(&self, long: &str) -> bool {
        matches!(self.options.get(long), Some(OptionValue::Flag))
    }

    pub fn scalar(&self, long: &str) -> Option<&Value> {
        match self.options.get(long) {
            Some(OptionValue::Scalar(v)) => Some(v),
            _ => None,
        }
    }

    /// Accumulated values of a list option; empty if never given.
    pub fn list(&self, long: &str) -> &[Value] {
        match self.options.get(long) {
            Some(OptionValue::List(values)) => values,
            _ => &[],
        }
    }

    pub fn option(&self, long: &str) -> Option<&OptionValue> {
        self.options.get(long)
    }

    pub fn options(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v))
    }
}

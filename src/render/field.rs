//! Field definitions and the modifier pipeline applied to extracted values.

use super::path::FieldPath;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

pub type ValueFn = dyn Fn(&Value) -> Value + Send + Sync;
pub type ListFn = dyn Fn(Vec<Value>) -> Vec<Value> + Send + Sync;

/// Transform applied to the values a field extracts.
#[derive(Clone)]
pub enum Modifier {
    /// Applied to each extracted value independently, `null` included.
    Value(Arc<ValueFn>),
    /// Applied once to the whole extracted sequence.
    List(Arc<ListFn>),
}

impl Modifier {
    pub fn value<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Modifier::Value(Arc::new(f))
    }

    pub fn list<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Vec<Value> + Send + Sync + 'static,
    {
        Modifier::List(Arc::new(f))
    }

    fn apply(&self, values: Vec<Value>) -> Vec<Value> {
        match self {
            Modifier::List(f) => f(values),
            Modifier::Value(f) => values.iter().map(|v| f(v)).collect(),
        }
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Value(_) => f.write_str("Modifier::Value(..)"),
            Modifier::List(_) => f.write_str("Modifier::List(..)"),
        }
    }
}

/// One labelled column (or row, in vertical layouts).
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub label: String,
    pub path: FieldPath,
    pub separator: String,
    pub modifier: Option<Modifier>,
}

impl FieldSpec {
    pub const DEFAULT_SEPARATOR: &'static str = "\n";

    pub fn new(label: impl Into<String>, path: &str) -> Self {
        let label = label.into();
        let path = FieldPath::parse(path).unwrap_or_else(|e| {
            warn!(field = %label, error = %e, "Invalid field path, field will render empty");
            FieldPath::unresolvable(path)
        });
        Self {
            label,
            path,
            separator: Self::DEFAULT_SEPARATOR.to_string(),
            modifier: None,
        }
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Per-value transform. Replaces any list modifier.
    pub fn map<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.modifier = Some(Modifier::value(f));
        self
    }

    /// Whole-sequence transform. Replaces any value modifier.
    pub fn map_list<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Vec<Value> + Send + Sync + 'static,
    {
        self.modifier = Some(Modifier::list(f));
        self
    }

    /// Extracted values after the modifier, in display form.
    pub fn display_values(&self, record: &Value) -> Vec<String> {
        let values = self.path.extract(record);
        let values = match &self.modifier {
            Some(modifier) => modifier.apply(values),
            None => values,
        };
        values.iter().map(display).collect()
    }

    /// Final cell text: display values joined with the separator.
    pub fn render(&self, record: &Value) -> String {
        self.display_values(record).join(&self.separator)
    }
}

/// Display form of a single value.
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

//! Cell values
//!
//! A cell holds one JSON value, represented as a tagged union so coercion and
//! rendering are exhaustive matches instead of runtime type inspection.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One record: column name to value, in insertion order
pub type Row = IndexMap<String, CellValue>;

/// Largest integer an f64 holds exactly (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum CellValue {
    #[default]
    Null,
    Text(String),
    Number(f64),
    Boolean(bool),
    List(Vec<CellValue>),
    Object(Row),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text, number, boolean or null
    pub fn is_primitive(&self) -> bool {
        !matches!(self, CellValue::List(_) | CellValue::Object(_))
    }

    /// Values that can only be edited through a nested editor: plain objects,
    /// and lists holding at least one list or object.
    pub fn is_complex(&self) -> bool {
        match self {
            CellValue::Object(_) => true,
            CellValue::List(items) => items.iter().any(|item| !item.is_primitive()),
            _ => false,
        }
    }

    /// String form used for sorting and for object keys, following JS `String(v)`
    /// for primitives and lists. Objects render as compact JSON.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Text(text) => text.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::List(items) => items
                .iter()
                .map(CellValue::display_text)
                .collect::<Vec<_>>()
                .join(","),
            CellValue::Object(_) => Value::from(self.clone()).to_string(),
        }
    }
}

/// Render a finite number the way JS `String(n)` does: shortest digits,
/// integral values without a fractional part, negative zero as `0`, and
/// exponent form (`1e+21`, `1e-7`) outside `[1e-6, 1e21)`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let text = format!("{:e}", n);
        return match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        };
    }
    format!("{}", n)
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Boolean(b),
            Value::Number(n) => n.as_f64().map_or(CellValue::Null, CellValue::Number),
            Value::String(s) => CellValue::Text(s),
            Value::Array(items) => CellValue::List(items.into_iter().map(CellValue::from).collect()),
            Value::Object(map) => CellValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, CellValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<CellValue> for Value {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Null => Value::Null,
            CellValue::Boolean(b) => Value::Bool(b),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
                    Value::from(n as i64)
                } else {
                    serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
                }
            }
            CellValue::Text(s) => Value::String(s),
            CellValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            CellValue::Object(row) => Value::Object(
                row.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_string())
    }
}

impl From<String> for CellValue {
    fn from(text: String) -> Self {
        CellValue::Text(text)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

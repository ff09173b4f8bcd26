//! Dynamically typed step values.

use serde::{Deserialize, Serialize};

/// A value carried by an input: a number, a flag or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Numeric value (volumes, demands, temperatures, ...).
    Number(f64),
    /// Boolean flag.
    Flag(bool),
    /// Free text.
    Text(String),
}

impl Value {
    /// Returns the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            _ => None,
        }
    }

    /// Renders the value with numbers rounded to `digits` decimal places.
    pub fn display(&self, digits: u32) -> String {
        match self {
            Value::Number(x) => round(*x, digits).to_string(),
            Value::Flag(b) => b.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

/// Rounds `x` to `digits` decimal places. NaN and infinities pass through.
pub fn round(x: f64, digits: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let scale = 10f64.powi(digits as i32);
    let r = (x * scale).round() / scale;
    // Avoid rendering "-0".
    if r == 0.0 { 0.0 } else { r }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Flag(b)
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

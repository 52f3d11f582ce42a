//! # Structural Equality
//!
//! Deep comparison of JSON values as a dynamically typed runtime would
//! see them: numbers compare by numeric value (`1` equals `1.0`), arrays
//! element-wise, objects by key set and per-key value.
//!
//! `serde_json::Value`'s own `PartialEq` distinguishes integer from float
//! representations, which is why this exists.

use serde_json::Value;

/// Whether two JSON values are structurally equal.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

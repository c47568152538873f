//! Conversion from host JSON data to template values.

use hilt_types::Value;

/// Convert a JSON value into a template [`Value`].
///
/// Strings, numbers, booleans and arrays of those are accepted. `null`,
/// objects and unsigned integers past `i64::MAX` are rejected with a reason.
pub fn from_json(json: &serde_json::Value) -> Result<Value, String> {
    match json {
        serde_json::Value::String(s) => Ok(Value::String(s.clone())),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if n.is_f64() {
                n.as_f64()
                    .map(Value::Float)
                    .ok_or_else(|| format!("number {n} is not representable"))
            } else {
                Err(format!("integer {n} is out of range"))
            }
        }
        serde_json::Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| from_json(item).map_err(|reason| format!("[{i}]: {reason}")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        serde_json::Value::Null => Err("null is not a supported value".to_string()),
        serde_json::Value::Object(_) => Err("objects are not supported".to_string()),
    }
}

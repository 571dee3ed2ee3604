//! Position samples arriving as JSON (`{"intro": -40, "setup": 310.5}`).

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{Result, TocError};

/// Parse a JSON object of heading id to viewport offset. `null` entries mean
/// "not measurable" and are left out.
pub fn positions_from_json(value: &Value) -> Result<HashMap<String, f64>> {
    let Value::Object(map) = value else {
        return Err(TocError::InvalidPositions {
            reason: format!("expected an object of id -> offset, got {}", kind(value)),
        });
    };

    let mut positions = HashMap::with_capacity(map.len());
    for (id, v) in map {
        match v {
            Value::Null => {}
            Value::Number(n) => {
                let Some(offset) = n.as_f64() else {
                    return Err(TocError::InvalidPositions {
                        reason: format!("offset for {id:?} is out of range"),
                    });
                };
                positions.insert(id.clone(), offset);
            }
            other => {
                return Err(TocError::InvalidPositions {
                    reason: format!("offset for {id:?} must be a number, got {}", kind(other)),
                });
            }
        }
    }
    Ok(positions)
}

/// Parse positions from JSON text.
pub fn positions_from_str(text: &str) -> Result<HashMap<String, f64>> {
    let value: Value = serde_json::from_str(text)?;
    positions_from_json(&value)
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_and_nulls() {
        let p = positions_from_str(r#"{"a": -30, "b": 90.5, "c": null}"#).unwrap();
        assert_eq!(p.get("a"), Some(&-30.0));
        assert_eq!(p.get("b"), Some(&90.5));
        assert!(!p.contains_key("c"));
    }

    #[test]
    fn non_object_rejected() {
        let err = positions_from_str("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn string_offset_rejected() {
        let err = positions_from_str(r#"{"a": "10px"}"#).unwrap_err();
        assert!(matches!(err, TocError::InvalidPositions { .. }));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = positions_from_str("{").unwrap_err();
        assert!(matches!(err, TocError::Json(_)));
    }
}

//! JSON parser (RFC 8259).

use crate::error::ParseError;
use crate::value::{Number, Value};
use crate::{Result, ValueMap};

use super::Parser;

/// Parser for JSON input.
///
/// Numbers without a fractional part or exponent that fit `i64` become
/// [`Number::Integer`]; everything else becomes [`Number::Float`]. Object
/// key order follows first occurrence; a duplicate key replaces the value
/// but keeps the original position.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn parse(&self, input: &[u8]) -> Result<Value> {
        let json_value: serde_json::Value =
            serde_json::from_slice(input).map_err(|e| convert_error(&e, input))?;
        Ok(convert_json_value(json_value))
    }
}

/// Translate a serde_json error, recovering the byte offset from its
/// line/column coordinates.
fn convert_error(err: &serde_json::Error, input: &[u8]) -> ParseError {
    match byte_offset(input, err.line(), err.column()) {
        Some(offset) => ParseError::at_offset("json", offset, err.to_string()),
        None => ParseError::new("json", err.to_string()),
    }
}

/// Byte offset of a 1-based (line, column) position.
fn byte_offset(input: &[u8], line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let mut offset = 0usize;
    let mut remaining = line - 1;
    while remaining > 0 {
        let nl = input[offset..].iter().position(|&b| b == b'\n')?;
        offset += nl + 1;
        remaining -= 1;
    }
    Some(offset + column.saturating_sub(1))
}

/// Convert a `serde_json::Value` (parsed with `preserve_order`) into the
/// crate's own value tree.
fn convert_json_value(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(convert_number(&n)),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            Value::Array(arr.into_iter().map(convert_json_value).collect())
        }
        serde_json::Value::Object(obj) => {
            let mut map = ValueMap::with_capacity(obj.len());
            for (k, v) in obj {
                map.insert(k, convert_json_value(v));
            }
            Value::Object(map)
        }
    }
}

/// Integers in `i64` range stay integers; everything else (floats,
/// exponent forms, out-of-range integers) promotes to float. The
/// promotion is one-way.
fn convert_number(n: &serde_json::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::Integer(i)
    } else {
        Number::Float(n.as_f64().unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_object() {
        let parser = JsonParser;
        let input = br#"{"name": "Alice", "age": 30}"#;
        let result = parser.parse(input).unwrap();

        assert!(result.is_object());
        assert_eq!(result.get("name").and_then(Value::as_str), Some("Alice"));
        assert_eq!(result.get("age").and_then(Value::as_i64), Some(30));
    }

    #[test]
    fn parse_preserves_key_order() {
        let parser = JsonParser;
        let input = br#"{"zebra": 1, "apple": 2, "mango": 3}"#;
        let result = parser.parse(input).unwrap();

        let keys: Vec<_> = result
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn duplicate_key_last_wins_position_kept() {
        let parser = JsonParser;
        let input = br#"{"a": 1, "b": 2, "a": 3}"#;
        let result = parser.parse(input).unwrap();

        let obj = result.as_object().unwrap();
        let keys: Vec<_> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(obj.get("a").and_then(Value::as_i64), Some(3));
    }

    #[test]
    fn number_typing() {
        let parser = JsonParser;
        let result = parser.parse(b"[1, 1.0, 1e3, 9223372036854775807, 9223372036854775808]").unwrap();
        let arr = result.as_array().unwrap();

        assert_eq!(arr[0], Value::Number(Number::Integer(1)));
        assert_eq!(arr[1], Value::Number(Number::Float(1.0)));
        assert_eq!(arr[2], Value::Number(Number::Float(1000.0)));
        assert_eq!(arr[3], Value::Number(Number::Integer(i64::MAX)));
        // One past i64::MAX promotes to float
        assert!(matches!(arr[4], Value::Number(Number::Float(_))));
    }

    #[test]
    fn parse_invalid_json_reports_offset() {
        let parser = JsonParser;
        let err = parser.parse(b"{\"a\": }").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("json parse error"));
        assert!(msg.contains("at byte"));
    }

    #[test]
    fn parse_nested() {
        let parser = JsonParser;
        let input = br#"{"users": [{"id": 1}, {"id": 2}]}"#;
        let result = parser.parse(input).unwrap();

        let users = result.get("users").and_then(Value::as_array).unwrap();
        assert_eq!(users.len(), 2);
    }
}

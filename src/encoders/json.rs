//! Compact JSON encoder (RFC 8259, no whitespace).

use crate::value::{Number, Value};
use crate::{Result, ValueMap};

use super::{Encoded, Encoder};

/// Encoder for compact JSON.
///
/// Keys are emitted in insertion order unless `sort_keys` is set. Floats
/// keep a fractional part (`3.0`, not `3`) so a round-trip through the
/// JSON parser reproduces the integer/float distinction; non-finite
/// floats become `null`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEncoder {
    sort_keys: bool,
}

impl JsonEncoder {
    /// Creates a JSON encoder.
    #[must_use]
    pub const fn new(sort_keys: bool) -> Self {
        JsonEncoder { sort_keys }
    }

    fn write_value(&self, value: &Value, out: &mut String) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => write_number(n, out),
            Value::String(s) => write_string(s, out),
            Value::Array(arr) => self.write_array(arr, out),
            Value::Object(obj) => self.write_object(obj, out),
        }
    }

    fn write_array(&self, arr: &[Value], out: &mut String) {
        out.push('[');
        for (i, item) in arr.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.write_value(item, out);
        }
        out.push(']');
    }

    fn write_object(&self, obj: &ValueMap, out: &mut String) {
        out.push('{');
        if self.sort_keys {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                if let Some(value) = obj.get(key) {
                    self.write_value(value, out);
                }
            }
        } else {
            for (i, (key, value)) in obj.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                self.write_value(value, out);
            }
        }
        out.push('}');
    }
}

fn write_number(n: &Number, out: &mut String) {
    match n {
        Number::Integer(i) => out.push_str(&i.to_string()),
        Number::Float(f) => {
            if f.is_finite() {
                // Rust's Display is already shortest-round-trip; it just
                // drops the fraction on whole numbers, which would turn a
                // float back into an integer on reparse.
                let s = f.to_string();
                out.push_str(&s);
                if !s.contains('.') {
                    out.push_str(".0");
                }
            } else {
                out.push_str("null");
            }
        }
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out.push('"');
}

impl Encoder for JsonEncoder {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, value: &Value) -> Result<Encoded> {
        let mut out = String::with_capacity(256);
        self.write_value(value, &mut out);
        Ok(Encoded::clean(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    fn encode(value: &Value) -> String {
        JsonEncoder::new(false).encode(value).unwrap().text
    }

    #[test]
    fn primitives() {
        assert_eq!(encode(&Value::Null), "null");
        assert_eq!(encode(&Value::Bool(true)), "true");
        assert_eq!(encode(&Value::from(42)), "42");
        assert_eq!(encode(&Value::from(-17)), "-17");
        assert_eq!(encode(&Value::from(3.25)), "3.25");
    }

    #[test]
    fn whole_floats_keep_their_fraction() {
        assert_eq!(encode(&Value::from(3.0)), "3.0");
        assert_eq!(encode(&Value::from(-1.0)), "-1.0");
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(encode(&Value::from(f64::NAN)), "null");
        assert_eq!(encode(&Value::from(f64::INFINITY)), "null");
    }

    #[test]
    fn string_escaping() {
        assert_eq!(encode(&Value::from("hello")), r#""hello""#);
        assert_eq!(encode(&Value::from("has\"quote")), r#""has\"quote""#);
        assert_eq!(encode(&Value::from("line1\nline2")), r#""line1\nline2""#);
        assert_eq!(encode(&Value::from("\u{1}")), "\"\\u0001\"");
    }

    #[test]
    fn containers_are_compact_and_ordered() {
        let data = value!({"zebra": 1, "apple": [1, 2], "nested": {"x": true}});
        assert_eq!(
            encode(&data),
            r#"{"zebra":1,"apple":[1,2],"nested":{"x":true}}"#
        );
    }

    #[test]
    fn sort_keys_option() {
        let data = value!({"zebra": 1, "apple": 2, "mango": 3});
        let sorted = JsonEncoder::new(true).encode(&data).unwrap().text;
        assert_eq!(sorted, r#"{"apple":2,"mango":3,"zebra":1}"#);
    }

    #[test]
    fn empty_containers() {
        assert_eq!(encode(&value!({})), "{}");
        assert_eq!(encode(&value!([])), "[]");
    }
}

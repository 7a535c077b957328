//! YAML encoder (block style, two-space indent, minimal quoting).

use crate::value::{Number, Value};
use crate::{Result, ValueMap};

use super::{Encoded, Encoder};

/// Encoder for YAML output.
///
/// Scalars are left bare unless quoting is needed to keep them strings on
/// reparse: reserved words (`true`/`null`/`yes`/`off`…), numeric
/// lookalikes, reserved indicator characters, control characters, edge
/// whitespace, and `: ` / ` #` sequences all force double quotes.
/// Multi-line strings use the literal block style. Keys are emitted in
/// insertion order.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlEncoder;

impl YamlEncoder {
    /// Creates a YAML encoder.
    #[must_use]
    pub const fn new() -> Self {
        YamlEncoder
    }

    /// Write one `key: value` pair per line at `level`. With
    /// `first_inline`, the first pair continues the current line (it
    /// follows a `- ` marker).
    fn write_object_block(
        &self,
        obj: &ValueMap,
        out: &mut String,
        level: usize,
        first_inline: bool,
    ) {
        for (i, (key, value)) in obj.iter().enumerate() {
            if i > 0 || !first_inline {
                push_indent(out, level);
            }
            write_scalar_token(&quote_if_needed(key), out);
            out.push(':');
            self.write_pair_value(value, out, level);
        }
    }

    /// Write the value side of a pair; the cursor sits right after `:`.
    fn write_pair_value(&self, value: &Value, out: &mut String, level: usize) {
        match value {
            Value::Object(obj) if obj.is_empty() => out.push_str(" {}\n"),
            Value::Array(arr) if arr.is_empty() => out.push_str(" []\n"),
            Value::Object(obj) => {
                out.push('\n');
                self.write_object_block(obj, out, level + 1, false);
            }
            Value::Array(arr) => {
                out.push('\n');
                self.write_array_block(arr, out, level + 1, false);
            }
            Value::String(s) if s.contains('\n') => {
                out.push(' ');
                write_literal_block(s, out, level + 1);
            }
            other => {
                out.push(' ');
                write_scalar(other, out);
                out.push('\n');
            }
        }
    }

    /// Write `- item` lines at `level`. With `first_inline`, the first
    /// item continues the current line (nested sequences).
    fn write_array_block(
        &self,
        arr: &[Value],
        out: &mut String,
        level: usize,
        first_inline: bool,
    ) {
        for (i, item) in arr.iter().enumerate() {
            if i > 0 || !first_inline {
                push_indent(out, level);
            }
            out.push_str("- ");
            match item {
                Value::Object(obj) if obj.is_empty() => out.push_str("{}\n"),
                Value::Array(inner) if inner.is_empty() => out.push_str("[]\n"),
                Value::Object(obj) => {
                    self.write_object_block(obj, out, level + 1, true);
                }
                Value::Array(inner) => {
                    self.write_array_block(inner, out, level + 1, true);
                }
                Value::String(s) if s.contains('\n') => {
                    write_literal_block(s, out, level + 1);
                }
                other => {
                    write_scalar(other, out);
                    out.push('\n');
                }
            }
        }
    }
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

/// Literal block scalar: `|` keeps the trailing newline, `|-` strips it.
fn write_literal_block(s: &str, out: &mut String, level: usize) {
    out.push_str(if s.ends_with('\n') { "|" } else { "|-" });
    out.push('\n');
    for line in s.lines() {
        push_indent(out, level);
        out.push_str(line);
        out.push('\n');
    }
}

fn write_scalar(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(n, out),
        Value::String(s) => write_scalar_token(&quote_if_needed(s), out),
        // Containers never reach here; the block writers intercept them.
        Value::Array(_) | Value::Object(_) => out.push_str("null"),
    }
}

fn write_number(n: &Number, out: &mut String) {
    match n {
        Number::Integer(i) => out.push_str(&i.to_string()),
        Number::Float(f) => {
            if f.is_finite() {
                let s = f.to_string();
                out.push_str(&s);
                if !s.contains('.') {
                    out.push_str(".0");
                }
            } else if f.is_nan() {
                out.push_str(".nan");
            } else if f.is_sign_positive() {
                out.push_str(".inf");
            } else {
                out.push_str("-.inf");
            }
        }
    }
}

enum Token {
    Bare(String),
    Quoted(String),
}

fn write_scalar_token(token: &Token, out: &mut String) {
    match token {
        Token::Bare(s) => out.push_str(s),
        Token::Quoted(s) => {
            out.push('"');
            for c in s.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\t' => out.push_str("\\t"),
                    '\r' => out.push_str("\\r"),
                    '\n' => out.push_str("\\n"),
                    c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
                    _ => out.push(c),
                }
            }
            out.push('"');
        }
    }
}

fn quote_if_needed(s: &str) -> Token {
    if needs_quoting(s) {
        Token::Quoted(s.to_string())
    } else {
        Token::Bare(s.to_string())
    }
}

/// A scalar is quoted iff leaving it bare would change its meaning on
/// reparse.
fn needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }

    // Reserved words that would reparse as bool/null.
    let lower = s.to_lowercase();
    if matches!(
        lower.as_str(),
        "true" | "false" | "null" | "yes" | "no" | "on" | "off" | "~"
    ) {
        return true;
    }

    // Numeric lookalikes would reparse as numbers.
    if s.parse::<f64>().is_ok() {
        return true;
    }

    // Reserved indicators at the start of a plain scalar.
    if let Some(first) = s.chars().next() {
        if matches!(
            first,
            '-' | '?' | ':' | ',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>'
                | '\'' | '"' | '%' | '@' | '`' | '~'
        ) {
            return true;
        }
    }

    // Control characters need escape sequences.
    if s.chars().any(char::is_control) {
        return true;
    }

    // Leading or trailing whitespace would be trimmed by the parser.
    if s != s.trim() {
        return true;
    }

    // Mapping and comment introducers inside the scalar.
    s.contains(": ") || s.ends_with(':') || s.contains(" #")
}

impl Encoder for YamlEncoder {
    fn format_name(&self) -> &'static str {
        "yaml"
    }

    fn encode(&self, value: &Value) -> Result<Encoded> {
        let mut out = String::with_capacity(256);
        match value {
            Value::Object(obj) if !obj.is_empty() => {
                self.write_object_block(obj, &mut out, 0, false);
            }
            Value::Array(arr) if !arr.is_empty() => {
                self.write_array_block(arr, &mut out, 0, false);
            }
            Value::Object(_) => out.push_str("{}\n"),
            Value::Array(_) => out.push_str("[]\n"),
            Value::String(s) if s.contains('\n') => {
                write_literal_block(s, &mut out, 1);
            }
            other => {
                write_scalar(other, &mut out);
                out.push('\n');
            }
        }
        Ok(Encoded::clean(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    fn encode(value: &Value) -> String {
        YamlEncoder::new().encode(value).unwrap().text
    }

    #[test]
    fn scalars() {
        assert_eq!(encode(&Value::Null), "null\n");
        assert_eq!(encode(&Value::Bool(true)), "true\n");
        assert_eq!(encode(&Value::from(42)), "42\n");
        assert_eq!(encode(&Value::from("hello")), "hello\n");
    }

    #[test]
    fn reserved_words_and_numbers_quote() {
        assert_eq!(encode(&Value::from("true")), "\"true\"\n");
        assert_eq!(encode(&Value::from("No")), "\"No\"\n");
        assert_eq!(encode(&Value::from("42")), "\"42\"\n");
        assert_eq!(encode(&Value::from("3.14")), "\"3.14\"\n");
        assert_eq!(encode(&Value::from("")), "\"\"\n");
    }

    #[test]
    fn indicator_and_whitespace_quoting() {
        assert_eq!(encode(&Value::from("&anchor")), "\"&anchor\"\n");
        assert_eq!(encode(&Value::from("*star")), "\"*star\"\n");
        assert_eq!(encode(&Value::from(" padded ")), "\" padded \"\n");
        assert_eq!(encode(&Value::from("key: value")), "\"key: value\"\n");
        assert_eq!(encode(&Value::from("text # note")), "\"text # note\"\n");
        // Inner spaces alone are fine
        assert_eq!(encode(&Value::from("hello world")), "hello world\n");
    }

    #[test]
    fn mapping_block() {
        let data = value!({"name": "Alice", "age": 30});
        assert_eq!(encode(&data), "name: Alice\nage: 30\n");
    }

    #[test]
    fn nested_mapping_indents_two_spaces() {
        let data = value!({"user": {"id": 1, "tags": [1, 2]}});
        assert_eq!(
            encode(&data),
            "user:\n  id: 1\n  tags:\n    - 1\n    - 2\n"
        );
    }

    #[test]
    fn sequence_of_mappings_is_compact() {
        let data = value!([{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]);
        assert_eq!(
            encode(&data),
            "- id: 1\n  name: Alice\n- id: 2\n  name: Bob\n"
        );
    }

    #[test]
    fn multiline_strings_use_literal_blocks() {
        let data = value!({"text": "line1\nline2"});
        assert_eq!(encode(&data), "text: |-\n  line1\n  line2\n");

        let data = value!({"text": "ends with newline\n"});
        assert_eq!(encode(&data), "text: |\n  ends with newline\n");
    }

    #[test]
    fn empty_containers_are_flow_style() {
        assert_eq!(encode(&value!({})), "{}\n");
        assert_eq!(encode(&value!([])), "[]\n");
        let data = value!({"a": {}, "b": []});
        assert_eq!(encode(&data), "a: {}\nb: []\n");
    }

    #[test]
    fn float_fractions_survive() {
        assert_eq!(encode(&Value::from(3.0)), "3.0\n");
    }

    #[test]
    fn key_order_is_insertion_order() {
        let data = value!({"zebra": 1, "apple": 2});
        assert_eq!(encode(&data), "zebra: 1\napple: 2\n");
    }
}

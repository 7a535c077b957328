//! TOON encoder — Token-Oriented Object Notation.
//!
//! TOON exists to cut the token cost of structured payloads in LLM
//! prompts. Its headline feature is the tabular form: an array of
//! uniformly-shaped objects collapses into a single
//! `[N]{field1,field2}:` header plus one compact comma-joined row per
//! element, eliminating repeated key names and most quoting.
//!
//! ## Output forms
//!
//! - **Named fields** (root object): `key: value`, with arrays fused as
//!   `key[N]:` / `key[N]{…}:` and nested objects fused as `key{…}:`.
//! - **Tabular arrays**: `[N]{k1,k2}:` followed by rows at the next
//!   indent level. Eligibility requires a non-empty array of objects
//!   with identical key order and primitive-only values.
//! - **Non-tabular arrays**: `[N]:` followed by one element per line.
//! - **Nested objects**: a `{k1,k2}:` key-list header; primitive
//!   children follow positionally, container children are introduced by
//!   their key.
//!
//! Two spaces per nesting level, `\n` line ends, no trailing newline.
//!
//! ## Example
//!
//! ```rust
//! use llm_fmt::encoders::{Encoder, ToonEncoder};
//! use llm_fmt::value;
//!
//! let data = value!({"users": [
//!     {"id": 1, "name": "Alice", "role": "admin"},
//!     {"id": 2, "name": "Bob", "role": "user"}
//! ]});
//! let encoded = ToonEncoder.encode(&data).unwrap();
//! assert_eq!(
//!     encoded.text,
//!     "users[2]{id,name,role}:\n  1,Alice,admin\n  2,Bob,user"
//! );
//! ```

use crate::value::{Number, Value};
use crate::{Result, ValueMap};

use super::{Encoded, Encoder};

/// Encoder for TOON output. Total on every legal value.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToonEncoder;

impl Encoder for ToonEncoder {
    fn format_name(&self) -> &'static str {
        "toon"
    }

    fn encode(&self, value: &Value) -> Result<Encoded> {
        let mut out = String::with_capacity(256);
        encode_root(value, &mut out);
        Ok(Encoded::clean(out))
    }
}

fn encode_root(value: &Value, out: &mut String) {
    match value {
        Value::Object(obj) if obj.is_empty() => out.push_str("{}"),
        Value::Object(obj) => {
            for (i, (key, child)) in obj.iter().enumerate() {
                if i > 0 {
                    newline(out, 0);
                }
                write_member(key, child, 0, true, out);
            }
        }
        Value::Array(arr) if arr.is_empty() => out.push_str("[]"),
        Value::Array(arr) => write_array(None, arr, 0, out),
        primitive => write_primitive(primitive, out),
    }
}

/// Write one member of an object, starting at the current line position.
///
/// With `named_leaves` (root object), leaf values carry their key as
/// `key: value`. Inside a `{…}:` body the keys are already in the
/// header, so leaves are positional and only container children repeat
/// their key as a block introducer.
fn write_member(key: &str, value: &Value, depth: usize, named_leaves: bool, out: &mut String) {
    match value {
        Value::Object(obj) if obj.is_empty() => {
            if named_leaves {
                write_key(key, out);
                out.push_str(": ");
            }
            out.push_str("{}");
        }
        Value::Array(arr) if arr.is_empty() => {
            if named_leaves {
                write_key(key, out);
                out.push_str(": ");
            }
            out.push_str("[]");
        }
        Value::Object(obj) => {
            write_key(key, out);
            write_object_header(obj, out);
            write_object_body(obj, depth, out);
        }
        Value::Array(arr) => {
            write_array(Some(key), arr, depth, out);
        }
        primitive => {
            if named_leaves {
                write_key(key, out);
                out.push_str(": ");
            }
            write_primitive(primitive, out);
        }
    }
}

/// `{k1,k2,…}:` — the key list of a nested object.
fn write_object_header(obj: &ValueMap, out: &mut String) {
    out.push('{');
    for (i, key) in obj.keys().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_key(key, out);
    }
    out.push_str("}:");
}

fn write_object_body(obj: &ValueMap, depth: usize, out: &mut String) {
    for (key, child) in obj {
        newline(out, depth + 1);
        write_member(key, child, depth + 1, false, out);
    }
}

/// Write an array block: `key[N]:`, `key[N]{…}:` or the unnamed forms.
/// The array is non-empty; empty arrays render as the `[]` leaf.
fn write_array(key: Option<&str>, arr: &[Value], depth: usize, out: &mut String) {
    if let Some(key) = key {
        write_key(key, out);
    }
    out.push('[');
    out.push_str(&arr.len().to_string());
    out.push(']');

    if let Some(fields) = tabular_fields(arr) {
        out.push('{');
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_key(field, out);
        }
        out.push_str("}:");
        for row in arr {
            newline(out, depth + 1);
            write_row(row, &fields, out);
        }
    } else {
        out.push(':');
        for element in arr {
            newline(out, depth + 1);
            write_element(element, depth + 1, out);
        }
    }
}

/// Write one element of a non-tabular array at the current position.
fn write_element(element: &Value, depth: usize, out: &mut String) {
    match element {
        Value::Object(obj) if obj.is_empty() => out.push_str("{}"),
        Value::Array(arr) if arr.is_empty() => out.push_str("[]"),
        Value::Object(obj) => {
            write_object_header(obj, out);
            write_object_body(obj, depth, out);
        }
        Value::Array(arr) => write_array(None, arr, depth, out),
        primitive => write_primitive(primitive, out),
    }
}

/// One tabular row: the element's values comma-joined in header order.
fn write_row(row: &Value, fields: &[&str], out: &mut String) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if let Some(cell) = row.get(field) {
            write_primitive(cell, out);
        }
    }
}

/// Tabular eligibility: a non-empty array whose elements are all objects
/// with the same keys in the same order and primitive-only values.
/// Returns the field list (the first element's key order) when eligible.
///
/// Arrays of empty objects are not worth a header row and render as
/// plain `[N]:` blocks instead.
fn tabular_fields(arr: &[Value]) -> Option<Vec<&str>> {
    let first = arr.first()?.as_object()?;
    if first.is_empty() {
        return None;
    }
    if first.values().any(|v| !v.is_primitive()) {
        return None;
    }
    let fields: Vec<&str> = first.keys().map(String::as_str).collect();

    for element in &arr[1..] {
        let obj = element.as_object()?;
        if obj.len() != fields.len() {
            return None;
        }
        for (expected, (actual, value)) in fields.iter().zip(obj.iter()) {
            if actual.as_str() != *expected || !value.is_primitive() {
                return None;
            }
        }
    }
    Some(fields)
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Keys matching `^[A-Za-z_][A-Za-z0-9_.]*$` are emitted bare; anything
/// else is quoted with the string escapes.
fn write_key(key: &str, out: &mut String) {
    if is_bare_key(key) {
        out.push_str(key);
    } else {
        write_quoted(key, out);
    }
}

fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn write_primitive(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(n, out),
        Value::String(s) => {
            if needs_quoting(s) {
                write_quoted(s, out);
            } else {
                out.push_str(s);
            }
        }
        // Containers never reach here; the structural writers intercept
        // them first.
        Value::Array(_) | Value::Object(_) => out.push_str("null"),
    }
}

fn write_number(n: &Number, out: &mut String) {
    match n {
        Number::Integer(i) => out.push_str(&i.to_string()),
        Number::Float(f) => {
            if f.is_finite() {
                out.push_str(&f.to_string());
            } else {
                out.push_str("null");
            }
        }
    }
}

/// A string must be quoted when emitting it bare would lose or change
/// its meaning: structural characters, literal keywords, numeric
/// lookalikes, or trimmable whitespace. Empty strings also quote — a
/// bare empty cell is indistinguishable from a missing value.
fn needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if s != s.trim() {
        return true;
    }
    if matches!(s, "true" | "false" | "null") {
        return true;
    }
    if looks_numeric(s) {
        return true;
    }
    if s.starts_with('{') || s.starts_with('[') {
        return true;
    }
    s.chars()
        .any(|c| matches!(c, ',' | '\t' | '\n' | '\r' | '"' | '\''))
}

/// Matches integers, floats and exponent forms, including leading-zero
/// spellings like "05" that a reader would still take for a number.
fn looks_numeric(s: &str) -> bool {
    let rest = s.strip_prefix('-').unwrap_or(s);
    if rest.is_empty() {
        return false;
    }
    let mut has_digit = false;
    let mut has_dot = false;
    let mut has_exp = false;
    for (i, b) in rest.bytes().enumerate() {
        match b {
            b'0'..=b'9' => has_digit = true,
            b'.' if !has_dot && !has_exp => has_dot = true,
            b'e' | b'E' if !has_exp && i > 0 => has_exp = true,
            b'+' | b'-' if has_exp => {}
            _ => return false,
        }
    }
    has_digit
}

fn write_quoted(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

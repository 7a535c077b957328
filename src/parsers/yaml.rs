//! YAML parser (safe subset of YAML 1.2 with core-schema scalars).

use crate::error::ParseError;
use crate::value::{Number, Value};
use crate::{Result, ValueMap};

use super::Parser;

/// Parser for YAML input.
///
/// Only the core schema is honored: `true`/`false`/`null` (with the usual
/// capitalizations) and numbers; `yes`/`no`/`on`/`off` stay strings.
/// Custom tags are unwrapped to their inner value rather than invoking
/// any constructor. Mapping key order follows document order, and
/// non-string keys are stringified.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlParser;

impl Parser for YamlParser {
    fn format_name(&self) -> &'static str {
        "yaml"
    }

    fn parse(&self, input: &[u8]) -> Result<Value> {
        let yaml_value: serde_yaml::Value =
            serde_yaml::from_slice(input).map_err(convert_error)?;
        Ok(convert_yaml_value(yaml_value))
    }
}

fn convert_error(err: serde_yaml::Error) -> ParseError {
    match err.location() {
        Some(loc) => ParseError::at_offset("yaml", loc.index(), err.to_string()),
        None => ParseError::new("yaml", err.to_string()),
    }
}

fn convert_yaml_value(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => Value::Number(convert_number(&n)),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.into_iter().map(convert_yaml_value).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = ValueMap::with_capacity(mapping.len());
            for (key, val) in mapping {
                map.insert(key_to_string(&key), convert_yaml_value(val));
            }
            Value::Object(map)
        }
        // Safe subset: a tagged scalar is just its payload.
        serde_yaml::Value::Tagged(tagged) => convert_yaml_value(tagged.value),
    }
}

fn convert_number(n: &serde_yaml::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::Integer(i)
    } else {
        Number::Float(n.as_f64().unwrap_or(0.0))
    }
}

/// Object keys are strings in the value model; scalar YAML keys of other
/// types are rendered to their plain-scalar spelling.
fn key_to_string(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

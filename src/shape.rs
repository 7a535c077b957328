//! Shape analysis: classify a value tree and recommend an output format.
//!
//! The classifier is cheap by construction — arrays longer than
//! [`ANALYSIS_SAMPLE`] are only sampled for uniformity — while maximum
//! depth is measured exactly, because a single tree walk is cheap. The
//! recommendation maps the detected shape straight onto the encoder
//! expected to produce the fewest tokens.

use serde::Serialize;

use crate::{Format, Value};

/// How many leading array elements the uniformity checks inspect.
pub const ANALYSIS_SAMPLE: usize = 100;

/// The analyzer's classification of a value tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeTag {
    /// Array of objects with identical key sets.
    UniformArray,
    /// Array of objects with overlapping but non-identical key sets.
    SparseArray,
    /// Array of equal-length arrays of primitives.
    TabularData,
    /// Object whose values are all primitives.
    FlatObject,
    /// Object with at least one nested value.
    NestedObject,
    /// Null, bool, number or string at the root.
    Primitive,
    /// Null or an empty object/array.
    Empty,
    /// Everything else.
    Mixed,
}

/// Shape classification plus the measurements behind it.
#[derive(Debug, Clone, Serialize)]
pub struct DataShape {
    pub shape: ShapeTag,
    /// Root array length (0 for non-arrays).
    pub array_len: usize,
    /// Field count of the root object or of the uniform element shape.
    pub field_count: usize,
    /// Exact maximum nesting depth.
    pub max_depth: usize,
    /// Whether every (sampled) field value is a primitive.
    pub all_primitive_fields: bool,
    /// Up to ten keys, sorted, for display.
    pub sample_keys: Vec<String>,
    /// Human-readable summary.
    pub description: String,
}

/// Classify a value tree.
#[must_use]
pub fn detect_data_shape(value: &Value) -> DataShape {
    match value {
        Value::Null => leaf_shape(ShapeTag::Empty, "Null value"),
        Value::Bool(_) => leaf_shape(ShapeTag::Primitive, "Primitive value (bool)"),
        Value::Number(_) => leaf_shape(ShapeTag::Primitive, "Primitive value (number)"),
        Value::String(_) => leaf_shape(ShapeTag::Primitive, "Primitive value (string)"),
        Value::Object(obj) if obj.is_empty() => leaf_shape(ShapeTag::Empty, "Empty object"),
        Value::Array(arr) if arr.is_empty() => leaf_shape(ShapeTag::Empty, "Empty array"),
        Value::Object(obj) => object_shape(value, obj),
        Value::Array(arr) => array_shape(value, arr),
    }
}

fn leaf_shape(shape: ShapeTag, description: &str) -> DataShape {
    DataShape {
        shape,
        array_len: 0,
        field_count: 0,
        max_depth: 0,
        all_primitive_fields: true,
        sample_keys: Vec::new(),
        description: description.to_string(),
    }
}

fn object_shape(value: &Value, obj: &crate::ValueMap) -> DataShape {
    let field_count = obj.len();
    let all_primitive = obj.values().all(Value::is_primitive);
    let shape = if all_primitive {
        ShapeTag::FlatObject
    } else {
        ShapeTag::NestedObject
    };
    let description = if all_primitive {
        format!("Flat object with {field_count} fields")
    } else {
        format!("Nested object with {field_count} top-level fields")
    };
    DataShape {
        shape,
        array_len: 0,
        field_count,
        max_depth: max_depth(value),
        all_primitive_fields: all_primitive,
        sample_keys: sorted_keys(obj.keys()),
        description,
    }
}

fn array_shape(value: &Value, arr: &[Value]) -> DataShape {
    let array_len = arr.len();
    let sample = &arr[..array_len.min(ANALYSIS_SAMPLE)];
    let depth = max_depth(value);

    if sample.iter().all(Value::is_object) {
        return object_array_shape(arr, sample, depth);
    }

    if sample.iter().all(Value::is_array) {
        let row_len = sample
            .first()
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let tabular = sample.iter().all(|row| {
            row.as_array()
                .is_some_and(|cells| cells.len() == row_len && cells.iter().all(Value::is_primitive))
        });
        if tabular {
            return DataShape {
                shape: ShapeTag::TabularData,
                array_len,
                field_count: row_len,
                max_depth: depth,
                all_primitive_fields: true,
                sample_keys: Vec::new(),
                description: format!("Tabular data: {array_len} rows of {row_len} cells"),
            };
        }
    }

    let description = if sample.iter().all(Value::is_primitive) {
        format!("Array of {array_len} primitives")
    } else {
        format!("Mixed array of {array_len} items")
    };
    DataShape {
        shape: ShapeTag::Mixed,
        array_len,
        field_count: 0,
        max_depth: depth,
        all_primitive_fields: sample.iter().all(Value::is_primitive),
        sample_keys: Vec::new(),
        description,
    }
}

fn object_array_shape(arr: &[Value], sample: &[Value], depth: usize) -> DataShape {
    let array_len = arr.len();
    let first_keys: Vec<&String> = sample
        .first()
        .and_then(Value::as_object)
        .map(|obj| obj.keys().collect())
        .unwrap_or_default();

    let mut first_sorted: Vec<&String> = first_keys.clone();
    first_sorted.sort();

    let uniform = sample.iter().all(|item| {
        item.as_object().is_some_and(|obj| {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            keys == first_sorted
        })
    });

    let all_primitive = sample.iter().all(|item| {
        item.as_object()
            .is_some_and(|obj| obj.values().all(Value::is_primitive))
    });

    let field_count = first_keys.len();
    let sample_keys = sorted_keys(first_keys.into_iter());

    if uniform {
        DataShape {
            shape: ShapeTag::UniformArray,
            array_len,
            field_count,
            max_depth: depth,
            all_primitive_fields: all_primitive,
            sample_keys,
            description: format!(
                "Uniform array of {array_len} objects with {field_count} fields"
            ),
        }
    } else {
        DataShape {
            shape: ShapeTag::SparseArray,
            array_len,
            field_count,
            max_depth: depth,
            all_primitive_fields: all_primitive,
            sample_keys,
            description: format!("Array of {array_len} objects with varying schemas"),
        }
    }
}

fn sorted_keys<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut keys: Vec<String> = keys.cloned().collect();
    keys.sort();
    keys.truncate(10);
    keys
}

/// Exact maximum nesting depth: primitives are 0, each container level
/// adds one.
#[must_use]
pub fn max_depth(value: &Value) -> usize {
    fn walk(value: &Value, current: usize) -> usize {
        match value {
            Value::Object(obj) if !obj.is_empty() => obj
                .values()
                .map(|v| walk(v, current + 1))
                .max()
                .unwrap_or(current),
            Value::Array(arr) if !arr.is_empty() => arr
                .iter()
                .map(|v| walk(v, current + 1))
                .max()
                .unwrap_or(current),
            _ => current,
        }
    }
    walk(value, 0)
}

/// Map a shape onto the encoder expected to win on tokens.
#[must_use]
pub fn recommend_format(shape: &DataShape) -> Format {
    match shape.shape {
        ShapeTag::UniformArray => {
            if shape.all_primitive_fields {
                Format::Tsv
            } else {
                Format::Toon
            }
        }
        ShapeTag::TabularData => Format::Tsv,
        ShapeTag::SparseArray => Format::Toon,
        ShapeTag::FlatObject => Format::Yaml,
        ShapeTag::NestedObject => {
            if shape.max_depth <= 2 {
                Format::Yaml
            } else {
                Format::Json
            }
        }
        ShapeTag::Primitive | ShapeTag::Empty | ShapeTag::Mixed => Format::Json,
    }
}

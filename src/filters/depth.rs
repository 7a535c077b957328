//! Max depth filter: summarize everything nested past a cap.

use crate::{Result, Value, ValueMap};

use super::Filter;

/// Filter that replaces containers nested at or past `max_depth` with a
/// summary string — `{…N keys}` for objects, `[…N items]` for arrays —
/// so the reader can see that something was elided and how much.
///
/// Depth 0 means "root only": the root container itself becomes a
/// summary. Primitives are always preserved, which also makes the filter
/// idempotent — a second pass sees only strings where containers used to
/// be.
#[derive(Debug, Clone, Copy)]
pub struct MaxDepthFilter {
    max_depth: usize,
}

impl MaxDepthFilter {
    /// Creates a new max depth filter. All depths are valid; 0 keeps
    /// only the root.
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    fn truncate(&self, value: Value, current_depth: usize) -> Value {
        if current_depth >= self.max_depth {
            return summarize(value);
        }

        match value {
            Value::Object(obj) => {
                let truncated: ValueMap = obj
                    .into_iter()
                    .map(|(k, v)| (k, self.truncate(v, current_depth + 1)))
                    .collect();
                Value::Object(truncated)
            }
            Value::Array(arr) => {
                let truncated: Vec<Value> = arr
                    .into_iter()
                    .map(|v| self.truncate(v, current_depth + 1))
                    .collect();
                Value::Array(truncated)
            }
            other => other,
        }
    }
}

/// Containers collapse to a summary string; primitives pass through.
fn summarize(value: Value) -> Value {
    match value {
        Value::Object(obj) => Value::String(format!("{{…{} keys}}", obj.len())),
        Value::Array(arr) => Value::String(format!("[…{} items]", arr.len())),
        other => other,
    }
}

impl Filter for MaxDepthFilter {
    fn apply(&self, value: Value) -> Result<Value> {
        Ok(self.truncate(value, 0))
    }
}

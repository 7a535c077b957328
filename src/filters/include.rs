//! Path selection: the dot-and-bracket expression grammar and the
//! include filter built on it.
//!
//! Supported expressions:
//!
//! - `users` — member lookup
//! - `data.items` — chained lookup
//! - `users[0]`, `users[-1]` — array index (negative counts from the end)
//! - `users[*].name` — projection over every element
//! - `users[?age >= 30].name` — predicate filter, `op` one of
//!   `== != < <= > >=` and the literal a JSON scalar
//!
//! A path that selects nothing evaluates to `Null`, and the filter chain
//! carries that `Null` forward rather than reverting to its input.

use crate::error::FilterError;
use crate::value::{Number, Value};
use crate::Result;

use super::Filter;

/// A compiled path expression.
///
/// Compiling happens once, at filter construction; evaluation is a plain
/// tree walk.
#[derive(Debug, Clone)]
pub struct PathExpr {
    expression: String,
    segments: Vec<Segment>,
}

/// A segment of a path expression.
#[derive(Debug, Clone)]
enum Segment {
    /// Object key access.
    Key(String),
    /// Array index access; negative indices count from the end.
    Index(i64),
    /// Wildcard — projects over all array elements.
    Wildcard,
    /// Predicate — keeps array elements whose `key` compares true.
    Predicate {
        key: String,
        op: CompareOp,
        literal: Value,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl PathExpr {
    /// Compiles a path expression.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPath`] for empty expressions,
    /// unterminated brackets and malformed predicates.
    pub fn compile(expression: &str) -> Result<Self> {
        let segments = parse_expression(expression)?;
        Ok(PathExpr {
            expression: expression.to_string(),
            segments,
        })
    }

    /// The source text this expression was compiled from.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Evaluates the expression against a value. Selecting nothing
    /// yields `Null`.
    #[must_use]
    pub fn evaluate(&self, value: &Value) -> Value {
        extract(value, &self.segments)
    }

    /// Collects the concrete paths (in `$`-rooted dotted/bracketed form)
    /// of every node the expression matches. Used by the truncation
    /// filter's preserve list.
    #[must_use]
    pub fn matched_paths(&self, value: &Value) -> Vec<String> {
        let mut out = Vec::new();
        collect_paths(value, &self.segments, "$", &mut out);
        out
    }
}

fn parse_expression(expr: &str) -> Result<Vec<Segment>> {
    let invalid = |message: &str| {
        FilterError::InvalidPath {
            expression: expr.to_string(),
            message: message.to_string(),
        }
    };

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = expr.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }

                let mut content = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == ']' {
                        closed = true;
                        break;
                    }
                    content.push(next);
                }
                if !closed {
                    return Err(invalid("unterminated '['").into());
                }

                segments.push(parse_bracket(expr, content.trim())?);
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        segments.push(Segment::Key(current));
    }

    if segments.is_empty() {
        return Err(invalid("empty path expression").into());
    }

    Ok(segments)
}

fn parse_bracket(expr: &str, content: &str) -> Result<Segment> {
    let invalid = |message: String| {
        FilterError::InvalidPath {
            expression: expr.to_string(),
            message,
        }
    };

    if content == "*" {
        return Ok(Segment::Wildcard);
    }
    if let Some(predicate) = content.strip_prefix('?') {
        return parse_predicate(expr, predicate);
    }
    if let Ok(idx) = content.parse::<i64>() {
        return Ok(Segment::Index(idx));
    }
    // Quoted member access for keys containing '.' or '['.
    let trimmed = content.trim_matches(|c| c == '"' || c == '\'');
    if trimmed.is_empty() {
        return Err(invalid(format!("invalid bracket segment '[{content}]'")).into());
    }
    Ok(Segment::Key(trimmed.to_string()))
}

fn parse_predicate(expr: &str, predicate: &str) -> Result<Segment> {
    let invalid = |message: String| {
        FilterError::InvalidPath {
            expression: expr.to_string(),
            message,
        }
    };

    // Two-character operators first so `<=` is not read as `<` + `=`.
    const OPS: [(&str, CompareOp); 6] = [
        ("==", CompareOp::Eq),
        ("!=", CompareOp::Ne),
        ("<=", CompareOp::Le),
        (">=", CompareOp::Ge),
        ("<", CompareOp::Lt),
        (">", CompareOp::Gt),
    ];

    for (symbol, op) in OPS {
        if let Some(pos) = predicate.find(symbol) {
            let key = predicate[..pos].trim();
            let literal = predicate[pos + symbol.len()..].trim();
            if key.is_empty() {
                return Err(invalid("predicate is missing a key".to_string()).into());
            }
            let literal = parse_literal(literal)
                .ok_or_else(|| invalid(format!("'{literal}' is not a JSON scalar")))?;
            return Ok(Segment::Predicate {
                key: key.to_string(),
                op,
                literal,
            });
        }
    }

    Err(invalid(format!(
        "predicate '{predicate}' has no comparison operator (expected ==, !=, <, <=, >, >=)"
    ))
    .into())
}

/// JSON scalar literals: `null`, `true`, `false`, numbers and quoted
/// strings.
fn parse_literal(text: &str) -> Option<Value> {
    match text {
        "null" => return Some(Value::Null),
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }
    if (text.starts_with('"') && text.ends_with('"') && text.len() >= 2)
        || (text.starts_with('\'') && text.ends_with('\'') && text.len() >= 2)
    {
        return Some(Value::String(text[1..text.len() - 1].to_string()));
    }
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::Number(Number::Integer(i)));
    }
    if let Ok(f) = text.parse::<f64>() {
        return Some(Value::Number(Number::Float(f)));
    }
    None
}

/// Recursive evaluation following path segments.
fn extract(value: &Value, segments: &[Segment]) -> Value {
    let (segment, rest) = match segments.split_first() {
        Some(pair) => pair,
        None => return value.clone(),
    };

    match segment {
        Segment::Key(key) => match value.get(key) {
            Some(child) => extract(child, rest),
            None => Value::Null,
        },
        Segment::Index(idx) => match value.as_array() {
            Some(arr) => match resolve_index(arr, *idx) {
                Some(i) => extract(&arr[i], rest),
                None => Value::Null,
            },
            None => Value::Null,
        },
        Segment::Wildcard => match value.as_array() {
            Some(arr) => project(arr.iter(), rest),
            None => Value::Null,
        },
        Segment::Predicate { key, op, literal } => match value.as_array() {
            Some(arr) => project(
                arr.iter()
                    .filter(|elem| predicate_matches(elem, key, *op, literal)),
                rest,
            ),
            None => Value::Null,
        },
    }
}

/// Map the remaining segments over the selected elements, dropping
/// per-element `Null` results the way a JMESPath projection does.
fn project<'a>(elements: impl Iterator<Item = &'a Value>, rest: &[Segment]) -> Value {
    Value::Array(
        elements
            .map(|elem| extract(elem, rest))
            .filter(|v| !v.is_null())
            .collect(),
    )
}

fn resolve_index(arr: &[Value], idx: i64) -> Option<usize> {
    if idx >= 0 {
        let i = idx as usize;
        (i < arr.len()).then_some(i)
    } else {
        let back = idx.unsigned_abs() as usize;
        arr.len().checked_sub(back)
    }
}

fn predicate_matches(elem: &Value, key: &str, op: CompareOp, literal: &Value) -> bool {
    let actual = match elem.get(key) {
        Some(v) => v,
        None => return false,
    };
    match op {
        CompareOp::Eq => scalar_eq(actual, literal) == Some(true),
        CompareOp::Ne => scalar_eq(actual, literal) == Some(false),
        CompareOp::Lt => scalar_cmp(actual, literal) == Some(std::cmp::Ordering::Less),
        CompareOp::Le => matches!(
            scalar_cmp(actual, literal),
            Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
        ),
        CompareOp::Gt => scalar_cmp(actual, literal) == Some(std::cmp::Ordering::Greater),
        CompareOp::Ge => matches!(
            scalar_cmp(actual, literal),
            Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
        ),
    }
}

/// Equality across scalars; numbers compare by numeric value so `1`
/// equals `1.0`. `None` means the types are incomparable.
fn scalar_eq(a: &Value, b: &Value) -> Option<bool> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(true),
        (Value::Bool(x), Value::Bool(y)) => Some(x == y),
        (Value::Number(x), Value::Number(y)) => Some(x.as_f64() == y.as_f64()),
        (Value::String(x), Value::String(y)) => Some(x == y),
        _ => None,
    }
}

/// Ordering is defined for number/number and string/string pairs only.
fn scalar_cmp(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64().partial_cmp(&y.as_f64()),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Path collection for the preserve list: walk the tree the same way
/// `extract` does, but record the concrete location of each match.
fn collect_paths(value: &Value, segments: &[Segment], base: &str, out: &mut Vec<String>) {
    let (segment, rest) = match segments.split_first() {
        Some(pair) => pair,
        None => {
            out.push(base.to_string());
            return;
        }
    };

    match segment {
        Segment::Key(key) => {
            if let Some(child) = value.get(key) {
                collect_paths(child, rest, &format!("{base}.{key}"), out);
            }
        }
        Segment::Index(idx) => {
            if let Some(arr) = value.as_array() {
                if let Some(i) = resolve_index(arr, *idx) {
                    collect_paths(&arr[i], rest, &format!("{base}[{i}]"), out);
                }
            }
        }
        Segment::Wildcard => {
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    collect_paths(elem, rest, &format!("{base}[{i}]"), out);
                }
            }
        }
        Segment::Predicate { key, op, literal } => {
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    if predicate_matches(elem, key, *op, literal) {
                        collect_paths(elem, rest, &format!("{base}[{i}]"), out);
                    }
                }
            }
        }
    }
}

/// Filter that narrows the value to the sub-tree a path expression
/// selects.
#[derive(Debug, Clone)]
pub struct IncludeFilter {
    path: PathExpr,
}

impl IncludeFilter {
    /// Compiles the expression and builds the filter.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPath`] if the expression is
    /// malformed.
    pub fn new(expression: &str) -> Result<Self> {
        Ok(IncludeFilter {
            path: PathExpr::compile(expression)?,
        })
    }
}

impl Filter for IncludeFilter {
    fn apply(&self, value: Value) -> Result<Value> {
        Ok(self.path.evaluate(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    fn users() -> Value {
        value!({
            "users": [
                {"name": "Alice", "age": 30},
                {"name": "Bob", "age": 25},
                {"name": "Carol", "age": 41}
            ],
            "count": 3
        })
    }

    #[test]
    fn simple_key() {
        let filter = IncludeFilter::new("count").unwrap();
        assert_eq!(filter.apply(users()).unwrap(), Value::from(3));
    }

    #[test]
    fn array_index() {
        let filter = IncludeFilter::new("users[1].name").unwrap();
        assert_eq!(filter.apply(users()).unwrap(), Value::from("Bob"));
    }

    #[test]
    fn negative_index_counts_from_the_end() {
        let filter = IncludeFilter::new("users[-1].name").unwrap();
        assert_eq!(filter.apply(users()).unwrap(), Value::from("Carol"));
    }

    #[test]
    fn wildcard_projection() {
        let filter = IncludeFilter::new("users[*].name").unwrap();
        assert_eq!(
            filter.apply(users()).unwrap(),
            value!(["Alice", "Bob", "Carol"])
        );
    }

    #[test]
    fn projection_drops_missing_members() {
        let data = value!([{"a": 1}, {"b": 2}, {"a": 3}]);
        let filter = IncludeFilter::new("[*].a").unwrap();
        assert_eq!(filter.apply(data).unwrap(), value!([1, 3]));
    }

    #[test]
    fn predicate_comparison() {
        let filter = IncludeFilter::new("users[?age >= 30].name").unwrap();
        assert_eq!(filter.apply(users()).unwrap(), value!(["Alice", "Carol"]));

        let filter = IncludeFilter::new("users[?name == \"Bob\"].age").unwrap();
        assert_eq!(filter.apply(users()).unwrap(), value!([25]));

        let filter = IncludeFilter::new("users[?age != 25]").unwrap();
        let kept = filter.apply(users()).unwrap();
        assert_eq!(kept.as_array().unwrap().len(), 2);
    }

    #[test]
    fn selecting_nothing_yields_null() {
        let filter = IncludeFilter::new("nonexistent").unwrap();
        assert_eq!(filter.apply(users()).unwrap(), Value::Null);

        let filter = IncludeFilter::new("users[99]").unwrap();
        assert_eq!(filter.apply(users()).unwrap(), Value::Null);
    }

    #[test]
    fn invalid_expressions_fail_compilation() {
        assert!(IncludeFilter::new("").is_err());
        assert!(IncludeFilter::new("users[").is_err());
        assert!(IncludeFilter::new("users[?age]").is_err());
        assert!(IncludeFilter::new("users[?age ~ 3]").is_err());
        assert!(IncludeFilter::new("users[?== 3]").is_err());
    }

    #[test]
    fn matched_paths_are_concrete() {
        let expr = PathExpr::compile("users[?age >= 30]").unwrap();
        assert_eq!(expr.matched_paths(&users()), vec!["$.users[0]", "$.users[2]"]);

        let expr = PathExpr::compile("users[-1]").unwrap();
        assert_eq!(expr.matched_paths(&users()), vec!["$.users[2]"]);
    }
}

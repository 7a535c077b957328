//! Error types for parsing, filtering, encoding and pipeline construction.
//!
//! Every fallible operation in the crate returns a [`Result`] carrying one
//! of these values; nothing unwinds. Propagation is fail-fast: the first
//! stage error aborts the pipeline, and no partial output is published.
//! The one exception is [`analyze`](crate::analyze), which records
//! per-encoder failures in its report instead of propagating them.
//!
//! The top-level [`Error`] tags each inner error with the stage it came
//! from, so callers can match on `Error::Parse(..)` / `Error::Filter(..)` /
//! `Error::Encode(..)` / `Error::Config(..)` without inspecting messages.

use thiserror::Error;

/// Top-level error: a stage error tagged with the stage that produced it.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Input could not be parsed into a value tree.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A filter rejected its input or, in strict mode, hit a limit.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// An encoder could not represent the value tree.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Pipeline construction was given an unusable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A parse failure. No partial value is ever returned alongside one.
#[derive(Debug, Clone, Error)]
#[error("{format} parse error{at}: {message}", at = match offset { Some(o) => format!(" at byte {o}"), None => String::new() })]
pub struct ParseError {
    /// Format tag of the parser that failed (e.g. `json`).
    pub format: &'static str,
    /// Byte offset of the failure, when the underlying parser reports one.
    pub offset: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl ParseError {
    /// Creates a parse error without position information.
    pub fn new(format: &'static str, message: impl Into<String>) -> Self {
        ParseError {
            format,
            offset: None,
            message: message.into(),
        }
    }

    /// Creates a parse error anchored at a byte offset.
    pub fn at_offset(format: &'static str, offset: usize, message: impl Into<String>) -> Self {
        ParseError {
            format,
            offset: Some(offset),
            message: message.into(),
        }
    }
}

/// Errors produced by the filter stage.
#[derive(Debug, Clone, Error)]
pub enum FilterError {
    /// A path expression failed to compile.
    #[error("invalid path expression '{expression}': {message}")]
    InvalidPath { expression: String, message: String },

    /// Strict mode only: a value exceeded a truncation limit.
    #[error("{kind} limit exceeded at {at_path}: {observed} > {limit}")]
    LimitExceeded {
        kind: LimitKind,
        at_path: String,
        observed: usize,
        limit: usize,
    },
}

/// Which truncation limit was exceeded in strict mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LimitKind {
    #[error("array items")]
    ArrayItems,
    #[error("string length")]
    StringLength,
}

/// Errors produced by the encode stage.
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    /// The tabular encoders (TSV/CSV) require an array of objects or an
    /// array of arrays at the root.
    #[error("{encoder}: input is not tabular (expected an array of objects or an array of arrays)")]
    NotTabular { encoder: &'static str },

    /// The encoder could not stringify a value and no fallback exists.
    #[error("{encoder}: unrepresentable value at {at_path}")]
    UnrepresentableValue {
        encoder: &'static str,
        at_path: String,
    },
}

/// Errors raised while constructing a pipeline.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The format tag is not known to the registry being consulted.
    /// Input and output registries differ: `toon` is output-only and
    /// `xml` is input-only.
    #[error("unknown format tag '{tag}'")]
    UnknownFormat { tag: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_includes_offset() {
        let err = ParseError::at_offset("json", 17, "unexpected token");
        assert_eq!(err.to_string(), "json parse error at byte 17: unexpected token");

        let err = ParseError::new("yaml", "bad document");
        assert_eq!(err.to_string(), "yaml parse error: bad document");
    }

    #[test]
    fn limit_exceeded_display() {
        let err = FilterError::LimitExceeded {
            kind: LimitKind::ArrayItems,
            at_path: "$.users".to_string(),
            observed: 12,
            limit: 5,
        };
        assert_eq!(
            err.to_string(),
            "array items limit exceeded at $.users: 12 > 5"
        );
    }

    #[test]
    fn stage_tagging_via_from() {
        let err: Error = ParseError::new("csv", "boom").into();
        assert!(matches!(err, Error::Parse(_)));

        let err: Error = ConfigError::UnknownFormat {
            tag: "protobuf".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Config(_)));
    }
}

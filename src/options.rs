//! Format tags and conversion options.
//!
//! This module provides the types callers hand to [`convert`](crate::convert)
//! and the [`PipelineBuilder`](crate::PipelineBuilder):
//!
//! - [`Format`]: the case-insensitive format tags (`json`, `yaml`, `xml`,
//!   `csv`, `tsv`, `toon`)
//! - [`ConvertOptions`]: input/output selection, filters, strict mode
//! - [`FilterSpec`]: declarative filter descriptions resolved at build time
//!
//! ## Examples
//!
//! ```rust
//! use llm_fmt::{ConvertOptions, FilterSpec, Format};
//!
//! let options = ConvertOptions::new()
//!     .with_output_format(Format::Toon)
//!     .with_filter(FilterSpec::Include {
//!         path: "users[*].name".to_string(),
//!     });
//! assert_eq!(options.output_format, Some(Format::Toon));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;
use crate::filters::TruncateStrategy;

/// A data format this crate can read or write.
///
/// `xml` is input-only and `toon` is output-only; the parser and encoder
/// registries each reject tags from the other side.
///
/// # Examples
///
/// ```rust
/// use llm_fmt::Format;
///
/// let fmt: Format = "TOON".parse().unwrap();
/// assert_eq!(fmt, Format::Toon);
/// assert_eq!(fmt.tag(), "toon");
/// assert!("protobuf".parse::<Format>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
    Xml,
    Csv,
    Tsv,
    Toon,
}

impl Format {
    /// The canonical lowercase tag for this format.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Xml => "xml",
            Format::Csv => "csv",
            Format::Tsv => "tsv",
            Format::Toon => "toon",
        }
    }

    /// All formats a parser exists for.
    #[must_use]
    pub const fn input_formats() -> &'static [Format] {
        &[Format::Json, Format::Yaml, Format::Xml, Format::Csv, Format::Tsv]
    }

    /// All formats an encoder exists for, in registry order.
    #[must_use]
    pub const fn output_formats() -> &'static [Format] {
        &[Format::Toon, Format::Json, Format::Yaml, Format::Tsv, Format::Csv]
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    /// Parses a case-insensitive format tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "xml" => Ok(Format::Xml),
            "csv" => Ok(Format::Csv),
            "tsv" => Ok(Format::Tsv),
            "toon" => Ok(Format::Toon),
            _ => Err(ConfigError::UnknownFormat { tag: s.to_string() }),
        }
    }
}

/// Declarative description of one filter, resolved by the
/// [`PipelineBuilder`](crate::PipelineBuilder) before any data flows.
///
/// Invalid specs (bad path expressions, unknown strategies) fail pipeline
/// construction; nothing is validated lazily inside `run`.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// Select the sub-tree matching a path expression.
    Include { path: String },
    /// Replace containers nested past `depth` with summary strings.
    MaxDepth { depth: u32 },
    /// Bound array lengths and string lengths.
    Truncate {
        max_items: Option<u32>,
        max_string_length: Option<u32>,
        strategy: TruncateStrategy,
        preserve: Vec<String>,
        seed: Option<u64>,
    },
}

impl FilterSpec {
    /// Shorthand for a default truncation spec bounding array lengths.
    #[must_use]
    pub fn truncate_items(max_items: u32) -> Self {
        FilterSpec::Truncate {
            max_items: Some(max_items),
            max_string_length: None,
            strategy: TruncateStrategy::default(),
            preserve: Vec::new(),
            seed: None,
        }
    }
}

/// Options for [`convert`](crate::convert).
///
/// - `input_format` absent: auto-detect from `filename` and payload bytes
/// - `output_format` absent: run the shape analyzer and use its
///   recommendation (computed on the filtered value)
/// - `strict`: truncation limits become hard errors instead of rewrites
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub input_format: Option<Format>,
    pub output_format: Option<Format>,
    /// Optional source name whose extension steers auto-detection.
    pub filename: Option<String>,
    pub filters: Vec<FilterSpec>,
    pub strict: bool,
}

impl ConvertOptions {
    /// Creates empty options: auto-detect input, recommend output, no filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the input format instead of auto-detecting.
    #[must_use]
    pub fn with_input_format(mut self, format: Format) -> Self {
        self.input_format = Some(format);
        self
    }

    /// Pins the output format instead of using the recommendation.
    #[must_use]
    pub fn with_output_format(mut self, format: Format) -> Self {
        self.output_format = Some(format);
        self
    }

    /// Supplies a filename for extension-based detection.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Appends a filter; filters apply in the order they were added.
    #[must_use]
    pub fn with_filter(mut self, spec: FilterSpec) -> Self {
        self.filters.push(spec);
        self
    }

    /// Makes truncation limits hard errors.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_case_insensitively() {
        for fmt in [
            Format::Json,
            Format::Yaml,
            Format::Xml,
            Format::Csv,
            Format::Tsv,
            Format::Toon,
        ] {
            assert_eq!(fmt.tag().parse::<Format>().unwrap(), fmt);
            assert_eq!(fmt.tag().to_uppercase().parse::<Format>().unwrap(), fmt);
        }
    }

    #[test]
    fn unknown_tag_is_config_error() {
        let err = "msgpack".parse::<Format>().unwrap_err();
        assert_eq!(err.to_string(), "unknown format tag 'msgpack'");
    }

    #[test]
    fn yml_aliases_yaml() {
        assert_eq!("yml".parse::<Format>().unwrap(), Format::Yaml);
    }
}

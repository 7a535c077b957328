//! # llm-fmt
//!
//! Token-efficient data format conversion for LLM prompts.
//!
//! ## What it does
//!
//! Structured payloads pasted into prompts burn tokens on syntax: quotes,
//! braces, repeated key names, indentation. This crate parses JSON, YAML,
//! XML or CSV into a single value model, optionally rewrites the tree
//! (path selection, depth capping, truncation), and re-emits it in the
//! representation that costs the fewest tokens — TOON, compact JSON,
//! YAML, TSV or CSV. It can also tell you which representation that is.
//!
//! ## Key features
//!
//! - **TOON output**: uniform object arrays collapse into a single
//!   `[N]{field,…}:` header plus one compact row per element — typically
//!   30–60% fewer tokens than JSON
//! - **Format auto-detection**: filename extension first, then content
//!   sniffing, with YAML as the tolerant fallback
//! - **Filters**: path selection with predicates, depth capping with
//!   visible summaries, deterministic truncation with preserve lists
//! - **Shape analysis**: classifies the payload and recommends the
//!   cheapest output format, with per-format token estimates
//! - **Deterministic**: same bytes, same filters, same seed — byte-equal
//!   output, every time
//!
//! ## Quick start
//!
//! ```rust
//! use llm_fmt::{convert, ConvertOptions, Format};
//!
//! let json = br#"{"users":[
//!     {"id": 1, "name": "Alice", "role": "admin"},
//!     {"id": 2, "name": "Bob", "role": "user"}
//! ]}"#;
//!
//! let toon = convert(
//!     json,
//!     &ConvertOptions::new().with_output_format(Format::Toon),
//! )
//! .unwrap();
//! assert_eq!(toon, "users[2]{id,name,role}:\n  1,Alice,admin\n  2,Bob,user");
//! ```
//!
//! ## Picking a format automatically
//!
//! ```rust
//! use llm_fmt::{analyze, detect_shape, Format, ShapeTag};
//!
//! let input = br#"[{"id":1,"x":2.5},{"id":2,"x":3.5}]"#;
//! assert_eq!(detect_shape(input, None).unwrap(), ShapeTag::UniformArray);
//!
//! let report = analyze(input, Some(Format::Json)).unwrap();
//! assert_eq!(report.recommendation, Format::Tsv);
//! ```
//!
//! ## Composing a pipeline by hand
//!
//! ```rust
//! use llm_fmt::{FilterSpec, Format, Pipeline};
//!
//! let pipeline = Pipeline::builder(Format::Json)
//!     .filter(FilterSpec::MaxDepth { depth: 2 })
//!     .output(Format::Json)
//!     .build()
//!     .unwrap();
//!
//! let out = pipeline.run(br#"{"a":{"b":{"c":{"d":1}}}}"#).unwrap();
//! assert_eq!(out, r#"{"a":{"b":"{…1 keys}"}}"#);
//! ```
//!
//! ## Concurrency
//!
//! Everything here is synchronous and stateless per invocation. Parsers,
//! filters, encoders and built pipelines are `Send + Sync`; share them
//! freely across threads for disjoint inputs.

pub mod analyze;
pub mod encoders;
pub mod error;
pub mod filters;
pub mod macros;
pub mod map;
pub mod options;
pub mod parsers;
pub mod pipeline;
pub mod shape;
pub mod tokens;
pub mod value;

pub use analyze::{analyze, report_to_json, AnalysisReport, FormatAnalysis};
pub use error::{ConfigError, EncodeError, Error, FilterError, LimitKind, ParseError, Result};
pub use filters::TruncateStrategy;
pub use map::ValueMap;
pub use options::{ConvertOptions, FilterSpec, Format};
pub use parsers::detect_format;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use shape::{detect_data_shape, DataShape, ShapeTag};
pub use tokens::{estimate_tokens, savings_percent};
pub use value::{Number, Value};

use encoders::Encoder;
use filters::{Filter, FilterChain};
use parsers::Parser;

/// Convert a payload to another format in one call.
///
/// The input format comes from `options.input_format`, or is
/// auto-detected from the filename and payload. The output format comes
/// from `options.output_format`, or from the shape analyzer's
/// recommendation computed on the filtered value. Filters run in the
/// order given; `strict` turns truncation limits into hard errors.
///
/// # Errors
///
/// Unusable format tags and malformed filter specs fail before any data
/// is touched; parse, filter and encode failures arrive tagged with
/// their stage.
///
/// # Examples
///
/// ```rust
/// use llm_fmt::{convert, ConvertOptions, FilterSpec, Format};
///
/// let out = convert(
///     br#"{"users":[{"id":1,"name":"A"},{"id":2,"name":"B"}],"meta":{"page":1}}"#,
///     &ConvertOptions::new()
///         .with_filter(FilterSpec::Include { path: "users[*].name".to_string() })
///         .with_output_format(Format::Json),
/// )
/// .unwrap();
/// assert_eq!(out, r#"["A","B"]"#);
/// ```
pub fn convert(input: &[u8], options: &ConvertOptions) -> Result<String> {
    let input_format = options
        .input_format
        .unwrap_or_else(|| detect_format(options.filename.as_deref(), input));

    // Resolve everything configurable before touching the payload.
    let parser = parsers::parser_for(input_format)?;
    let chain = FilterChain::from_specs(&options.filters, options.strict)?;
    let pinned_encoder = options
        .output_format
        .map(encoders::encoder_for)
        .transpose()?;

    let value = parser.parse(input)?;
    let filtered = chain.apply(value)?;

    let encoder = match pinned_encoder {
        Some(encoder) => encoder,
        None => {
            let shape = detect_data_shape(&filtered);
            encoders::encoder_for(shape::recommend_format(&shape))?
        }
    };
    Ok(encoder.encode(&filtered)?.text)
}

/// Classify a payload's shape without encoding anything.
///
/// # Errors
///
/// Fails on parse errors or an unusable `input_format` tag.
///
/// # Examples
///
/// ```rust
/// use llm_fmt::{detect_shape, ShapeTag};
///
/// let shape = detect_shape(b"key: value\n", None).unwrap();
/// assert_eq!(shape, ShapeTag::FlatObject);
/// ```
pub fn detect_shape(input: &[u8], input_format: Option<Format>) -> Result<ShapeTag> {
    let format = input_format.unwrap_or_else(|| detect_format(None, input));
    let parser = parsers::parser_for(format)?;
    let value = parser.parse(input)?;
    Ok(detect_data_shape(&value).shape)
}

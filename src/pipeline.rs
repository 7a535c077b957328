//! Pipeline composition: one parser, an ordered filter chain, one encoder.
//!
//! A [`Pipeline`] is wired once from format tags and filter specs via its
//! [`PipelineBuilder`], which rejects unusable configuration at build
//! time — unknown tags and malformed path expressions never survive into
//! `run`. Running is synchronous and fail-fast; the stage that failed is
//! visible in the returned [`Error`](crate::Error) variant.
//!
//! ```rust
//! use llm_fmt::{Format, Pipeline};
//!
//! let pipeline = Pipeline::builder(Format::Json)
//!     .output(Format::Toon)
//!     .build()
//!     .unwrap();
//! let out = pipeline.run(br#"{"id": 7}"#).unwrap();
//! assert_eq!(out, "id: 7");
//! ```

use crate::encoders::{encoder_for, Encoded, Encoder};
use crate::filters::{Filter, FilterChain};
use crate::parsers::{parser_for, Parser};
use crate::{FilterSpec, Format, Result};

/// A wired conversion pipeline.
pub struct Pipeline {
    parser: Box<dyn Parser>,
    filters: FilterChain,
    encoder: Box<dyn Encoder>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("parser", &self.parser.format_name())
            .field("filters", &self.filters)
            .field("encoder", &self.encoder.format_name())
            .finish()
    }
}

impl Pipeline {
    /// Starts building a pipeline that parses `input` format.
    #[must_use]
    pub fn builder(input: Format) -> PipelineBuilder {
        PipelineBuilder::new(input)
    }

    /// Parse, filter, encode. Returns the rendered text.
    ///
    /// # Errors
    ///
    /// The first stage failure aborts the run; the error arrives tagged
    /// with its stage.
    pub fn run(&self, input: &[u8]) -> Result<String> {
        self.run_detailed(input).map(|encoded| encoded.text)
    }

    /// Like [`run`](Self::run), but keeps the encoder's warnings.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_detailed(&self, input: &[u8]) -> Result<Encoded> {
        let value = self.parser.parse(input)?;
        let filtered = self.filters.apply(value)?;
        self.encoder.encode(&filtered)
    }
}

/// Builder for [`Pipeline`].
///
/// The output format defaults to TOON, the reason this crate exists.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    input: Format,
    output: Format,
    filters: Vec<FilterSpec>,
    strict: bool,
}

impl PipelineBuilder {
    /// Creates a builder for the given input format.
    #[must_use]
    pub fn new(input: Format) -> Self {
        PipelineBuilder {
            input,
            output: Format::Toon,
            filters: Vec::new(),
            strict: false,
        }
    }

    /// Sets the output format.
    #[must_use]
    pub fn output(mut self, format: Format) -> Self {
        self.output = format;
        self
    }

    /// Appends a filter spec; filters run in the order they were added.
    #[must_use]
    pub fn filter(mut self, spec: FilterSpec) -> Self {
        self.filters.push(spec);
        self
    }

    /// Appends several filter specs at once.
    #[must_use]
    pub fn filters(mut self, specs: impl IntoIterator<Item = FilterSpec>) -> Self {
        self.filters.extend(specs);
        self
    }

    /// Makes truncation limits hard errors.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolves tags and filter specs into a runnable pipeline.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownFormat`](crate::ConfigError::UnknownFormat)
    /// for a format without a parser/encoder on the requested side, and
    /// [`FilterError::InvalidPath`](crate::FilterError::InvalidPath) for
    /// malformed path expressions. Nothing fails lazily inside `run`.
    pub fn build(self) -> Result<Pipeline> {
        let parser = parser_for(self.input)?;
        let encoder = encoder_for(self.output)?;
        let filters = FilterChain::from_specs(&self.filters, self.strict)?;
        Ok(Pipeline {
            parser,
            filters,
            encoder,
        })
    }
}

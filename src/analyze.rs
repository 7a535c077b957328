//! Analysis mode: compare token cost across every output format.
//!
//! [`analyze`] parses the payload once, renders it with every registered
//! encoder, estimates the token cost of each rendering, and reports which
//! format the shape analyzer recommends. Per-encoder failures (a TSV
//! render of a nested object, say) are recorded in the report rather than
//! propagated — analysis is the one operation that tolerates them.

use serde::Serialize;

use crate::encoders::{encoder_for, Encoder};
use crate::parsers::{detect_format, parser_for, Parser};
use crate::shape::{detect_data_shape, recommend_format, DataShape};
use crate::tokens::{estimate_tokens, savings_percent};
use crate::{Format, Result};

/// Token analysis for a single output format.
#[derive(Debug, Clone, Serialize)]
pub struct FormatAnalysis {
    /// The output format.
    pub format: Format,
    /// Estimated token count, `None` when the encoder failed.
    pub tokens: Option<usize>,
    /// Savings relative to the raw input, `None` when the encoder failed.
    pub savings_percent: Option<f64>,
    /// Whether the shape analyzer recommends this format.
    pub recommended: bool,
    /// Why the encoder failed, when it did.
    pub error: Option<String>,
    /// The rendered output, kept for inspection but not serialized.
    #[serde(skip)]
    pub output: Option<String>,
}

/// Complete analysis report comparing formats.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Estimated token count of the raw input text.
    pub input_tokens: usize,
    /// Detected shape of the parsed value.
    pub data_shape: DataShape,
    /// The format the shape analyzer recommends.
    pub recommendation: Format,
    /// Per-format results, in registry order.
    pub formats: Vec<FormatAnalysis>,
}

impl AnalysisReport {
    /// The entry for the recommended format.
    #[must_use]
    pub fn recommended(&self) -> Option<&FormatAnalysis> {
        self.formats.iter().find(|f| f.recommended)
    }

    /// Tokens saved by the recommended format against the raw input.
    #[must_use]
    pub fn tokens_saved(&self) -> usize {
        self.recommended()
            .and_then(|f| f.tokens)
            .map_or(0, |tokens| self.input_tokens.saturating_sub(tokens))
    }
}

/// Analyze a payload: parse once, render in every format, compare.
///
/// # Errors
///
/// Fails only on parse errors (or an unusable `input_format` tag);
/// per-encoder failures are recorded in the report.
pub fn analyze(input: &[u8], input_format: Option<Format>) -> Result<AnalysisReport> {
    let format = input_format.unwrap_or_else(|| detect_format(None, input));
    let parser = parser_for(format)?;
    let value = parser.parse(input)?;

    let input_tokens = estimate_tokens(&String::from_utf8_lossy(input));
    let data_shape = detect_data_shape(&value);
    let recommendation = recommend_format(&data_shape);

    let mut formats = Vec::with_capacity(Format::output_formats().len());
    for &output_format in Format::output_formats() {
        let encoder = encoder_for(output_format)?;
        let analysis = match encoder.encode(&value) {
            Ok(encoded) => {
                let tokens = estimate_tokens(&encoded.text);
                FormatAnalysis {
                    format: output_format,
                    tokens: Some(tokens),
                    savings_percent: Some(savings_percent(input_tokens, tokens)),
                    recommended: output_format == recommendation,
                    error: None,
                    output: Some(encoded.text),
                }
            }
            Err(err) => FormatAnalysis {
                format: output_format,
                tokens: None,
                savings_percent: None,
                recommended: output_format == recommendation,
                error: Some(err.to_string()),
                output: None,
            },
        };
        formats.push(analysis);
    }

    Ok(AnalysisReport {
        input_tokens,
        data_shape,
        recommendation,
        formats,
    })
}

/// Render a report as pretty-printed JSON for machine consumers.
#[must_use]
pub fn report_to_json(report: &AnalysisReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyzes_a_uniform_array() {
        let input = br#"[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"}]"#;
        let report = analyze(input, Some(Format::Json)).unwrap();

        assert_eq!(report.recommendation, Format::Tsv);
        assert!(report.input_tokens > 0);
        assert_eq!(report.formats.len(), Format::output_formats().len());

        let tsv = report
            .formats
            .iter()
            .find(|f| f.format == Format::Tsv)
            .unwrap();
        assert!(tsv.recommended);
        assert!(tsv.tokens.is_some());
        assert!(tsv.savings_percent.unwrap() > 0.0);
    }

    #[test]
    fn encoder_failures_are_recorded_not_propagated() {
        let input = br#"{"a":{"b":1}}"#;
        let report = analyze(input, Some(Format::Json)).unwrap();

        let tsv = report
            .formats
            .iter()
            .find(|f| f.format == Format::Tsv)
            .unwrap();
        assert!(tsv.tokens.is_none());
        assert!(tsv.error.as_deref().unwrap().contains("not tabular"));

        let toon = report
            .formats
            .iter()
            .find(|f| f.format == Format::Toon)
            .unwrap();
        assert!(toon.tokens.is_some());
    }

    #[test]
    fn recommendation_matches_the_shape_table() {
        let input = br#"{"key":"value"}"#;
        let report = analyze(input, None).unwrap();
        assert_eq!(report.recommendation, Format::Yaml);
        assert_eq!(
            report.recommendation,
            recommend_format(&report.data_shape)
        );
    }

    #[test]
    fn report_serializes_to_json() {
        let report = analyze(br#"[1,2,3]"#, Some(Format::Json)).unwrap();
        let json = report_to_json(&report);
        assert!(json.contains("\"recommendation\""));
        assert!(json.contains("\"input_tokens\""));
    }

    #[test]
    fn parse_errors_still_propagate() {
        assert!(analyze(b"{broken", Some(Format::Json)).is_err());
    }
}

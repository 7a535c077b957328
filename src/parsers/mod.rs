//! Input parsers: bytes in, [`Value`] tree out.
//!
//! Each parser implements the [`Parser`] trait; [`parser_for`] maps a
//! [`Format`] tag to its parser and [`detect_format`] picks a format when
//! the caller did not pin one.
//!
//! Detection order:
//!
//! 1. Filename extension (`.json .yaml .yml .xml .csv .tsv`).
//! 2. Content sniffing after leading ASCII whitespace: `{` or `[` means
//!    JSON; `<?xml` or `<` means XML; a consistent tab count across at
//!    least two lines means TSV, the same for commas means CSV.
//! 3. YAML as the fallback — it is a superset of JSON and tolerates
//!    arbitrary indented text.

mod csv;
mod json;
mod xml;
mod yaml;

pub use self::csv::CsvParser;
pub use self::json::JsonParser;
pub use self::xml::XmlParser;
pub use self::yaml::YamlParser;

use std::path::Path;

use crate::error::ConfigError;
use crate::{Format, Result, Value};

/// Trait for input parsers.
///
/// Parsers hold no per-invocation state and are safe to share across
/// threads.
pub trait Parser: Send + Sync {
    /// The stable format tag of this parser (e.g. `"json"`).
    fn format_name(&self) -> &'static str;

    /// Parse raw bytes into a value tree.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`](crate::ParseError) on malformed input; no
    /// partial value is ever produced.
    fn parse(&self, input: &[u8]) -> Result<Value>;
}

/// Returns the parser registered for a format tag.
///
/// # Errors
///
/// `toon` has no parser; asking for one fails with
/// [`ConfigError::UnknownFormat`].
pub fn parser_for(format: Format) -> Result<Box<dyn Parser>> {
    match format {
        Format::Json => Ok(Box::new(JsonParser)),
        Format::Yaml => Ok(Box::new(YamlParser)),
        Format::Xml => Ok(Box::new(XmlParser::new())),
        Format::Csv => Ok(Box::new(CsvParser::new())),
        Format::Tsv => Ok(Box::new(CsvParser::tsv())),
        Format::Toon => Err(ConfigError::UnknownFormat {
            tag: format.tag().to_string(),
        }
        .into()),
    }
}

/// Auto-detect the input format from an optional filename and the payload.
///
/// Never fails: anything unrecognized falls back to YAML.
#[must_use]
pub fn detect_format(filename: Option<&str>, data: &[u8]) -> Format {
    if let Some(name) = filename {
        if let Some(format) = format_from_extension(name) {
            return format;
        }
    }
    detect_from_content(data)
}

/// Map a filename extension to a format tag.
fn format_from_extension(filename: &str) -> Option<Format> {
    let ext = Path::new(filename).extension()?.to_str()?;
    match ext.to_ascii_lowercase().as_str() {
        "json" => Some(Format::Json),
        "yaml" | "yml" => Some(Format::Yaml),
        "xml" => Some(Format::Xml),
        "csv" => Some(Format::Csv),
        "tsv" => Some(Format::Tsv),
        _ => None,
    }
}

/// Sniff the payload content.
fn detect_from_content(data: &[u8]) -> Format {
    let trimmed = trim_ascii_start(data);

    match trimmed.first() {
        Some(b'{') | Some(b'[') => return Format::Json,
        Some(b'<') => return Format::Xml,
        _ => {}
    }

    if let Ok(text) = std::str::from_utf8(trimmed) {
        if delimited_lines(text, '\t') {
            return Format::Tsv;
        }
        if delimited_lines(text, ',') {
            return Format::Csv;
        }
    }

    Format::Yaml
}

fn trim_ascii_start(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[start..]
}

/// True when the first line contains `delim` and every subsequent
/// non-empty line carries the same delimiter count. Requires at least
/// two lines, so a lone comma-bearing sentence stays YAML.
fn delimited_lines(text: &str, delim: char) -> bool {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let first = match lines.next() {
        Some(line) => line,
        None => return false,
    };
    let expected = first.matches(delim).count();
    if expected == 0 {
        return false;
    }
    let mut rest = lines.peekable();
    if rest.peek().is_none() {
        return false;
    }
    rest.all(|line| line.matches(delim).count() == expected)
}

//! Output encoders: [`Value`] tree in, text out.
//!
//! Each encoder implements the [`Encoder`] trait and returns an
//! [`Encoded`] result: the text plus any warnings accumulated while
//! encoding (the tabular encoders stringify nested cell values through
//! compact JSON and note that they did). [`encoder_for`] maps a
//! [`Format`] tag to its encoder.
//!
//! Encoders are total on every legal value except where the format
//! fundamentally cannot hold the root — TSV/CSV of a non-tabular value
//! fails with [`EncodeError::NotTabular`](crate::EncodeError::NotTabular).

mod csv;
mod json;
mod toon;
mod tsv;
mod yaml;

pub use self::csv::CsvEncoder;
pub use self::json::JsonEncoder;
pub use self::toon::ToonEncoder;
pub use self::tsv::TsvEncoder;
pub use self::yaml::YamlEncoder;

use crate::error::ConfigError;
use crate::{Format, Result, Value};

/// Encoder output: the rendered text plus non-fatal warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// The rendered document.
    pub text: String,
    /// Fallback notes, e.g. a nested value stringified into a CSV cell.
    pub warnings: Vec<String>,
}

impl Encoded {
    /// Wraps text produced without warnings.
    #[must_use]
    pub const fn clean(text: String) -> Self {
        Encoded {
            text,
            warnings: Vec::new(),
        }
    }
}

/// Trait for output encoders.
///
/// Encoders hold no per-invocation state and are safe to share across
/// threads; each call builds its output into one growable buffer.
pub trait Encoder: Send + Sync {
    /// The stable format tag of this encoder (e.g. `"toon"`).
    fn format_name(&self) -> &'static str;

    /// Render a value tree.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`](crate::EncodeError) when the format
    /// cannot hold the root value at all.
    fn encode(&self, value: &Value) -> Result<Encoded>;
}

/// Returns the encoder registered for a format tag.
///
/// # Errors
///
/// `xml` has no encoder; asking for one fails with
/// [`ConfigError::UnknownFormat`].
pub fn encoder_for(format: Format) -> Result<Box<dyn Encoder>> {
    match format {
        Format::Toon => Ok(Box::new(ToonEncoder)),
        Format::Json => Ok(Box::new(JsonEncoder::new(false))),
        Format::Yaml => Ok(Box::new(YamlEncoder::new())),
        Format::Tsv => Ok(Box::new(TsvEncoder)),
        Format::Csv => Ok(Box::new(CsvEncoder)),
        Format::Xml => Err(ConfigError::UnknownFormat {
            tag: format.tag().to_string(),
        }
        .into()),
    }
}

/// The shape the tabular encoders accept at the root.
enum TableRoot<'a> {
    /// Array of objects: header is the union of keys in first-occurrence
    /// order; rows fill missing cells with empties.
    Objects {
        header: Vec<&'a str>,
        rows: &'a [Value],
    },
    /// Array of arrays: raw rows, no header.
    Rows(&'a [Value]),
}

/// Classify the root for TSV/CSV. `None` means not tabular.
fn table_root(value: &Value) -> Option<TableRoot<'_>> {
    let arr = value.as_array()?;
    if arr.iter().all(Value::is_object) {
        let mut header: Vec<&str> = Vec::new();
        for row in arr {
            if let Some(obj) = row.as_object() {
                for key in obj.keys() {
                    if !header.contains(&key.as_str()) {
                        header.push(key);
                    }
                }
            }
        }
        return Some(TableRoot::Objects { header, rows: arr });
    }
    if arr.iter().all(Value::is_array) && !arr.is_empty() {
        return Some(TableRoot::Rows(arr));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_has_no_encoder() {
        assert!(encoder_for(Format::Xml).is_err());
    }

    #[test]
    fn registry_tags_match() {
        for format in Format::output_formats() {
            let encoder = encoder_for(*format).unwrap();
            assert_eq!(encoder.format_name(), format.tag());
        }
    }
}

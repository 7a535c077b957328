//! TSV encoder.
//!
//! Tabs tokenize more efficiently than commas in most BPE vocabularies,
//! making TSV the cheapest format for flat tabular data. There is no
//! quoting mechanism: literal tabs, newlines and backslashes inside a
//! cell become two-character escapes.

use crate::error::EncodeError;
use crate::value::{Number, Value};
use crate::Result;

use super::{table_root, Encoded, Encoder, JsonEncoder, TableRoot};

/// Encoder for TSV output.
///
/// The root must be an array of objects (header row is the union of keys
/// in first-occurrence order, missing cells stay empty) or an array of
/// arrays (no header). Nested cell values are stringified through the
/// compact JSON encoder and noted as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TsvEncoder;

impl Encoder for TsvEncoder {
    fn format_name(&self) -> &'static str {
        "tsv"
    }

    fn encode(&self, value: &Value) -> Result<Encoded> {
        let root = table_root(value).ok_or(EncodeError::NotTabular { encoder: "tsv" })?;
        let mut warnings = Vec::new();
        let mut lines: Vec<String> = Vec::new();

        match root {
            TableRoot::Objects { header, rows } => {
                if header.is_empty() {
                    return Ok(Encoded::clean(String::new()));
                }
                lines.push(
                    header
                        .iter()
                        .map(|h| escape_tsv(h))
                        .collect::<Vec<_>>()
                        .join("\t"),
                );
                for (row_index, row) in rows.iter().enumerate() {
                    let cells: Vec<String> = header
                        .iter()
                        .map(|key| match row.get(key) {
                            Some(cell) => encode_cell(cell, row_index, key, &mut warnings),
                            None => String::new(),
                        })
                        .collect();
                    lines.push(cells.join("\t"));
                }
            }
            TableRoot::Rows(rows) => {
                for (row_index, row) in rows.iter().enumerate() {
                    let cells: Vec<String> = row
                        .as_array()
                        .map(Vec::as_slice)
                        .unwrap_or_default()
                        .iter()
                        .enumerate()
                        .map(|(col, cell)| {
                            encode_cell(cell, row_index, &col.to_string(), &mut warnings)
                        })
                        .collect();
                    lines.push(cells.join("\t"));
                }
            }
        }

        Ok(Encoded {
            text: lines.join("\n"),
            warnings,
        })
    }
}

fn encode_cell(value: &Value, row: usize, column: &str, warnings: &mut Vec<String>) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Number(n) => encode_number(n),
        Value::String(s) => escape_tsv(s),
        nested => {
            warnings.push(format!(
                "tsv: nested value at row {row}, column '{column}' encoded as JSON"
            ));
            let json = JsonEncoder::new(false)
                .encode(nested)
                .map(|e| e.text)
                .unwrap_or_default();
            escape_tsv(&json)
        }
    }
}

fn encode_number(n: &Number) -> String {
    match n {
        Number::Integer(i) => i.to_string(),
        Number::Float(f) => f.to_string(),
    }
}

/// Escape tabs, newlines and backslashes; backslashes first so the
/// escapes themselves stay unambiguous.
fn escape_tsv(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

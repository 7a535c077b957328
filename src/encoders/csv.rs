//! CSV encoder (RFC 4180).

use crate::error::EncodeError;
use crate::value::{Number, Value};
use crate::Result;

use super::{table_root, Encoded, Encoder, JsonEncoder, TableRoot};

/// Encoder for CSV output.
///
/// The root must be an array of objects (header row is the union of keys
/// in first-occurrence order, missing cells stay empty) or an array of
/// arrays (no header). A cell is quoted iff it contains a comma, a
/// double quote, `\r` or `\n`; embedded quotes are doubled. Nested cell
/// values are stringified through the compact JSON encoder and noted as
/// a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvEncoder;

impl Encoder for CsvEncoder {
    fn format_name(&self) -> &'static str {
        "csv"
    }

    fn encode(&self, value: &Value) -> Result<Encoded> {
        let root = table_root(value).ok_or(EncodeError::NotTabular { encoder: "csv" })?;
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
                        .map(|h| escape_csv(h))
                        .collect::<Vec<_>>()
                        .join(","),
                );
                for (row_index, row) in rows.iter().enumerate() {
                    let cells: Vec<String> = header
                        .iter()
                        .map(|key| match row.get(key) {
                            Some(cell) => encode_cell(cell, row_index, key, &mut warnings),
                            None => String::new(),
                        })
                        .collect();
                    lines.push(cells.join(","));
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
                    lines.push(cells.join(","));
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
        Value::String(s) => escape_csv(s),
        nested => {
            warnings.push(format!(
                "csv: nested value at row {row}, column '{column}' encoded as JSON"
            ));
            let json = JsonEncoder::new(false)
                .encode(nested)
                .map(|e| e.text)
                .unwrap_or_default();
            escape_csv(&json)
        }
    }
}

fn encode_number(n: &Number) -> String {
    match n {
        Number::Integer(i) => i.to_string(),
        Number::Float(f) => f.to_string(),
    }
}

/// RFC 4180: quote iff the cell contains the delimiter, a quote or a
/// line break; embedded quotes are doubled.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

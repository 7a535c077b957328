//! CSV/TSV parser (RFC 4180 quoting).

use crate::error::ParseError;
use crate::{Result, Value, ValueMap};

use super::Parser;

/// Parser for delimiter-separated input.
///
/// With a header row (the default) every subsequent row becomes an Object
/// keyed by the header; without one, rows become Arrays. Cell values are
/// always strings — no type coercion. Quoting follows RFC 4180, and
/// embedded newlines inside quoted fields survive.
#[derive(Debug, Clone, Copy)]
pub struct CsvParser {
    delimiter: u8,
    has_header: bool,
    format: &'static str,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvParser {
    /// Comma-delimited parser with a header row.
    #[must_use]
    pub const fn new() -> Self {
        CsvParser {
            delimiter: b',',
            has_header: true,
            format: "csv",
        }
    }

    /// Tab-delimited parser with a header row.
    #[must_use]
    pub const fn tsv() -> Self {
        CsvParser {
            delimiter: b'\t',
            has_header: true,
            format: "tsv",
        }
    }

    /// Toggles header handling. Without a header, rows parse as Arrays of
    /// string cells.
    #[must_use]
    pub const fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    fn convert_error(&self, err: &csv::Error) -> ParseError {
        match err.position() {
            Some(pos) => ParseError::at_offset(self.format, pos.byte() as usize, err.to_string()),
            None => ParseError::new(self.format, err.to_string()),
        }
    }
}

impl Parser for CsvParser {
    fn format_name(&self) -> &'static str {
        self.format
    }

    fn parse(&self, input: &[u8]) -> Result<Value> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut rows: Vec<csv::StringRecord> = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| self.convert_error(&e))?;
            rows.push(record);
        }

        if rows.is_empty() {
            return Ok(Value::Array(vec![]));
        }

        if self.has_header {
            let header = rows.remove(0);
            let headers: Vec<String> = header.iter().map(str::to_string).collect();
            let objects = rows
                .into_iter()
                .map(|row| {
                    let mut obj = ValueMap::with_capacity(headers.len());
                    // A short row simply omits the trailing columns.
                    for (key, cell) in headers.iter().zip(row.iter()) {
                        obj.insert(key.clone(), Value::String(cell.to_string()));
                    }
                    Value::Object(obj)
                })
                .collect();
            Ok(Value::Array(objects))
        } else {
            let arrays = rows
                .into_iter()
                .map(|row| {
                    Value::Array(
                        row.iter()
                            .map(|cell| Value::String(cell.to_string()))
                            .collect(),
                    )
                })
                .collect();
            Ok(Value::Array(arrays))
        }
    }
}

//! JSON output format.

use isshist_types::TradeRecord;
use std::io::Write;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
///
/// Records are serialized with their `class` tag, so equity and bond rows can
/// share one output.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    style: JsonStyle,
    /// Only applies to array style.
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }
}

impl Formatter for JsonFormatter {
    fn write_records<W: Write + Send>(
        &self,
        records: &[TradeRecord],
        mut writer: W,
    ) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, records)?;
                } else {
                    serde_json::to_writer(&mut writer, records)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for record in records {
                    serde_json::to_writer(&mut writer, record)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use serde_json::Value;
    use std::io::Cursor;

    #[test]
    fn test_json_array() {
        let formatter = JsonFormatter::new();
        let records = vec![fixtures::equity(), fixtures::bond(None)];
        let mut output = Cursor::new(Vec::new());

        formatter.write_records(&records, &mut output).unwrap();

        let parsed: Value = serde_json::from_slice(&output.into_inner()).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["class"], "equity");
        assert_eq!(rows[0]["secid"], "SBER");
        assert_eq!(rows[1]["class"], "bond");
        assert!(rows[1]["expiration"].is_null());
    }

    #[test]
    fn test_ndjson_lines_parse_back() {
        let formatter = JsonFormatter::ndjson();
        let records = vec![fixtures::equity(), fixtures::bond(None)];
        let mut output = Cursor::new(Vec::new());

        formatter.write_records(&records, &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let back: Vec<TradeRecord> = result
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(back, records);
        assert_eq!(formatter.extension(), "ndjson");
    }

    #[test]
    fn test_pretty_json() {
        let formatter = JsonFormatter::new().with_pretty(true);
        let mut output = Cursor::new(Vec::new());

        formatter
            .write_records(&[fixtures::equity()], &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains("\n  "));
    }

    #[test]
    fn test_empty_array() {
        let mut output = Cursor::new(Vec::new());
        JsonFormatter::new().write_records(&[], &mut output).unwrap();
        assert_eq!(output.into_inner(), b"[]\n");
    }
}

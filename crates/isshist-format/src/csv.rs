//! CSV output format.

use isshist_types::TradeRecord;
use std::borrow::Cow;
use std::io::Write;

use crate::{COLUMNS, FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone, Default)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }

    /// Quotes a text field if it contains the delimiter, a quote or a line break.
    fn escape<'a>(&self, field: &'a str) -> Cow<'a, str> {
        if field.contains([self.delimiter, '"', '\n', '\r']) {
            Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
        } else {
            Cow::Borrowed(field)
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_records<W: Write + Send>(
        &self,
        records: &[TradeRecord],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(writer, "{}", COLUMNS.join(d.to_string().as_str()))?;
        }

        for record in records {
            let f = record.fields();
            write!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}",
                self.escape(&f.board),
                f.trade_date.format("%Y-%m-%d"),
                self.escape(&f.short_name),
                self.escape(&f.secid),
                f.num_trades,
                f.value,
                f.open,
                f.low,
                f.high,
                f.close,
            )?;

            match record.as_bond() {
                Some(bond) => {
                    if let Some(expiration) = bond.expiration {
                        write!(writer, "{}", expiration.format("%Y-%m-%d"))?;
                    }
                    writeln!(
                        writer,
                        "{d}{}{d}{}",
                        bond.nominal_value,
                        self.escape(&bond.unit)
                    )?;
                }
                None => writeln!(writer, "{d}{d}")?,
            }
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}

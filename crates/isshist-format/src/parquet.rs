//! Apache Parquet output format.

use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::RecordBatch;
use isshist_types::TradeRecord;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, Formatter};

/// Parquet formatter.
///
/// Prices are stored as `Float64`. Bond-only columns are null for equities.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

fn as_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Creates the Arrow schema for trade records.
    fn record_schema() -> Schema {
        Schema::new(vec![
            Field::new("board", DataType::Utf8, false),
            Field::new("trade_date", DataType::Date32, false),
            Field::new("short_name", DataType::Utf8, false),
            Field::new("secid", DataType::Utf8, false),
            Field::new("num_trades", DataType::UInt64, false),
            Field::new("value", DataType::Float64, false),
            Field::new("open", DataType::Float64, false),
            Field::new("low", DataType::Float64, false),
            Field::new("high", DataType::Float64, false),
            Field::new("close", DataType::Float64, false),
            Field::new("expiration", DataType::Date32, true),
            Field::new("nominal_value", DataType::Float64, true),
            Field::new("unit", DataType::Utf8, true),
        ])
    }

    /// Converts records to an Arrow RecordBatch.
    fn records_to_batch(records: &[TradeRecord]) -> Result<RecordBatch, FormatError> {
        let fields: Vec<_> = records.iter().map(TradeRecord::fields).collect();
        let bonds: Vec<_> = records.iter().map(TradeRecord::as_bond).collect();

        let price = |get: fn(&isshist_types::TradeFields) -> Decimal| -> ArrayRef {
            Arc::new(Float64Array::from(
                fields.iter().map(|f| as_f64(get(f))).collect::<Vec<_>>(),
            ))
        };

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(
                fields.iter().map(|f| f.board.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Date32Array::from(
                fields
                    .iter()
                    .map(|f| Date32Type::from_naive_date(f.trade_date))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                fields.iter().map(|f| f.short_name.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                fields.iter().map(|f| f.secid.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(UInt64Array::from(
                fields.iter().map(|f| f.num_trades).collect::<Vec<_>>(),
            )),
            price(|f| f.value),
            price(|f| f.open),
            price(|f| f.low),
            price(|f| f.high),
            price(|f| f.close),
            Arc::new(Date32Array::from(
                bonds
                    .iter()
                    .map(|b| b.and_then(|b| b.expiration).map(Date32Type::from_naive_date))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                bonds
                    .iter()
                    .map(|b| b.map(|b| as_f64(b.nominal_value)))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                bonds
                    .iter()
                    .map(|b| b.map(|b| b.unit.as_str()))
                    .collect::<Vec<_>>(),
            )),
        ];

        RecordBatch::try_new(Arc::new(Self::record_schema()), columns)
            .map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

impl Formatter for ParquetFormatter {
    fn write_records<W: Write + Send>(
        &self,
        records: &[TradeRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Arc::new(Self::record_schema());
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, schema, Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in records.chunks(self.row_group_size) {
            let batch = Self::records_to_batch(chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}

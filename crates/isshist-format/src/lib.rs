//! Output formatters for isshist trade history records.
//!
//! This crate provides formatters for writing [`TradeRecord`](isshist_types::TradeRecord)
//! slices to various output formats:
//!
//! - [`CsvFormatter`] - CSV/TSV format
//! - [`JsonFormatter`] - JSON array or NDJSON format
//! - [`ParquetFormatter`] - Apache Parquet columnar format

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;

#[cfg(feature = "parquet")]
mod parquet;

#[cfg(test)]
mod fixtures;

pub use crate::csv::CsvFormatter;
pub use formatter::{COLUMNS, FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;

//! Rust library for downloading MOEX ISS trade history.
//!
//! This is a facade crate that re-exports functionality from the isshist
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use isshist_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = HistoryFetcher::with_defaults(IssClient::with_defaults()?);
//!
//!     let outcome = fetcher
//!         .fetch_all_for_day(Market::Shares, "TQBR", "2020-09-08")
//!         .await;
//!     if outcome.is_partial() {
//!         eprintln!("partial result: {:?}", outcome.error());
//!     }
//!
//!     for record in outcome.into_records()? {
//!         println!("{} {}", record.secid(), record.fields().close);
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use isshist_types::*;

// Re-export board registry
pub use isshist_boards::BoardRegistry;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use isshist_fetch::{
    ClientConfig, CursorMeta, FetchConfig, HistoryFetcher, ISS_PAGE_SIZE, IssClient, RawPage,
    Transport, decode_page, normalize_page, url,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use isshist_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use isshist_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use isshist_lib::prelude::*;
/// ```
pub mod prelude {
    pub use isshist_types::{
        BondTrade, FetchError, FetchMode, FetchOutcome, FetchStatus, InstrumentClass,
        IsshistError, Market, Result, TradeFields, TradeRecord,
    };

    pub use isshist_boards::BoardRegistry;

    #[cfg(feature = "fetch")]
    pub use isshist_fetch::{ClientConfig, FetchConfig, HistoryFetcher, IssClient, Transport};

    #[cfg(feature = "format")]
    pub use isshist_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use isshist_format::ParquetFormatter;
}

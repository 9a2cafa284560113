//! Core types for the isshist MOEX trade history client.
//!
//! This crate provides the fundamental data structures used throughout isshist:
//!
//! - [`Market`] / [`InstrumentClass`] - ISS market path segment and the row layout it implies
//! - [`Board`] - Trading-mode partition of a market with metadata
//! - [`TradeRecord`] - One normalized history row, equity or bond
//! - [`FetchOutcome`] - Records accumulated by one fetch plus how complete they are
//! - [`FetchError`] / [`RowError`] - Failure taxonomy of the fetch pipeline

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod market;
mod outcome;
mod record;

pub use error::{DecodeError, FetchError, IsshistError, Result, RowError, TransportError};
pub use market::{Board, InstrumentClass, Market, MarketParseError};
pub use outcome::{FetchMode, FetchOutcome, FetchStatus, RowRejection};
pub use record::{BondTrade, TradeFields, TradeRecord};

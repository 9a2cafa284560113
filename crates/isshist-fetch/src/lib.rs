//! Paginated retrieval of MOEX ISS trade history.
//!
//! This crate provides the fetch pipeline:
//!
//! - [`url`] - History endpoint URL construction
//! - [`IssClient`] - reqwest-backed [`Transport`]
//! - [`decode_page`] - Response body decoding with cursor metadata
//! - [`normalize_page`] - Positional row mapping for share and bond layouts
//! - [`CursorCountPager`] / [`ProbeNextEmptyPager`] / [`IncrementUntilEmptyPager`] - Pagination strategies
//! - [`HistoryFetcher`] - The three retrieval operations with bounded retry

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod fetcher;
mod normalize;
mod page;
mod paginate;
pub mod url;

pub use client::{ClientConfig, IssClient, Transport};
pub use fetcher::{FetchConfig, HistoryFetcher};
pub use normalize::{
    BONDS_LAYOUT, BondColumns, Column, ColumnLayout, CommonColumns, ISS_HISTORY_SCHEMA,
    NormalizedPage, SHARES_LAYOUT, normalize_page, normalize_rows,
};
pub use page::{CursorMeta, RawPage, decode_page};
pub use paginate::{
    Continuation, CursorCountPager, ISS_PAGE_SIZE, IncrementUntilEmptyPager, PageView, Paginator,
    ProbeNextEmptyPager,
};

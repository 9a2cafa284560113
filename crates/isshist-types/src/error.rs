//! Error types for isshist.

use thiserror::Error;

/// Result type alias for isshist operations.
pub type Result<T> = std::result::Result<T, IsshistError>;

/// Top-level errors surfaced by isshist crates.
#[derive(Error, Debug)]
pub enum IsshistError {
    /// Unknown market name.
    #[error(transparent)]
    Market(#[from] crate::MarketParseError),

    /// Board not present in the registry.
    #[error("Unknown board: {0}")]
    UnknownBoard(String),
}

/// Connection-level failure reported by the transport.
///
/// Every variant is considered transient: the request may succeed if issued again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
}

/// A response body that could not be turned into a page.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Body is not JSON or lacks the `history` block.
    #[error("invalid history payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Day queries need `history.cursor` to know when to stop.
    #[error("response has no history.cursor block")]
    MissingCursor,

    /// The cursor block exists but is not `[[index, total, pageSize]]`.
    #[error("malformed history.cursor: {0}")]
    MalformedCursor(String),

    /// The served column names do not match the expected layout.
    #[error("column {index} is {found:?}, expected {expected:?} (schema {schema})")]
    SchemaMismatch {
        /// Column position.
        index: usize,
        /// Name the layout expects at that position.
        expected: &'static str,
        /// Name the server sent, if the position exists at all.
        found: Option<String>,
        /// Schema version of the layout.
        schema: &'static str,
    },
}

/// Why a single history row was dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// Row has fewer columns than the layout reads.
    #[error("row has {len} columns, layout needs {needed}")]
    TooShort {
        /// Columns present.
        len: usize,
        /// Columns required.
        needed: usize,
    },

    /// A required text column is null or not a string.
    #[error("column {column} must be a non-null string")]
    MissingText {
        /// Column name.
        column: &'static str,
    },

    /// A date column is not `YYYY-MM-DD`.
    #[error("column {column} has unparseable date {value:?}")]
    InvalidDate {
        /// Column name.
        column: &'static str,
        /// Raw value as served.
        value: String,
    },

    /// A numeric column holds something that is not a usable number.
    #[error("column {column} has invalid number {value}")]
    InvalidNumber {
        /// Column name.
        column: &'static str,
        /// Raw value as served.
        value: String,
    },
}

/// Why a fetch stopped before the pagination finished.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The transport failed on a request that is never retried.
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    /// The response body could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A page kept failing past the consecutive-failure bound.
    #[error("page at start={offset} failed {attempts} consecutive times: {last}")]
    RetriesExhausted {
        /// Offset of the page that could not be fetched.
        offset: u64,
        /// Consecutive failures observed.
        attempts: u32,
        /// The last transport error.
        last: TransportError,
    },
}

impl FetchError {
    /// Returns true if the error came from the transport rather than the payload.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::RetriesExhausted { .. })
    }
}

//! Result of one fetch operation.

use crate::{FetchError, RowError, TradeRecord};

/// Which retrieval operation produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchMode {
    /// All instruments on a board for one day.
    Day,
    /// One instrument between two dates.
    Range,
    /// One instrument, every page the server has.
    FullHistory,
}

impl FetchMode {
    /// Returns the mode as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Range => "range",
            Self::FullHistory => "full-history",
        }
    }
}

impl std::fmt::Display for FetchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How far a fetch got.
#[derive(Debug)]
pub enum FetchStatus {
    /// Pagination reached its termination condition.
    Complete,
    /// Some pages were merged, then a later request gave up.
    Partial(FetchError),
    /// The opening request failed; nothing was fetched.
    Failed(FetchError),
}

/// A row the normalizer dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    /// Position of the row in the accumulated row stream, counting rejected rows.
    pub index: usize,
    /// Why the row was dropped.
    pub reason: RowError,
}

/// Records accumulated by one fetch operation.
///
/// Records keep the order the server emitted them: rows within a page first,
/// pages in request order. Nothing is deduplicated.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Operation that produced this outcome.
    pub mode: FetchMode,
    /// Normalized records.
    pub records: Vec<TradeRecord>,
    /// Rows dropped during normalization.
    pub rejected: Vec<RowRejection>,
    /// HTTP requests issued, retries included.
    pub requests: u32,
    /// Completion indicator.
    pub status: FetchStatus,
}

impl FetchOutcome {
    /// Returns true if pagination finished normally.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.status, FetchStatus::Complete)
    }

    /// Returns true if some data was fetched before a later request gave up.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        matches!(self.status, FetchStatus::Partial(_))
    }

    /// Returns true if the opening request failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, FetchStatus::Failed(_))
    }

    /// Returns the error that stopped the fetch, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&FetchError> {
        match &self.status {
            FetchStatus::Complete => None,
            FetchStatus::Partial(e) | FetchStatus::Failed(e) => Some(e),
        }
    }

    /// Returns true if no records were fetched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records fetched.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Converts the outcome into its records, failing only if the opening request failed.
    ///
    /// Partial results are returned as data; check [`Self::is_partial`] first if
    /// completeness matters.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when the status is [`FetchStatus::Failed`].
    pub fn into_records(self) -> Result<Vec<TradeRecord>, FetchError> {
        match self.status {
            FetchStatus::Failed(e) => Err(e),
            FetchStatus::Complete | FetchStatus::Partial(_) => Ok(self.records),
        }
    }
}

//! Pagination strategies, one per retrieval mode.
//!
//! Each strategy is a small state machine over an integer offset (the ISS
//! `start` parameter). The fetcher feeds it a [`PageView`] after every
//! successful page and asks it for the next offset. After a transient failure
//! the fetcher calls [`Paginator::rewind`] to get the offset of the page that
//! failed, so the same page is requested again.

use crate::page::CursorMeta;

/// Rows ISS serves per history page.
///
/// Range and full-history queries carry no cursor metadata, so this size is
/// assumed rather than read from the server. If ISS ever changes its page
/// size, those two modes will stop early or skip rows.
pub const ISS_PAGE_SIZE: u64 = 100;

/// What a strategy needs to know about the page just received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    /// Rows the server returned, including rows the normalizer later rejected.
    pub rows: usize,
    /// Cursor metadata, if the response carried it.
    pub cursor: Option<CursorMeta>,
}

impl PageView {
    /// Creates a view of a page without cursor metadata.
    #[must_use]
    pub const fn rows(rows: usize) -> Self {
        Self { rows, cursor: None }
    }
}

/// Decision taken after a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Request the page at this offset next.
    Fetch(u64),
    /// Pagination is finished.
    Done,
}

/// A pagination strategy.
pub trait Paginator {
    /// Whether the opening response must carry `history.cursor`.
    const REQUIRES_CURSOR: bool = false;

    /// Offset for the opening request; `None` omits the `start` parameter.
    fn first_offset(&self) -> Option<u64>;

    /// Consumes the page just received and decides whether another is needed.
    fn advance(&mut self, page: &PageView) -> Continuation;

    /// Returns the offset to re-request after a transient failure.
    ///
    /// This is always the offset of the page that failed.
    fn rewind(&mut self) -> u64;
}

/// Day mode: follows server-reported `total` and `pageSize`.
///
/// Requests continue while `cursor + pageSize < total`. The cursor metadata of
/// the opening page is authoritative for the whole query.
#[derive(Debug, Clone, Default)]
pub struct CursorCountPager {
    cursor: u64,
    meta: Option<CursorMeta>,
}

impl CursorCountPager {
    /// Creates a pager positioned at offset 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cursor: 0,
            meta: None,
        }
    }

    /// Returns the current cursor.
    #[must_use]
    pub const fn cursor(&self) -> u64 {
        self.cursor
    }

    fn step(&mut self) -> Continuation {
        let Some(meta) = self.meta else {
            return Continuation::Done;
        };
        // Cursor values come from the server; an offset past u64 ends the walk.
        match self.cursor.checked_add(meta.page_size) {
            Some(next) if next < meta.total => {
                self.cursor = next;
                Continuation::Fetch(next)
            }
            _ => Continuation::Done,
        }
    }
}

impl Paginator for CursorCountPager {
    const REQUIRES_CURSOR: bool = true;

    fn first_offset(&self) -> Option<u64> {
        None
    }

    fn advance(&mut self, page: &PageView) -> Continuation {
        if self.meta.is_none() {
            self.meta = page.cursor;
        }
        self.step()
    }

    // Step back one page and re-run the advance condition, which lands on
    // the failed page again.
    fn rewind(&mut self) -> u64 {
        let page_size = self.meta.map_or(ISS_PAGE_SIZE, |m| m.page_size);
        self.cursor = self.cursor.saturating_sub(page_size);
        match self.step() {
            Continuation::Fetch(offset) => offset,
            Continuation::Done => self.cursor,
        }
    }
}

/// Range mode: a short first page is complete; otherwise probe until an empty page.
#[derive(Debug, Clone, Default)]
pub struct ProbeNextEmptyPager {
    state: ProbeState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ProbeState {
    #[default]
    First,
    Probing(u64),
    Finished,
}

impl ProbeNextEmptyPager {
    /// Creates a pager awaiting its opening page.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ProbeState::First,
        }
    }

    /// Returns true once an empty or short page ended the query.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == ProbeState::Finished
    }
}

impl Paginator for ProbeNextEmptyPager {
    fn first_offset(&self) -> Option<u64> {
        None
    }

    fn advance(&mut self, page: &PageView) -> Continuation {
        let next = match self.state {
            ProbeState::First if (page.rows as u64) < ISS_PAGE_SIZE => None,
            ProbeState::First => Some(ISS_PAGE_SIZE),
            ProbeState::Probing(_) if page.rows == 0 => None,
            ProbeState::Probing(offset) => Some(offset + ISS_PAGE_SIZE),
            ProbeState::Finished => None,
        };

        match next {
            Some(offset) => {
                self.state = ProbeState::Probing(offset);
                Continuation::Fetch(offset)
            }
            None => {
                self.state = ProbeState::Finished;
                Continuation::Done
            }
        }
    }

    fn rewind(&mut self) -> u64 {
        match self.state {
            ProbeState::Probing(offset) => offset,
            ProbeState::First | ProbeState::Finished => 0,
        }
    }
}

/// Full-history mode: advance by one page after every non-empty page.
///
/// The first empty page is the terminal signal.
#[derive(Debug, Clone, Default)]
pub struct IncrementUntilEmptyPager {
    state: IncrementState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IncrementState {
    At(u64),
    Finished,
}

impl Default for IncrementState {
    fn default() -> Self {
        Self::At(0)
    }
}

impl IncrementUntilEmptyPager {
    /// Creates a pager starting at offset 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: IncrementState::At(0),
        }
    }

    /// Returns the current offset, or `None` after the terminal empty page.
    #[must_use]
    pub const fn offset(&self) -> Option<u64> {
        match self.state {
            IncrementState::At(offset) => Some(offset),
            IncrementState::Finished => None,
        }
    }
}

impl Paginator for IncrementUntilEmptyPager {
    fn first_offset(&self) -> Option<u64> {
        Some(0)
    }

    fn advance(&mut self, page: &PageView) -> Continuation {
        match self.state {
            IncrementState::At(offset) if page.rows > 0 => {
                let next = offset + ISS_PAGE_SIZE;
                self.state = IncrementState::At(next);
                Continuation::Fetch(next)
            }
            _ => {
                self.state = IncrementState::Finished;
                Continuation::Done
            }
        }
    }

    fn rewind(&mut self) -> u64 {
        match self.state {
            IncrementState::At(offset) => offset,
            IncrementState::Finished => 0,
        }
    }
}

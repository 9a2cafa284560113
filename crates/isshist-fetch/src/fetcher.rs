//! Retrieval operations over the ISS history API.

use std::time::Duration;

use isshist_types::{
    DecodeError, FetchError, FetchMode, FetchOutcome, FetchStatus, InstrumentClass, Market,
    RowRejection, TradeRecord,
};
use tracing::{debug, error, info, warn};

use crate::client::Transport;
use crate::normalize::{NormalizedPage, normalize_page};
use crate::page::{CursorMeta, decode_page};
use crate::paginate::{
    Continuation, CursorCountPager, IncrementUntilEmptyPager, PageView, Paginator,
    ProbeNextEmptyPager,
};
use crate::url;

/// Configuration for [`HistoryFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL of the ISS history engine, ending in `/engines/stock/`.
    pub base_url: String,
    /// Pause before every page request after the first.
    pub page_delay: Duration,
    /// Consecutive transient failures tolerated on follow-up pages.
    ///
    /// One more failure than this ends the fetch as partial.
    pub max_consecutive_failures: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: url::BASE_URL.to_string(),
            page_delay: Duration::from_millis(10),
            max_consecutive_failures: 3,
        }
    }
}

/// Rows decoded from one HTTP response.
#[derive(Debug)]
struct PageResult {
    normalized: NormalizedPage,
    rows: usize,
    cursor: Option<CursorMeta>,
}

impl PageResult {
    const fn view(&self) -> PageView {
        PageView {
            rows: self.rows,
            cursor: self.cursor,
        }
    }
}

/// Accumulator owned by one fetch operation.
#[derive(Debug)]
struct FetchSession {
    mode: FetchMode,
    records: Vec<TradeRecord>,
    rejected: Vec<RowRejection>,
    requests: u32,
    rows_seen: usize,
}

impl FetchSession {
    const fn new(mode: FetchMode) -> Self {
        Self {
            mode,
            records: Vec::new(),
            rejected: Vec::new(),
            requests: 0,
            rows_seen: 0,
        }
    }

    fn merge(&mut self, page: PageResult) {
        let offset = self.rows_seen;
        self.records.extend(page.normalized.records);
        self.rejected.extend(
            page.normalized
                .rejected
                .into_iter()
                .map(|(index, reason)| RowRejection {
                    index: offset + index,
                    reason,
                }),
        );
        self.rows_seen += page.rows;
    }

    fn finish(self, status: FetchStatus) -> FetchOutcome {
        FetchOutcome {
            mode: self.mode,
            records: self.records,
            rejected: self.rejected,
            requests: self.requests,
            status,
        }
    }
}

/// Fetches trade history through a [`Transport`].
///
/// Each operation owns its accumulator, so one fetcher can serve several
/// operations concurrently.
#[derive(Debug, Clone)]
pub struct HistoryFetcher<T> {
    transport: T,
    config: FetchConfig,
}

impl<T: Transport> HistoryFetcher<T> {
    /// Creates a fetcher with the given transport and configuration.
    #[must_use]
    pub const fn new(transport: T, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    /// Creates a fetcher with the default configuration.
    #[must_use]
    pub fn with_defaults(transport: T) -> Self {
        Self::new(transport, FetchConfig::default())
    }

    /// Returns the fetcher configuration.
    #[must_use]
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches every instrument traded on `board` on `day` (`YYYY-MM-DD`).
    ///
    /// Pages are followed using the server's `history.cursor` totals.
    pub async fn fetch_all_for_day(&self, market: Market, board: &str, day: &str) -> FetchOutcome {
        let base = self.config.base_url.as_str();
        self.run(
            FetchMode::Day,
            market.instrument_class(),
            CursorCountPager::new(),
            |start| url::day_url(base, market, board, day, start),
        )
        .await
    }

    /// Fetches one instrument between `from` and `till` inclusive.
    ///
    /// A first page shorter than [`ISS_PAGE_SIZE`](crate::paginate::ISS_PAGE_SIZE)
    /// is taken as complete; otherwise pages are probed until one comes back empty.
    pub async fn fetch_instrument_range(
        &self,
        market: Market,
        board: &str,
        secid: &str,
        from: &str,
        till: &str,
    ) -> FetchOutcome {
        let base = self.config.base_url.as_str();
        self.run(
            FetchMode::Range,
            market.instrument_class(),
            ProbeNextEmptyPager::new(),
            |start| url::range_url(base, market, board, secid, from, till, start),
        )
        .await
    }

    /// Fetches every history row the server has for one instrument.
    pub async fn fetch_instrument_full_history(
        &self,
        market: Market,
        board: &str,
        secid: &str,
    ) -> FetchOutcome {
        let base = self.config.base_url.as_str();
        self.run(
            FetchMode::FullHistory,
            market.instrument_class(),
            IncrementUntilEmptyPager::new(),
            |start| url::history_url(base, market, board, secid, start.unwrap_or(0)),
        )
        .await
    }

    /// Runs one paginated fetch to completion.
    ///
    /// The opening request is never retried. Follow-up pages that hit a
    /// transport error are re-requested at the same offset until
    /// `max_consecutive_failures` is exceeded.
    async fn run<P, F>(
        &self,
        mode: FetchMode,
        class: InstrumentClass,
        mut pager: P,
        url_for: F,
    ) -> FetchOutcome
    where
        P: Paginator,
        F: Fn(Option<u64>) -> String,
    {
        let mut session = FetchSession::new(mode);

        let first_url = url_for(pager.first_offset());
        session.requests += 1;
        let first = match self.request_page(&first_url, class).await {
            Ok(page) if P::REQUIRES_CURSOR && page.cursor.is_none() => {
                Err(FetchError::from(DecodeError::MissingCursor))
            }
            other => other,
        };
        let first = match first {
            Ok(page) => page,
            Err(e) => {
                error!(%mode, url = %first_url, error = %e, "opening request failed");
                return session.finish(FetchStatus::Failed(e));
            }
        };

        if first.rows == 0 {
            info!(%mode, url = %first_url, "no history rows for query");
        }
        let mut next = pager.advance(&first.view());
        session.merge(first);

        let mut failures = 0u32;
        while let Continuation::Fetch(offset) = next {
            tokio::time::sleep(self.config.page_delay).await;

            let page_url = url_for(Some(offset));
            session.requests += 1;
            match self.request_page(&page_url, class).await {
                Ok(page) => {
                    failures = 0;
                    next = pager.advance(&page.view());
                    session.merge(page);
                }
                Err(FetchError::Transport(e)) => {
                    failures += 1;
                    if failures > self.config.max_consecutive_failures {
                        warn!(
                            %mode,
                            offset,
                            failures,
                            "giving up after consecutive failures, result is partial"
                        );
                        return session.finish(FetchStatus::Partial(
                            FetchError::RetriesExhausted {
                                offset,
                                attempts: failures,
                                last: e,
                            },
                        ));
                    }
                    warn!(%mode, offset, failures, error = %e, "page request failed, retrying");
                    next = Continuation::Fetch(pager.rewind());
                }
                Err(e) => {
                    warn!(%mode, offset, error = %e, "page could not be decoded, result is partial");
                    return session.finish(FetchStatus::Partial(e));
                }
            }
        }

        debug!(
            %mode,
            records = session.records.len(),
            rejected = session.rejected.len(),
            requests = session.requests,
            "fetch complete"
        );
        session.finish(FetchStatus::Complete)
    }

    /// Issues one GET and turns the body into normalized records.
    async fn request_page(
        &self,
        url: &str,
        class: InstrumentClass,
    ) -> Result<PageResult, FetchError> {
        debug!(%url, "requesting history page");
        let body = self.transport.get(url).await?;
        let raw = decode_page(&body)?;
        let normalized = normalize_page(&raw, class)?;
        Ok(PageResult {
            normalized,
            rows: raw.rows.len(),
            cursor: raw.cursor,
        })
    }
}

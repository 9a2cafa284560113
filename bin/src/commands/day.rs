//! Day command implementation.
//!
//! Fetches every instrument traded on the given boards on one date. Boards are
//! fetched concurrently, each with its own outcome.

use crate::display::{
    build_fetcher, parse_date, resolve_market, spinner, take_records, write_output,
};
use crate::{FetchArgs, OutputArgs};
use anyhow::{Result, bail};
use futures::future::join_all;
use isshist_lib::prelude::*;

/// Fetch one trading day for each board and write the combined records.
pub(crate) async fn day(
    date: &str,
    boards: &[String],
    market: Option<&str>,
    fetch: &FetchArgs,
    out: &OutputArgs,
    quiet: bool,
) -> Result<()> {
    let date = parse_date(date, "trade")?;
    let mut targets = Vec::with_capacity(boards.len());
    for board in boards {
        targets.push((board.as_str(), resolve_market(board, market)?));
    }

    let fetcher = build_fetcher(fetch)?;
    let progress = spinner(quiet, format!("{} on {} board(s)", date, targets.len()));

    let outcomes = join_all(targets.iter().map(|&(board, market)| {
        let fetcher = &fetcher;
        let date = date.as_str();
        async move { (board, fetcher.fetch_all_for_day(market, board, date).await) }
    }))
    .await;

    let mut records = Vec::new();
    let mut failed = Vec::new();
    for (board, outcome) in outcomes {
        match take_records(&format!("{board} {date}"), outcome) {
            Ok(mut batch) => records.append(&mut batch),
            Err(e) => {
                tracing::error!("{e:#}");
                failed.push(board);
            }
        }
    }
    progress.finish_with_message(format!("Fetched {} records", records.len()));

    if failed.len() < targets.len() {
        write_output(&records, out)?;
    }
    if !failed.is_empty() {
        bail!("Fetch failed for board(s): {}", failed.join(", "));
    }
    Ok(())
}

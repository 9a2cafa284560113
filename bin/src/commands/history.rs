//! History command implementation.

use crate::display::{build_fetcher, resolve_market, spinner, take_records, write_output};
use crate::{FetchArgs, OutputArgs};
use anyhow::Result;
use isshist_lib::prelude::*;

/// Fetch the complete history of one instrument and write its records.
pub(crate) async fn history(
    board: &str,
    secid: &str,
    market: Option<&str>,
    fetch: &FetchArgs,
    out: &OutputArgs,
    quiet: bool,
) -> Result<()> {
    let market = resolve_market(board, market)?;
    let fetcher = build_fetcher(fetch)?;
    let progress = spinner(quiet, format!("{secid} on {board}: full history"));

    let outcome = fetcher
        .fetch_instrument_full_history(market, board, secid)
        .await;
    let requests = outcome.requests;
    let records = take_records(secid, outcome)?;
    progress.finish_with_message(format!(
        "Fetched {} records in {requests} requests",
        records.len()
    ));

    write_output(&records, out)
}

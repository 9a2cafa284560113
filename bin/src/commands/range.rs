//! Range command implementation.

use crate::display::{
    build_fetcher, parse_date, resolve_market, spinner, take_records, write_output,
};
use crate::{FetchArgs, OutputArgs};
use anyhow::Result;
use isshist_lib::prelude::*;

/// Fetch one instrument between two dates and write its records.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn range(
    board: &str,
    secid: &str,
    from: &str,
    till: Option<&str>,
    market: Option<&str>,
    fetch: &FetchArgs,
    out: &OutputArgs,
    quiet: bool,
) -> Result<()> {
    let market = resolve_market(board, market)?;
    let from = parse_date(from, "start")?;
    let till = match till {
        Some(s) => parse_date(s, "end")?,
        None => chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string(),
    };

    let fetcher = build_fetcher(fetch)?;
    let progress = spinner(quiet, format!("{secid} on {board}: {from} -> {till}"));

    let outcome = fetcher
        .fetch_instrument_range(market, board, secid, &from, &till)
        .await;
    let requests = outcome.requests;
    let records = take_records(&format!("{secid} {from}..{till}"), outcome)?;
    progress.finish_with_message(format!(
        "Fetched {} records in {requests} requests",
        records.len()
    ));

    write_output(&records, out)
}

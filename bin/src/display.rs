//! Display utilities and output formatting for the isshist CLI.

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use isshist_lib::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::{FetchArgs, OutputArgs};

/// Parses the `--format` argument, listing the accepted names on error.
pub(crate) fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse().map_err(|_| {
        let names: Vec<_> = OutputFormat::all().iter().map(OutputFormat::extension).collect();
        format!("unknown format '{s}', expected one of: {}", names.join(", "))
    })
}

/// Builds a fetcher from the command-line connection settings.
pub(crate) fn build_fetcher(args: &FetchArgs) -> Result<HistoryFetcher<IssClient>> {
    let client = IssClient::new(ClientConfig {
        timeout: args.request_timeout(),
        ..Default::default()
    })
    .context("Failed to create HTTP client")?;

    let config = FetchConfig {
        base_url: args.base_url.clone(),
        page_delay: args.page_delay(),
        max_consecutive_failures: args.max_retries,
    };
    Ok(HistoryFetcher::new(client, config))
}

/// Picks the market for a board: the explicit flag, else the registry entry.
pub(crate) fn resolve_market(board: &str, market: Option<&str>) -> Result<Market> {
    if let Some(name) = market {
        return Ok(name.parse::<Market>()?);
    }
    let board = BoardRegistry::global()
        .require(board)
        .context("Pass --market shares|bonds for boards outside the registry")?;
    Ok(board.market())
}

/// Checks a `YYYY-MM-DD` argument, rejecting unpadded or signed years.
pub(crate) fn parse_date(s: &str, what: &str) -> Result<String> {
    let date = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid {what} date: {s}"))?;
    let canonical = date.format("%Y-%m-%d").to_string();
    if canonical != s {
        bail!("Invalid {what} date: {s} (expected YYYY-MM-DD)");
    }
    Ok(canonical)
}

/// Creates a spinner on stderr, hidden in quiet mode.
pub(crate) fn spinner(quiet: bool, message: String) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Turns an outcome into records, reporting partial and failed fetches.
///
/// A failed fetch is an error. A partial fetch is logged and its records are kept.
pub(crate) fn take_records(label: &str, outcome: FetchOutcome) -> Result<Vec<TradeRecord>> {
    if !outcome.rejected.is_empty() {
        warn!(
            query = label,
            rejected = outcome.rejected.len(),
            "some rows could not be normalized and were skipped"
        );
    }
    match outcome.status {
        FetchStatus::Complete => Ok(outcome.records),
        FetchStatus::Partial(ref e) => {
            warn!(
                query = label,
                records = outcome.records.len(),
                error = %e,
                "fetch incomplete, writing partial result"
            );
            Ok(outcome.records)
        }
        FetchStatus::Failed(e) => {
            let hint = if e.is_transport() {
                " (ISS unreachable; check the network or --base-url)"
            } else {
                ""
            };
            Err(anyhow::Error::new(e).context(format!("Fetch failed for {label}{hint}")))
        }
    }
}

/// Writes records to `output`, or to stdout when no path is given.
pub(crate) fn write_output(records: &[TradeRecord], out: &OutputArgs) -> Result<()> {
    match &out.output {
        Some(path) => write_records(records, path, out.format),
        None => {
            if out.format.is_binary() {
                bail!("{} output is binary and needs a file; pass --output", out.format);
            }
            write_records_to(records, BufWriter::new(std::io::stdout()), out.format)
        }
    }
}

/// Write records to a file in the specified format.
pub(crate) fn write_records(
    records: &[TradeRecord],
    output: &Path,
    format: OutputFormat,
) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    write_records_to(records, BufWriter::new(file), format)
}

fn write_records_to<W: Write + Send>(
    records: &[TradeRecord],
    mut writer: W,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Csv => CsvFormatter::new().write_records(records, &mut writer)?,
        OutputFormat::Json => JsonFormatter::new().write_records(records, &mut writer)?,
        OutputFormat::Ndjson => JsonFormatter::ndjson().write_records(records, &mut writer)?,
        OutputFormat::Parquet => {
            #[cfg(feature = "parquet")]
            {
                ParquetFormatter::new().write_records(records, &mut writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                bail!("Parquet support not compiled in");
            }
        }
    }
    writer.flush()?;
    Ok(())
}

//! isshist CLI - MOEX ISS trade history downloader.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use isshist_lib::OutputFormat;

#[derive(Parser)]
#[command(name = "isshist")]
#[command(about = "MOEX ISS trade history downloader", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    fetch: FetchArgs,
}

/// Connection settings shared by every fetching command.
#[derive(Args, Clone)]
pub(crate) struct FetchArgs {
    /// ISS history engine base URL
    #[arg(long, global = true, default_value = isshist_lib::url::BASE_URL)]
    pub(crate) base_url: String,

    /// Pause between page requests, in milliseconds
    #[arg(long, global = true, default_value = "10")]
    pub(crate) delay_ms: u64,

    /// Consecutive retries allowed for a failing page
    #[arg(long, global = true, default_value = "3")]
    pub(crate) max_retries: u32,

    /// Request timeout, in seconds
    #[arg(long, global = true, default_value = "30")]
    pub(crate) timeout: u64,
}

impl FetchArgs {
    pub(crate) fn page_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Where and how fetched records are written.
#[derive(Args, Clone)]
pub(crate) struct OutputArgs {
    /// Output file path. Defaults to stdout
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Output format (csv, json, ndjson, parquet)
    #[arg(short, long, default_value = "csv", value_parser = display::parse_format)]
    pub(crate) format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every instrument traded on one or more boards on a date
    Day {
        /// Trading date (YYYY-MM-DD)
        date: String,

        /// Board identifiers (e.g., TQBR, TQOB)
        #[arg(required = true)]
        boards: Vec<String>,

        /// Market (shares or bonds). Defaults to the board's market
        #[arg(short, long)]
        market: Option<String>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Fetch one instrument between two dates
    Range {
        /// Board identifier
        board: String,

        /// Security identifier (e.g., SBER)
        secid: String,

        /// First date (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Last date, inclusive (YYYY-MM-DD). Defaults to today
        #[arg(long)]
        till: Option<String>,

        /// Market (shares or bonds). Defaults to the board's market
        #[arg(short, long)]
        market: Option<String>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Fetch the complete history of one instrument
    History {
        /// Board identifier
        board: String,

        /// Security identifier (e.g., SBER)
        secid: String,

        /// Market (shares or bonds). Defaults to the board's market
        #[arg(short, long)]
        market: Option<String>,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// List known boards
    Boards {
        /// Filter by market (shares, bonds)
        #[arg(short, long)]
        market: Option<String>,

        /// Search pattern
        #[arg(short, long)]
        search: Option<String>,
    },
}

/// Installs the tracing subscriber.
///
/// `RUST_LOG` wins over `-v`/`-q`; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing(verbose: u8, quiet: bool) {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("isshist={level}")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Day {
            date,
            boards,
            market,
            out,
        } => {
            commands::day::day(&date, &boards, market.as_deref(), &cli.fetch, &out, cli.quiet)
                .await
        }
        Commands::Range {
            board,
            secid,
            from,
            till,
            market,
            out,
        } => {
            commands::range::range(
                &board,
                &secid,
                &from,
                till.as_deref(),
                market.as_deref(),
                &cli.fetch,
                &out,
                cli.quiet,
            )
            .await
        }
        Commands::History {
            board,
            secid,
            market,
            out,
        } => {
            commands::history::history(
                &board,
                &secid,
                market.as_deref(),
                &cli.fetch,
                &out,
                cli.quiet,
            )
            .await
        }
        Commands::Boards { market, search } => {
            commands::boards::list_boards(market.as_deref(), search.as_deref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_day_takes_date_then_boards() {
        let cli = Cli::try_parse_from(["isshist", "day", "2020-09-08", "TQBR", "TQOB"]).unwrap();
        let Some(Commands::Day { date, boards, .. }) = cli.command else {
            panic!("expected day command");
        };
        assert_eq!(date, "2020-09-08");
        assert_eq!(boards, vec!["TQBR", "TQOB"]);

        assert!(Cli::try_parse_from(["isshist", "day", "2020-09-08"]).is_err());
    }
}

//! Boards command implementation.
//!
//! This module handles listing known boards with optional filtering.

use anyhow::Result;
use isshist_lib::prelude::*;

/// List known boards with optional market filter or search pattern.
pub(crate) fn list_boards(market: Option<&str>, search: Option<&str>) -> Result<()> {
    let registry = BoardRegistry::global();

    let mut boards: Vec<_> = match (market, search) {
        (Some(name), _) => {
            let market = name.parse::<Market>()?;
            registry.by_market(market).collect()
        }
        (_, Some(pattern)) => registry.search(pattern),
        (None, None) => registry.all().collect(),
    };
    boards.sort_by(|a, b| (a.market(), a.id()).cmp(&(b.market(), b.id())));

    if boards.is_empty() {
        println!("No boards found.");
        return Ok(());
    }

    println!("{:<8} {:<8} {:<30} {}", "ID", "MARKET", "NAME", "DESCRIPTION");
    println!("{}", "-".repeat(80));

    for board in &boards {
        println!(
            "{:<8} {:<8} {:<30} {}",
            board.id(),
            board.market().as_str(),
            board.name(),
            board.description()
        );
    }

    println!("\nTotal: {} boards", boards.len());
    Ok(())
}

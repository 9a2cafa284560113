//! Board registry for the isshist MOEX trade history client.
//!
//! This crate provides the list of ISS trading boards isshist knows about,
//! with the market each board belongs to.
//!
//! # Example
//!
//! ```
//! use isshist_boards::BoardRegistry;
//!
//! let registry = BoardRegistry::global();
//!
//! // Lookup by ID
//! if let Some(board) = registry.get("tqob") {
//!     println!("{}: {}", board.id(), board.market());
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::sync::OnceLock;

use isshist_types::{Board, IsshistError, Market, Result};

/// The board metadata JSON embedded at compile time.
const BOARDS_JSON: &str = include_str!("../data/boards.json");

/// Global board registry instance.
static REGISTRY: OnceLock<BoardRegistry> = OnceLock::new();

/// Registry of known ISS boards.
#[derive(Debug)]
pub struct BoardRegistry {
    boards: HashMap<String, Board>,
}

impl BoardRegistry {
    /// Returns the global board registry.
    ///
    /// The registry is initialized lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::load)
    }

    /// Loads boards from the embedded JSON data.
    fn load() -> Self {
        let boards: HashMap<String, Board> =
            serde_json::from_str(BOARDS_JSON).expect("Invalid boards.json");
        Self { boards }
    }

    /// Looks up a board by ID (case-insensitive).
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Board> {
        self.boards.get(&id.to_lowercase())
    }

    /// Looks up a board by ID, failing for boards the registry does not know.
    ///
    /// # Errors
    ///
    /// Returns [`IsshistError::UnknownBoard`] if the ID is not registered.
    pub fn require(&self, id: &str) -> Result<&Board> {
        self.get(id)
            .ok_or_else(|| IsshistError::UnknownBoard(id.to_string()))
    }

    /// Returns the market a board belongs to, if the board is known.
    #[must_use]
    pub fn market_of(&self, id: &str) -> Option<Market> {
        self.get(id).map(Board::market)
    }

    /// Returns all boards as an iterator.
    pub fn all(&self) -> impl Iterator<Item = &Board> {
        self.boards.values()
    }

    /// Returns the total number of boards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Returns boards of the given market.
    pub fn by_market(&self, market: Market) -> impl Iterator<Item = &Board> {
        self.boards.values().filter(move |b| b.market() == market)
    }

    /// Searches boards by ID, name or description (case-insensitive).
    pub fn search(&self, pattern: &str) -> Vec<&Board> {
        let pattern = pattern.to_lowercase();
        self.boards
            .values()
            .filter(|b| {
                b.id().to_lowercase().contains(&pattern)
                    || b.name().to_lowercase().contains(&pattern)
                    || b.description().to_lowercase().contains(&pattern)
            })
            .collect()
    }

    /// Returns all board IDs sorted alphabetically.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.boards.values().map(Board::id).collect();
        ids.sort_unstable();
        ids
    }
}

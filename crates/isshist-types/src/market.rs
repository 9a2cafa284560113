//! Markets, instrument classes, and trading boards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ISS stock-engine market, used as the `markets/{market}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    /// Equities.
    Shares,
    /// Government, corporate and euro bonds.
    Bonds,
}

impl Market {
    /// Returns the market as it appears in ISS URLs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Shares => "shares",
            Self::Bonds => "bonds",
        }
    }

    /// Returns the row layout served for this market.
    #[must_use]
    pub const fn instrument_class(&self) -> InstrumentClass {
        match self {
            Self::Shares => InstrumentClass::Equity,
            Self::Bonds => InstrumentClass::Bond,
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown market name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown market: {0}. Valid options: shares, bonds")]
pub struct MarketParseError(pub String);

impl std::str::FromStr for Market {
    type Err = MarketParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shares" | "share" | "equity" | "equities" => Ok(Self::Shares),
            "bonds" | "bond" => Ok(Self::Bonds),
            _ => Err(MarketParseError(s.to_string())),
        }
    }
}

/// Selects which positional layout the normalizer applies to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentClass {
    /// Share rows.
    Equity,
    /// Bond rows, which carry maturity and face value columns.
    Bond,
}

/// A trading-mode partition of a market (e.g. `TQBR`, `TQOB`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// ISS board identifier, upper case.
    id: String,
    /// Human-readable name.
    name: String,
    /// Description of what trades on the board.
    description: String,
    /// Market the board belongs to.
    market: Market,
}

impl Board {
    /// Creates a new board.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        market: Market,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            market,
        }
    }

    /// Returns the board identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the market the board belongs to.
    #[must_use]
    pub const fn market(&self) -> Market {
        self.market
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

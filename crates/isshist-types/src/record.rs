//! Normalized trade history records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::InstrumentClass;

/// Columns shared by equity and bond history rows.
///
/// Nullable numeric columns are already coalesced to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeFields {
    /// Board identifier (`BOARDID`).
    pub board: String,
    /// Trading session date (`TRADEDATE`).
    pub trade_date: NaiveDate,
    /// Short instrument name (`SHORTNAME`).
    pub short_name: String,
    /// Ticker or security identifier (`SECID`).
    pub secid: String,
    /// Number of trades in the session.
    pub num_trades: u64,
    /// Traded value in currency.
    pub value: Decimal,
    /// Opening price.
    pub open: Decimal,
    /// Lowest price.
    pub low: Decimal,
    /// Highest price.
    pub high: Decimal,
    /// Closing price.
    pub close: Decimal,
}

/// A bond history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondTrade {
    /// Common columns.
    #[serde(flatten)]
    pub fields: TradeFields,
    /// Maturity date; `None` when the server sends no date.
    pub expiration: Option<NaiveDate>,
    /// Face value of one bond.
    pub nominal_value: Decimal,
    /// Unit prices are quoted in (e.g. `SUR`, `USD`).
    pub unit: String,
}

/// One normalized history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum TradeRecord {
    /// Share row.
    Equity(TradeFields),
    /// Bond row.
    Bond(BondTrade),
}

impl TradeRecord {
    /// Returns the columns shared by both variants.
    #[must_use]
    pub const fn fields(&self) -> &TradeFields {
        match self {
            Self::Equity(fields) => fields,
            Self::Bond(bond) => &bond.fields,
        }
    }

    /// Returns the bond columns, if this is a bond row.
    #[must_use]
    pub const fn as_bond(&self) -> Option<&BondTrade> {
        match self {
            Self::Equity(_) => None,
            Self::Bond(bond) => Some(bond),
        }
    }

    /// Returns which layout produced this record.
    #[must_use]
    pub const fn class(&self) -> InstrumentClass {
        match self {
            Self::Equity(_) => InstrumentClass::Equity,
            Self::Bond(_) => InstrumentClass::Bond,
        }
    }

    /// Returns the security identifier.
    #[must_use]
    pub fn secid(&self) -> &str {
        &self.fields().secid
    }

    /// Returns the trading session date.
    #[must_use]
    pub const fn trade_date(&self) -> NaiveDate {
        self.fields().trade_date
    }
}

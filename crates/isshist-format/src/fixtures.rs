//! Records shared by formatter tests.

use chrono::NaiveDate;
use isshist_types::{BondTrade, TradeFields, TradeRecord};
use rust_decimal::Decimal;
use std::str::FromStr;

fn fields(board: &str, secid: &str, short_name: &str) -> TradeFields {
    TradeFields {
        board: board.into(),
        trade_date: NaiveDate::from_ymd_opt(2020, 9, 8).unwrap(),
        short_name: short_name.into(),
        secid: secid.into(),
        num_trades: 52_113,
        value: Decimal::from_str("9873412345.7").unwrap(),
        open: Decimal::from_str("226.5").unwrap(),
        low: Decimal::from_str("224.01").unwrap(),
        high: Decimal::from_str("228").unwrap(),
        close: Decimal::from_str("227.35").unwrap(),
    }
}

pub(crate) fn equity() -> TradeRecord {
    TradeRecord::Equity(fields("TQBR", "SBER", "Сбербанк"))
}

pub(crate) fn bond(expiration: Option<NaiveDate>) -> TradeRecord {
    TradeRecord::Bond(BondTrade {
        fields: fields("TQCB", "RU000A0JUQB7", "Сбер, 3"),
        expiration,
        nominal_value: Decimal::from(1000),
        unit: "SUR".into(),
    })
}

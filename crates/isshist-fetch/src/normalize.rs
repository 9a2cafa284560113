//! Row normalization for ISS history pages.
//!
//! ISS serves each history row as a fixed-width JSON array. Shares and bonds
//! use different column orders, so fields are extracted by position through a
//! [`ColumnLayout`]. When the response also names its columns, the layout is
//! checked against those names first and a mismatch fails the page instead of
//! silently misassigning fields.
//!
//! Nullable numeric columns become zero. Dates are never defaulted: an
//! unparseable trade date rejects the row, and a missing bond maturity is kept
//! as `None`.

use chrono::NaiveDate;
use isshist_types::{BondTrade, DecodeError, InstrumentClass, RowError, TradeFields, TradeRecord};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

use crate::page::RawPage;

/// Schema version the layouts below were written against.
pub const ISS_HISTORY_SCHEMA: &str = "iss-history-v1";

/// Date format used by every ISS date column.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholder ISS sends for bonds without a maturity date.
const NO_DATE: &str = "0000-00-00";

/// One column of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Position in the row array.
    pub index: usize,
    /// Name ISS gives the column.
    pub name: &'static str,
}

const fn col(index: usize, name: &'static str) -> Column {
    Column { index, name }
}

/// Positions of the columns shared by both instrument classes.
#[derive(Debug, Clone, Copy)]
pub struct CommonColumns {
    /// `BOARDID`.
    pub board: Column,
    /// `TRADEDATE`.
    pub trade_date: Column,
    /// `SHORTNAME`.
    pub short_name: Column,
    /// `SECID`.
    pub secid: Column,
    /// `NUMTRADES`.
    pub num_trades: Column,
    /// `VALUE`.
    pub value: Column,
    /// `OPEN`.
    pub open: Column,
    /// `LOW`.
    pub low: Column,
    /// `HIGH`.
    pub high: Column,
    /// `CLOSE`.
    pub close: Column,
}

/// Positions of the bond-only columns.
#[derive(Debug, Clone, Copy)]
pub struct BondColumns {
    /// `MATDATE`.
    pub expiration: Column,
    /// `FACEVALUE`.
    pub nominal_value: Column,
    /// `FACEUNIT`.
    pub unit: Column,
}

/// Column layout for one instrument class.
#[derive(Debug, Clone, Copy)]
pub struct ColumnLayout {
    /// Class this layout decodes.
    pub class: InstrumentClass,
    /// Shared columns.
    pub common: CommonColumns,
    /// Bond columns, `None` for equities.
    pub bond: Option<BondColumns>,
}

/// Layout of `markets/shares` history rows.
pub const SHARES_LAYOUT: ColumnLayout = ColumnLayout {
    class: InstrumentClass::Equity,
    common: CommonColumns {
        board: col(0, "BOARDID"),
        trade_date: col(1, "TRADEDATE"),
        short_name: col(2, "SHORTNAME"),
        secid: col(3, "SECID"),
        num_trades: col(4, "NUMTRADES"),
        value: col(5, "VALUE"),
        open: col(6, "OPEN"),
        low: col(7, "LOW"),
        high: col(8, "HIGH"),
        close: col(11, "CLOSE"),
    },
    bond: None,
};

/// Layout of `markets/bonds` history rows.
pub const BONDS_LAYOUT: ColumnLayout = ColumnLayout {
    class: InstrumentClass::Bond,
    common: CommonColumns {
        board: col(0, "BOARDID"),
        trade_date: col(1, "TRADEDATE"),
        short_name: col(2, "SHORTNAME"),
        secid: col(3, "SECID"),
        num_trades: col(4, "NUMTRADES"),
        value: col(5, "VALUE"),
        low: col(6, "LOW"),
        high: col(7, "HIGH"),
        close: col(8, "CLOSE"),
        open: col(13, "OPEN"),
    },
    bond: Some(BondColumns {
        expiration: col(21, "MATDATE"),
        nominal_value: col(30, "FACEVALUE"),
        unit: col(36, "FACEUNIT"),
    }),
};

impl ColumnLayout {
    /// Returns the layout for an instrument class.
    #[must_use]
    pub const fn for_class(class: InstrumentClass) -> &'static Self {
        match class {
            InstrumentClass::Equity => &SHARES_LAYOUT,
            InstrumentClass::Bond => &BONDS_LAYOUT,
        }
    }

    /// Returns every column the layout reads.
    pub fn columns(&self) -> impl Iterator<Item = Column> {
        let c = self.common;
        let common = [
            c.board,
            c.trade_date,
            c.short_name,
            c.secid,
            c.num_trades,
            c.value,
            c.open,
            c.low,
            c.high,
            c.close,
        ];
        let bond = self
            .bond
            .map(|b| [b.expiration, b.nominal_value, b.unit])
            .into_iter()
            .flatten();
        common.into_iter().chain(bond)
    }

    /// Returns the minimum row width this layout can read.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns().map(|c| c.index + 1).max().unwrap_or(0)
    }

    /// Checks the layout against the column names a response carried.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::SchemaMismatch`] for the first column whose name differs.
    pub fn validate(&self, names: &[String]) -> Result<(), DecodeError> {
        for column in self.columns() {
            let found = names.get(column.index);
            if found.map(String::as_str) != Some(column.name) {
                return Err(DecodeError::SchemaMismatch {
                    index: column.index,
                    expected: column.name,
                    found: found.cloned(),
                    schema: ISS_HISTORY_SCHEMA,
                });
            }
        }
        Ok(())
    }
}

/// Records produced from one page, plus the rows that were dropped.
#[derive(Debug, Clone, Default)]
pub struct NormalizedPage {
    /// Records in row order.
    pub records: Vec<TradeRecord>,
    /// Page-local row index and reason for each dropped row.
    pub rejected: Vec<(usize, RowError)>,
}

/// Normalizes a decoded page, validating its column names when present.
///
/// # Errors
///
/// Returns an error only when the served column names contradict the layout.
/// Per-row problems are reported in [`NormalizedPage::rejected`].
pub fn normalize_page(page: &RawPage, class: InstrumentClass) -> Result<NormalizedPage, DecodeError> {
    let layout = ColumnLayout::for_class(class);
    if !page.columns.is_empty() {
        layout.validate(&page.columns)?;
    }
    Ok(normalize_rows(&page.rows, layout))
}

/// Normalizes rows positionally with the given layout.
///
/// Output order matches input order; rejected rows are logged and skipped.
#[must_use]
pub fn normalize_rows(rows: &[Vec<Value>], layout: &ColumnLayout) -> NormalizedPage {
    let width = layout.width();
    let mut page = NormalizedPage {
        records: Vec::with_capacity(rows.len()),
        rejected: Vec::new(),
    };

    for (index, row) in rows.iter().enumerate() {
        match normalize_row(row, layout, width) {
            Ok(record) => page.records.push(record),
            Err(reason) => {
                warn!(row = index, %reason, "skipping history row");
                page.rejected.push((index, reason));
            }
        }
    }

    page
}

fn normalize_row(row: &[Value], layout: &ColumnLayout, width: usize) -> Result<TradeRecord, RowError> {
    if row.len() < width {
        return Err(RowError::TooShort {
            len: row.len(),
            needed: width,
        });
    }

    let c = &layout.common;
    let fields = TradeFields {
        board: required_text(row, c.board)?,
        trade_date: date(row, c.trade_date)?,
        short_name: text_or_empty(row, c.short_name)?,
        secid: required_text(row, c.secid)?,
        num_trades: count_or_zero(row, c.num_trades)?,
        value: non_negative_decimal_or_zero(row, c.value)?,
        open: decimal_or_zero(row, c.open)?,
        low: decimal_or_zero(row, c.low)?,
        high: decimal_or_zero(row, c.high)?,
        close: decimal_or_zero(row, c.close)?,
    };

    match &layout.bond {
        None => Ok(TradeRecord::Equity(fields)),
        Some(b) => Ok(TradeRecord::Bond(BondTrade {
            fields,
            expiration: optional_date(row, b.expiration)?,
            nominal_value: decimal_or_zero(row, b.nominal_value)?,
            unit: text_or_empty(row, b.unit)?,
        })),
    }
}

fn required_text(row: &[Value], column: Column) -> Result<String, RowError> {
    match &row[column.index] {
        Value::String(s) => Ok(s.clone()),
        _ => Err(RowError::MissingText {
            column: column.name,
        }),
    }
}

fn text_or_empty(row: &[Value], column: Column) -> Result<String, RowError> {
    match &row[column.index] {
        Value::Null => Ok(String::new()),
        _ => required_text(row, column),
    }
}

/// Whether `s` has the fixed `YYYY-MM-DD` shape. chrono alone accepts
/// unpadded fields and signed years.
fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}

fn parse_date(value: &Value, column: Column) -> Result<NaiveDate, RowError> {
    value
        .as_str()
        .filter(|s| is_iso_date(s))
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
        .ok_or_else(|| RowError::InvalidDate {
            column: column.name,
            value: value.to_string(),
        })
}

fn date(row: &[Value], column: Column) -> Result<NaiveDate, RowError> {
    parse_date(&row[column.index], column)
}

fn optional_date(row: &[Value], column: Column) -> Result<Option<NaiveDate>, RowError> {
    match &row[column.index] {
        Value::Null => Ok(None),
        Value::String(s) if s == NO_DATE => Ok(None),
        value => parse_date(value, column).map(Some),
    }
}

fn invalid_number(value: &Value, column: Column) -> RowError {
    RowError::InvalidNumber {
        column: column.name,
        value: value.to_string(),
    }
}

fn count_or_zero(row: &[Value], column: Column) -> Result<u64, RowError> {
    let value = &row[column.index];
    match value {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                // Some feeds send counts as 42.0
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                    .map(|f| f as u64)
            })
            .ok_or_else(|| invalid_number(value, column)),
        Value::String(s) => s.trim().parse().map_err(|_| invalid_number(value, column)),
        _ => Err(invalid_number(value, column)),
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn decimal_or_zero(row: &[Value], column: Column) -> Result<Decimal, RowError> {
    let value = &row[column.index];
    match value {
        Value::Null => Ok(Decimal::ZERO),
        Value::Number(n) => parse_decimal(&n.to_string()).ok_or_else(|| invalid_number(value, column)),
        Value::String(s) => parse_decimal(s).ok_or_else(|| invalid_number(value, column)),
        _ => Err(invalid_number(value, column)),
    }
}

fn non_negative_decimal_or_zero(row: &[Value], column: Column) -> Result<Decimal, RowError> {
    let d = decimal_or_zero(row, column)?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(invalid_number(&row[column.index], column));
    }
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn share_row(date: Value, trades: Value, value: Value, close: Value) -> Vec<Value> {
        vec![
            json!("TQBR"),
            date,
            json!("Сбербанк"),
            json!("SBER"),
            trades,
            value,
            json!(226.5),
            json!(224.01),
            json!(228),
            json!(227.1),
            json!(226.9),
            close,
            json!(61_000_000),
        ]
    }

    fn bond_row(matdate: Value, facevalue: Value, unit: Value) -> Vec<Value> {
        let mut row = vec![Value::Null; 37];
        row[0] = json!("TQOB");
        row[1] = json!("2020-09-08");
        row[2] = json!("ОФЗ 26207");
        row[3] = json!("SU26207RMFS9");
        row[4] = json!(311);
        row[5] = json!(151_234_567.8);
        row[6] = json!(111.05);
        row[7] = json!(111.6);
        row[8] = json!(111.4);
        row[13] = json!(111.2);
        row[21] = matdate;
        row[30] = facevalue;
        row[36] = unit;
        row
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_share_row_positions() {
        let rows = vec![share_row(
            json!("2020-09-08"),
            json!(120_345),
            json!(14_123_456_789.5),
            json!(227.35),
        )];
        let page = normalize_rows(&rows, &SHARES_LAYOUT);

        assert!(page.rejected.is_empty());
        let TradeRecord::Equity(f) = &page.records[0] else {
            panic!("expected equity record");
        };
        assert_eq!(f.board, "TQBR");
        assert_eq!(f.trade_date, NaiveDate::from_ymd_opt(2020, 9, 8).unwrap());
        assert_eq!(f.secid, "SBER");
        assert_eq!(f.num_trades, 120_345);
        assert_eq!(f.value, dec("14123456789.5"));
        assert_eq!(f.open, dec("226.5"));
        assert_eq!(f.low, dec("224.01"));
        assert_eq!(f.high, dec("228"));
        // CLOSE is column 11, not LEGALCLOSEPRICE at 9
        assert_eq!(f.close, dec("227.35"));
    }

    #[test]
    fn test_nulls_default_to_zero() {
        let mut row = share_row(json!("2020-09-08"), Value::Null, Value::Null, Value::Null);
        row[6] = Value::Null;
        row[7] = Value::Null;
        row[8] = Value::Null;
        let rows = vec![row.clone(), row];

        let page = normalize_rows(&rows, &SHARES_LAYOUT);
        assert_eq!(page.records.len(), 2);
        for record in &page.records {
            let f = record.fields();
            assert_eq!(f.num_trades, 0);
            assert_eq!(f.value, Decimal::ZERO);
            assert_eq!(f.open, Decimal::ZERO);
            assert_eq!(f.low, Decimal::ZERO);
            assert_eq!(f.high, Decimal::ZERO);
            assert_eq!(f.close, Decimal::ZERO);
        }
    }

    #[test]
    fn test_bad_date_rejects_only_that_row() {
        let good = share_row(json!("2020-09-08"), json!(1), json!(10), json!(1));
        let bad = share_row(json!("08.09.2020"), json!(1), json!(10), json!(1));
        let null_date = share_row(Value::Null, json!(1), json!(10), json!(1));
        let rows = vec![good.clone(), bad, null_date, good];

        let page = normalize_rows(&rows, &SHARES_LAYOUT);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.rejected.len(), 2);
        assert_eq!(page.rejected[0].0, 1);
        assert!(matches!(
            page.rejected[0].1,
            RowError::InvalidDate { column: "TRADEDATE", .. }
        ));
        assert_eq!(page.rejected[1].0, 2);
    }

    #[test]
    fn test_loose_dates_rejected() {
        for loose in ["20-09-08", "2020-9-8", "+2020-09-08"] {
            let share = share_row(json!(loose), json!(1), json!(10), json!(1));
            let page = normalize_rows(&[share], &SHARES_LAYOUT);
            assert!(page.records.is_empty(), "accepted {loose} as TRADEDATE");
            assert!(matches!(
                page.rejected[0].1,
                RowError::InvalidDate { column: "TRADEDATE", .. }
            ));

            let bond = bond_row(json!(loose), json!(1000), json!("SUR"));
            let page = normalize_rows(&[bond], &BONDS_LAYOUT);
            assert!(page.records.is_empty(), "accepted {loose} as MATDATE");
            assert!(matches!(
                page.rejected[0].1,
                RowError::InvalidDate { column: "MATDATE", .. }
            ));
        }
    }

    #[test]
    fn test_iso_date_shape() {
        assert!(is_iso_date("2020-09-08"));
        assert!(is_iso_date("0000-00-00"));
        assert!(!is_iso_date("2020-09-8"));
        assert!(!is_iso_date("2020/09/08"));
        assert!(!is_iso_date("2020-09-08T00:00"));
    }

    #[test]
    fn test_empty_page() {
        let page = normalize_rows(&[], &BONDS_LAYOUT);
        assert!(page.records.is_empty());
        assert!(page.rejected.is_empty());
    }

    #[test]
    fn test_bond_row_positions() {
        let rows = vec![bond_row(json!("2032-11-03"), json!(1000), json!("SUR"))];
        let page = normalize_rows(&rows, &BONDS_LAYOUT);

        let TradeRecord::Bond(b) = &page.records[0] else {
            panic!("expected bond record");
        };
        assert_eq!(b.fields.low, dec("111.05"));
        assert_eq!(b.fields.high, dec("111.6"));
        assert_eq!(b.fields.close, dec("111.4"));
        assert_eq!(b.fields.open, dec("111.2"));
        assert_eq!(b.expiration, NaiveDate::from_ymd_opt(2032, 11, 3));
        assert_eq!(b.nominal_value, dec("1000"));
        assert_eq!(b.unit, "SUR");
    }

    #[test]
    fn test_bond_missing_maturity_is_none() {
        let rows = vec![
            bond_row(Value::Null, Value::Null, Value::Null),
            bond_row(json!("0000-00-00"), json!(1000), json!("USD")),
        ];
        let page = normalize_rows(&rows, &BONDS_LAYOUT);

        assert_eq!(page.records.len(), 2);
        let first = page.records[0].as_bond().unwrap();
        assert_eq!(first.expiration, None);
        assert_eq!(first.nominal_value, Decimal::ZERO);
        assert_eq!(first.unit, "");
        assert_eq!(page.records[1].as_bond().unwrap().expiration, None);
    }

    #[test]
    fn test_bond_bad_maturity_rejected() {
        let rows = vec![bond_row(json!("someday"), json!(1000), json!("SUR"))];
        let page = normalize_rows(&rows, &BONDS_LAYOUT);
        assert!(page.records.is_empty());
        assert!(matches!(
            page.rejected[0].1,
            RowError::InvalidDate { column: "MATDATE", .. }
        ));
    }

    #[test]
    fn test_short_row_rejected() {
        let rows = vec![vec![json!("TQOB"), json!("2020-09-08")]];
        let page = normalize_rows(&rows, &BONDS_LAYOUT);
        assert_eq!(
            page.rejected[0].1,
            RowError::TooShort { len: 2, needed: 37 }
        );
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let negative = share_row(json!("2020-09-08"), json!(-3), json!(1), json!(1));
        let boolean = share_row(json!("2020-09-08"), json!(3), json!(true), json!(1));
        let page = normalize_rows(&[negative, boolean], &SHARES_LAYOUT);
        assert!(page.records.is_empty());
        assert!(matches!(
            page.rejected[0].1,
            RowError::InvalidNumber { column: "NUMTRADES", .. }
        ));
        assert!(matches!(
            page.rejected[1].1,
            RowError::InvalidNumber { column: "VALUE", .. }
        ));
    }

    #[test]
    fn test_negative_value_rejected() {
        let negative = share_row(json!("2020-09-08"), json!(3), json!(-10.5), json!(1));
        let negative_text = share_row(json!("2020-09-08"), json!(3), json!("-1"), json!(1));
        let zero = share_row(json!("2020-09-08"), json!(3), json!("-0"), json!(1));
        let page = normalize_rows(&[negative, negative_text, zero], &SHARES_LAYOUT);

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].fields().value, Decimal::ZERO);
        assert_eq!(page.rejected.len(), 2);
        for (_, err) in &page.rejected {
            assert!(matches!(err, RowError::InvalidNumber { column: "VALUE", .. }));
        }
    }

    #[test]
    fn test_numeric_strings_and_float_counts() {
        let row = share_row(json!("2020-09-08"), json!(42.0), json!("1e-7"), json!("227.35"));
        let page = normalize_rows(&[row], &SHARES_LAYOUT);
        let f = page.records[0].fields();
        assert_eq!(f.num_trades, 42);
        assert_eq!(f.value, dec("0.0000001"));
        assert_eq!(f.close, dec("227.35"));
    }

    #[test]
    fn test_layout_widths() {
        assert_eq!(SHARES_LAYOUT.width(), 12);
        assert_eq!(BONDS_LAYOUT.width(), 37);
    }

    #[test]
    fn test_schema_mismatch_fails_page() {
        let mut columns: Vec<String> = (0..12).map(|i| format!("C{i}")).collect();
        for c in SHARES_LAYOUT.columns() {
            columns[c.index] = c.name.to_string();
        }
        let page = RawPage {
            columns: columns.clone(),
            rows: Vec::new(),
            cursor: None,
        };
        assert!(normalize_page(&page, InstrumentClass::Equity).is_ok());

        columns.swap(6, 7);
        let swapped = RawPage {
            columns,
            ..page
        };
        let err = normalize_page(&swapped, InstrumentClass::Equity).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::SchemaMismatch { index: 6, expected: "OPEN", .. }
        ));
    }

    #[test]
    fn test_reserialized_records_match_source_rows() {
        let rows = vec![
            share_row(json!("2020-09-07"), json!(5), json!(100.5), json!(10.25)),
            share_row(json!("bad"), json!(6), json!(1), json!(1)),
            share_row(json!("2020-09-08"), Value::Null, json!(200), Value::Null),
        ];
        let page = normalize_rows(&rows, &SHARES_LAYOUT);
        let json = serde_json::to_value(&page.records).unwrap();
        let out = json.as_array().unwrap();

        assert_eq!(out.len() + page.rejected.len(), rows.len());
        assert_eq!(out[0]["trade_date"], "2020-09-07");
        assert_eq!(out[0]["num_trades"], 5);
        assert_eq!(dec(out[0]["value"].as_str().unwrap()), dec("100.5"));
        assert_eq!(dec(out[0]["close"].as_str().unwrap()), dec("10.25"));
        assert_eq!(out[1]["trade_date"], "2020-09-08");
        assert_eq!(out[1]["num_trades"], 0);
        assert_eq!(dec(out[1]["close"].as_str().unwrap()), Decimal::ZERO);
    }
}

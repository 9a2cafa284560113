//! ISS history URL construction.
//!
//! Dates are interpolated as given. They are not validated here; a malformed
//! date surfaces as an empty page or an error payload from the server.

use isshist_types::Market;

/// Base URL for the ISS stock-engine history endpoints.
pub const BASE_URL: &str = "https://iss.moex.com/iss/history/engines/stock/";

/// Returns `{base}markets/{market}/boards/{board}/`.
fn board_path(base: &str, market: Market, board: &str) -> String {
    let sep = if base.ends_with('/') { "" } else { "/" };
    format!("{base}{sep}markets/{market}/boards/{board}/")
}

/// Builds the URL for every instrument traded on a board on one day.
///
/// URL format: `{base}markets/{market}/boards/{board}/securities.json?date={day}[&start={n}]`
///
/// # Example
///
/// ```
/// use isshist_fetch::url::{BASE_URL, day_url};
/// use isshist_types::Market;
///
/// let url = day_url(BASE_URL, Market::Shares, "TQBR", "2020-09-08", None);
/// assert_eq!(
///     url,
///     "https://iss.moex.com/iss/history/engines/stock/markets/shares/boards/TQBR/securities.json?date=2020-09-08"
/// );
/// ```
#[must_use]
pub fn day_url(base: &str, market: Market, board: &str, day: &str, start: Option<u64>) -> String {
    let mut url = format!("{}securities.json?date={day}", board_path(base, market, board));
    if let Some(start) = start {
        url.push_str(&format!("&start={start}"));
    }
    url
}

/// Builds the URL for one instrument between two dates.
///
/// URL format: `{base}markets/{market}/boards/{board}/securities/{secid}.json?from={from}&till={till}[&start={n}]`
#[must_use]
pub fn range_url(
    base: &str,
    market: Market,
    board: &str,
    secid: &str,
    from: &str,
    till: &str,
    start: Option<u64>,
) -> String {
    let mut url = format!(
        "{}securities/{secid}.json?from={from}&till={till}",
        board_path(base, market, board)
    );
    if let Some(start) = start {
        url.push_str(&format!("&start={start}"));
    }
    url
}

/// Builds the URL for one page of an instrument's full history.
///
/// URL format: `{base}markets/{market}/boards/{board}/securities/{secid}.json?start={n}`
#[must_use]
pub fn history_url(base: &str, market: Market, board: &str, secid: &str, start: u64) -> String {
    format!(
        "{}securities/{secid}.json?start={start}",
        board_path(base, market, board)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_url_with_start() {
        let url = day_url(BASE_URL, Market::Bonds, "TQOB", "2020-08-31", Some(200));
        assert_eq!(
            url,
            "https://iss.moex.com/iss/history/engines/stock/markets/bonds/boards/TQOB/securities.json?date=2020-08-31&start=200"
        );
    }

    #[test]
    fn test_range_url() {
        let url = range_url(
            BASE_URL,
            Market::Bonds,
            "TQCB",
            "RU000A0JUQB7",
            "2020-08-01",
            "2020-09-09",
            None,
        );
        assert_eq!(
            url,
            "https://iss.moex.com/iss/history/engines/stock/markets/bonds/boards/TQCB/securities/RU000A0JUQB7.json?from=2020-08-01&till=2020-09-09"
        );

        let paged = range_url(BASE_URL, Market::Shares, "TQBR", "YNDX", "a", "b", Some(100));
        assert!(paged.ends_with("YNDX.json?from=a&till=b&start=100"));
    }

    #[test]
    fn test_history_url() {
        let url = history_url(BASE_URL, Market::Shares, "TQBR", "GAZP", 0);
        assert!(url.ends_with("markets/shares/boards/TQBR/securities/GAZP.json?start=0"));
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let url = history_url("http://localhost:8080/iss", Market::Shares, "TQBR", "GAZP", 0);
        assert_eq!(
            url,
            "http://localhost:8080/iss/markets/shares/boards/TQBR/securities/GAZP.json?start=0"
        );
    }

    #[test]
    fn test_malformed_date_passes_through() {
        let url = day_url(BASE_URL, Market::Shares, "TQBR", "08.09.2020", None);
        assert!(url.ends_with("?date=08.09.2020"));
    }
}

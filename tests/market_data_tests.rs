// tests/market_data_tests.rs

mod common;

use chrono_tz::Tz;
use common::date;
use tokio_test::{assert_err, assert_ok};
use universe_loader::{FetchError, MarketTimezone, YahooParser};

// 2024-01-02 .. 2024-01-04 at 09:30 New York, which is 14:30 UTC.
const CHART_BODY: &str = r#"{
    "chart": {
        "result": [{
            "meta": {"symbol": "AAPL", "exchangeTimezoneName": "America/New_York"},
            "timestamp": [1704205800, 1704292200, 1704378600],
            "indicators": {
                "quote": [{
                    "open": [187.15, 184.22, 182.15],
                    "close": [185.64, null, 181.91],
                    "volume": [82488700, 58414500, 71983600]
                }],
                "adjclose": [{"adjclose": [184.73, null, 181.02]}]
            }
        }],
        "error": null
    }
}"#;

#[test]
fn test_parse_chart_uses_unadjusted_close_and_skips_nulls() {
    let series = assert_ok!(YahooParser::parse_chart("AAPL", CHART_BODY));

    assert_eq!(series.symbol, "AAPL");
    assert_eq!(series.points.len(), 2);
    assert_eq!(series.points[0].date, date("2024-01-02"));
    assert_eq!(series.points[0].close, 185.64);
    assert_eq!(series.points[1].date, date("2024-01-04"));
    assert_eq!(series.points[1].close, 181.91);
}

#[test]
fn test_parse_chart_dates_follow_exchange_timezone() {
    // 2024-01-03 03:00 UTC is still 2024-01-02 in New York.
    let body = r#"{"chart": {"result": [{
        "meta": {"exchangeTimezoneName": "America/New_York"},
        "timestamp": [1704250800],
        "indicators": {"quote": [{"close": [10.0]}]}
    }], "error": null}}"#;

    let series = assert_ok!(YahooParser::parse_chart("X", body));
    assert_eq!(series.points[0].date, date("2024-01-02"));
}

#[test]
fn test_parse_chart_not_found() {
    let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
    let error = assert_err!(YahooParser::parse_chart("ZZZZ", body));
    assert!(matches!(error, FetchError::SymbolNotFound { ref symbol } if symbol == "ZZZZ"));
}

#[test]
fn test_parse_chart_without_prices_is_not_found() {
    let body = r#"{"chart": {"result": [{"meta": {}, "indicators": {"quote": [{}]}}], "error": null}}"#;
    let error = assert_err!(YahooParser::parse_chart("EMPTY", body));
    assert!(matches!(error, FetchError::SymbolNotFound { .. }));
}

#[test]
fn test_parse_chart_garbage() {
    let error = assert_err!(YahooParser::parse_chart("AAPL", "Too Many Requests"));
    assert!(matches!(error, FetchError::ResponseFormat(_)));
}

#[test]
fn test_parse_sector() {
    let body = r#"{"quoteSummary": {"result": [{"assetProfile": {"sector": "Technology", "industry": "Consumer Electronics"}}], "error": null}}"#;
    let sector = assert_ok!(YahooParser::parse_sector("AAPL", body));
    assert_eq!(sector.as_deref(), Some("Technology"));
}

#[test]
fn test_parse_sector_absent_is_none() {
    let body = r#"{"quoteSummary": {"result": [{"assetProfile": {"longBusinessSummary": "An exchange traded fund."}}], "error": null}}"#;
    assert_eq!(assert_ok!(YahooParser::parse_sector("SPY", body)), None);

    let body = r#"{"quoteSummary": {"result": [{}], "error": null}}"#;
    assert_eq!(assert_ok!(YahooParser::parse_sector("SPY", body)), None);
}

#[test]
fn test_parse_sector_provider_error() {
    let body = r#"{"quoteSummary": {"result": null, "error": {"code": "Unauthorized", "description": "Invalid Crumb"}}}"#;
    let error = assert_err!(YahooParser::parse_sector("AAPL", body));
    assert!(matches!(error, FetchError::Provider(ref message) if message.contains("Invalid Crumb")));
}

#[test]
fn test_market_timezone_resolution() {
    assert_eq!(MarketTimezone::resolve(Some("Europe/London")), Tz::Europe__London);
    assert_eq!(MarketTimezone::resolve(Some("Mars/Olympus")), chrono_tz::US::Eastern);
    assert_eq!(MarketTimezone::resolve(None), MarketTimezone::Eastern.timezone());
}

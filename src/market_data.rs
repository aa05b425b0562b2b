// src/market_data.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::error::FetchError;
use crate::history_request::HistoryRequest;
use crate::session::HttpSession;

const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart/";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary/";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily closes for one symbol, sorted by date with one point per date.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        let by_date: BTreeMap<NaiveDate, f64> = points.into_iter().map(|p| (p.date, p.close)).collect();
        PriceSeries {
            symbol: symbol.into(),
            points: by_date.into_iter().map(|(date, close)| PricePoint { date, close }).collect(),
        }
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// Everything fetched for one ticker.
#[derive(Clone, Debug)]
pub struct TickerData {
    pub symbol: String,
    pub sector: Option<String>,
    pub prices: PriceSeries,
}

#[async_trait]
pub trait MarketDataProvider {
    async fn fetch(&self, request: &HistoryRequest) -> Result<TickerData, FetchError>;
}

pub enum MarketTimezone {
    Eastern,
}

impl MarketTimezone {
    pub fn timezone(&self) -> Tz {
        match self {
            MarketTimezone::Eastern => chrono_tz::US::Eastern,
        }
    }

    /// Resolves an IANA zone name reported by the exchange, falling back to
    /// US Eastern when the name is missing or unknown.
    pub fn resolve(exchange_timezone: Option<&str>) -> Tz {
        exchange_timezone
            .and_then(|name| name.parse::<Tz>().ok())
            .unwrap_or_else(|| MarketTimezone::Eastern.timezone())
    }
}

/// Yahoo Finance provider: sector from quoteSummary, unadjusted closes from
/// the v8 chart API.
pub struct YahooProvider {
    session: HttpSession,
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    pub fn new(session: HttpSession) -> Self {
        YahooProvider {
            session,
            crumb: Mutex::new(None),
        }
    }

    /// quoteSummary wants a crumb tied to the session cookie. Fetched once and
    /// reused for the rest of the run.
    async fn crumb(&self) -> Result<String, FetchError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // Only the cookie matters here, fc.yahoo.com itself answers 404.
        self.session.send_request(COOKIE_URL).await?;

        let response = self.session.send_request(CRUMB_URL).await?;
        let status = response.status();
        let crumb = response.text().await?.trim().to_string();
        if !status.is_success() || crumb.is_empty() {
            return Err(FetchError::Provider(format!("could not obtain crumb (HTTP {})", status)));
        }

        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn fetch_sector(&self, symbol: &str) -> Result<Option<String>, FetchError> {
        let crumb = self.crumb().await?;
        let url = format!("{}{}", QUOTE_SUMMARY_URL, symbol);
        let query = [("modules", "assetProfile".to_string()), ("crumb", crumb)];

        let response = self.session.send_query(&url, &query).await?;
        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::Status { symbol: symbol.to_string(), status });
        }
        let body = response.text().await?;
        YahooParser::parse_sector(symbol, &body)
    }

    async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceSeries, FetchError> {
        let url = format!("{}{}", CHART_URL, request.symbol);
        let query = [
            ("period1", midnight_timestamp(request.start_date).to_string()),
            ("period2", midnight_timestamp(request.end_date).to_string()),
            ("interval", "1d".to_string()),
            ("includeAdjustedClose", request.adjusted.to_string()),
        ];

        let response = self.session.send_query(&url, &query).await?;
        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::Status { symbol: request.symbol.clone(), status });
        }
        let body = response.text().await?;
        YahooParser::parse_chart(&request.symbol, &body)
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch(&self, request: &HistoryRequest) -> Result<TickerData, FetchError> {
        let sector = self.fetch_sector(&request.symbol).await?;
        let prices = self.fetch_history(request).await?;
        Ok(TickerData {
            symbol: request.symbol.clone(),
            sector,
            prices,
        })
    }
}

fn midnight_timestamp(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ProviderErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryResult,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    result: Option<Vec<QuoteSummaryData>>,
    error: Option<ProviderErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryData {
    asset_profile: Option<AssetProfile>,
}

#[derive(Debug, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
}

/// Decodes Yahoo response bodies.
pub struct YahooParser;

impl YahooParser {
    /// Parses a v8 chart body into the unadjusted daily closes. Days with a
    /// null close are skipped.
    pub fn parse_chart(symbol: &str, body: &str) -> Result<PriceSeries, FetchError> {
        let response: ChartResponse = serde_json::from_str(body)
            .map_err(|e| FetchError::ResponseFormat(format!("chart for {}: {}", symbol, e)))?;

        let data = match (response.chart.result, response.chart.error) {
            (_, Some(error)) => return Err(Self::provider_error(symbol, error)),
            (Some(result), None) => result
                .into_iter()
                .next()
                .ok_or_else(|| FetchError::ResponseFormat("chart result array is empty".into()))?,
            (None, None) => return Err(FetchError::ResponseFormat("chart has neither result nor error".into())),
        };

        let tz = MarketTimezone::resolve(data.meta.as_ref().and_then(|m| m.exchange_timezone_name.as_deref()));
        let timestamps = data.timestamp.unwrap_or_default();
        let closes = data
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default();

        let mut points = Vec::with_capacity(timestamps.len());
        for (ts, close) in timestamps.iter().zip(closes) {
            let Some(close) = close else { continue };
            let date = DateTime::from_timestamp(*ts, 0)
                .ok_or_else(|| FetchError::ResponseFormat(format!("invalid timestamp: {}", ts)))?
                .with_timezone(&tz)
                .date_naive();
            points.push(PricePoint { date, close });
        }

        if points.is_empty() {
            return Err(FetchError::SymbolNotFound { symbol: symbol.to_string() });
        }
        Ok(PriceSeries::new(symbol, points))
    }

    /// Parses a quoteSummary body. A profile without a sector is `None`, not an error.
    pub fn parse_sector(symbol: &str, body: &str) -> Result<Option<String>, FetchError> {
        let response: QuoteSummaryResponse = serde_json::from_str(body)
            .map_err(|e| FetchError::ResponseFormat(format!("quoteSummary for {}: {}", symbol, e)))?;

        if let Some(error) = response.quote_summary.error {
            return Err(Self::provider_error(symbol, error));
        }

        Ok(response
            .quote_summary
            .result
            .and_then(|result| result.into_iter().next())
            .and_then(|data| data.asset_profile)
            .and_then(|profile| profile.sector)
            .filter(|sector| !sector.is_empty()))
    }

    fn provider_error(symbol: &str, error: ProviderErrorBody) -> FetchError {
        if error.code == "Not Found" {
            FetchError::SymbolNotFound { symbol: symbol.to_string() }
        } else {
            FetchError::Provider(format!("{}: {}", error.code, error.description))
        }
    }
}

// src/ticker_registry.rs

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::error::RegistryError;
use crate::session::HttpSession;

/// One company from the SEC ticker registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickerRecord {
    pub cik: u64,
    pub symbol: String,
    pub company_name: String,
}

#[derive(Deserialize)]
struct RegistryEntry {
    cik_str: u64,
    ticker: String,
    title: String,
}

impl From<RegistryEntry> for TickerRecord {
    fn from(entry: RegistryEntry) -> Self {
        TickerRecord {
            cik: entry.cik_str,
            symbol: entry.ticker,
            company_name: entry.title,
        }
    }
}

/// Downloads the registry and returns its first `limit` records.
pub async fn fetch_registry(session: &HttpSession, url: &str, limit: usize) -> Result<Vec<TickerRecord>, RegistryError> {
    let response = session.send_request(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(RegistryError::Status(status));
    }

    let body = response.text().await?;
    let records = parse_registry(&body, limit)?;
    info!("Registry returned {} tickers (capped at {})", records.len(), limit);
    Ok(records)
}

/// Parses the registry body, an object keyed by row index, keeping the order
/// the endpoint sent the rows in.
pub fn parse_registry(body: &str, limit: usize) -> Result<Vec<TickerRecord>, RegistryError> {
    let rows: Map<String, Value> = serde_json::from_str(body)?;
    rows.into_iter()
        .take(limit)
        .map(|(_, row)| -> Result<TickerRecord, RegistryError> {
            let entry: RegistryEntry = serde_json::from_value(row)?;
            Ok(TickerRecord::from(entry))
        })
        .collect()
}

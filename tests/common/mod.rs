// tests/common/mod.rs

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use universe_loader::{FetchError, HistoryRequest, MarketDataProvider, PricePoint, PriceSeries, TickerData, TickerRecord};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn series(symbol: &str, points: &[(&str, f64)]) -> PriceSeries {
    PriceSeries::new(
        symbol,
        points
            .iter()
            .map(|(d, close)| PricePoint { date: date(d), close: *close })
            .collect(),
    )
}

pub fn record(cik: u64, symbol: &str) -> TickerRecord {
    TickerRecord {
        cik,
        symbol: symbol.to_string(),
        company_name: format!("{} Inc.", symbol),
    }
}

/// Serves canned data; symbols without an entry fail like an unknown ticker.
#[derive(Default)]
pub struct StubProvider {
    data: HashMap<String, (Option<String>, PriceSeries)>,
    failing: Vec<String>,
    pub calls: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn with(mut self, symbol: &str, sector: Option<&str>, points: &[(&str, f64)]) -> Self {
        self.data
            .insert(symbol.to_string(), (sector.map(str::to_string), series(symbol, points)));
        self
    }

    pub fn failing(mut self, symbol: &str) -> Self {
        self.failing.push(symbol.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    async fn fetch(&self, request: &HistoryRequest) -> Result<TickerData, FetchError> {
        self.calls.lock().unwrap().push(request.symbol.clone());

        if self.failing.contains(&request.symbol) {
            return Err(FetchError::Provider(format!("simulated outage for {}", request.symbol)));
        }
        match self.data.get(&request.symbol) {
            Some((sector, prices)) => Ok(TickerData {
                symbol: request.symbol.clone(),
                sector: sector.clone(),
                prices: prices.clone(),
            }),
            None => Err(FetchError::SymbolNotFound {
                symbol: request.symbol.clone(),
            }),
        }
    }
}

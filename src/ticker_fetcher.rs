// src/ticker_fetcher.rs

use std::collections::HashMap;
use tracing::{info, warn};

use crate::error::FetchError;
use crate::history_request::HistoryRequest;
use crate::market_data::{MarketDataProvider, PriceSeries, TickerData};
use crate::session::RequestThrottle;

/// Result of fetching one ticker.
#[derive(Debug)]
pub enum TickerOutcome {
    Fetched(TickerData),
    Failed { symbol: String, reason: FetchError },
}

impl TickerOutcome {
    pub fn symbol(&self) -> &str {
        match self {
            TickerOutcome::Fetched(data) => &data.symbol,
            TickerOutcome::Failed { symbol, .. } => symbol,
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, TickerOutcome::Fetched(_))
    }
}

/// Walks the request list one ticker at a time, pausing after each.
pub struct TickerFetcher<'a, P: MarketDataProvider + ?Sized> {
    provider: &'a P,
    throttle: RequestThrottle,
}

impl<'a, P: MarketDataProvider + ?Sized> TickerFetcher<'a, P> {
    pub fn new(provider: &'a P, throttle: RequestThrottle) -> Self {
        TickerFetcher { provider, throttle }
    }

    pub async fn fetch_all(&self, requests: &[HistoryRequest]) -> Vec<TickerOutcome> {
        let total = requests.len();
        let mut outcomes = Vec::with_capacity(total);

        for (i, request) in requests.iter().enumerate() {
            info!("[{}/{}] Fetching {}", i + 1, total, request.symbol);

            let outcome = match self.provider.fetch(request).await {
                Ok(data) => TickerOutcome::Fetched(data),
                Err(reason) => {
                    warn!("Skipping {}: {}", request.symbol, reason);
                    TickerOutcome::Failed {
                        symbol: request.symbol.clone(),
                        reason,
                    }
                }
            };
            outcomes.push(outcome);

            self.throttle.pause().await;
        }

        outcomes
    }
}

/// Per-run state collected from the fetch loop.
#[derive(Debug, Default)]
pub struct FetchAccumulator {
    /// In fetch order.
    pub prices: Vec<PriceSeries>,
    pub sectors: HashMap<String, Option<String>>,
    pub failures: Vec<(String, FetchError)>,
}

impl FetchAccumulator {
    pub fn from_outcomes(outcomes: Vec<TickerOutcome>) -> Self {
        let mut accumulator = FetchAccumulator::default();
        for outcome in outcomes {
            match outcome {
                TickerOutcome::Fetched(data) => accumulator.record(data),
                TickerOutcome::Failed { symbol, reason } => accumulator.failures.push((symbol, reason)),
            }
        }
        accumulator
    }

    /// A repeated symbol overwrites the earlier data but keeps its column slot.
    fn record(&mut self, data: TickerData) {
        self.sectors.insert(data.symbol.clone(), data.sector);
        match self.prices.iter_mut().find(|series| series.symbol == data.symbol) {
            Some(existing) => *existing = data.prices,
            None => self.prices.push(data.prices),
        }
    }

    pub fn fetched_count(&self) -> usize {
        self.prices.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }
}

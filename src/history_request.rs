// src/history_request.rs

use chrono::NaiveDate;

use crate::ticker_registry::TickerRecord;

/// What to ask the market-data provider for a single ticker.
#[derive(Clone, Debug)]
pub struct HistoryRequest {
    pub symbol: String,
    pub start_date: NaiveDate,
    /// Exclusive.
    pub end_date: NaiveDate,
    pub adjusted: bool,
}

impl HistoryRequest {
    pub fn create_history_requests(
        records: &[TickerRecord],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Vec<Self> {
        records
            .iter()
            .map(|record| HistoryRequest {
                symbol: record.symbol.clone(),
                start_date,
                end_date,
                adjusted: false,
            })
            .collect()
    }
}

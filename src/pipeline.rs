// src/pipeline.rs

use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::history_request::HistoryRequest;
use crate::market_data::MarketDataProvider;
use crate::price_table::{PriceTable, PriceTableAssembler};
use crate::sector::SectorSummary;
use crate::session::{HttpSession, RequestThrottle};
use crate::sink;
use crate::ticker_fetcher::{FetchAccumulator, TickerFetcher};
use crate::ticker_registry::{self, TickerRecord};

/// What a completed run produced.
#[derive(Debug)]
pub struct RunReport {
    pub registry_size: usize,
    pub fetched: usize,
    pub failed: Vec<String>,
    pub pruned: Vec<String>,
    pub table: PriceTable,
    pub sectors: SectorSummary,
    pub price_table_path: PathBuf,
    pub sector_path: PathBuf,
}

/// registry -> per-ticker fetch -> price table -> sector summary -> CSV files.
pub struct Pipeline<P: MarketDataProvider> {
    config: PipelineConfig,
    provider: P,
}

impl<P: MarketDataProvider> Pipeline<P> {
    pub fn new(config: PipelineConfig, provider: P) -> Self {
        Pipeline { config, provider }
    }

    pub async fn run(&self, session: &HttpSession) -> Result<RunReport, PipelineError> {
        let records =
            ticker_registry::fetch_registry(session, &self.config.registry_url, self.config.ticker_limit).await?;
        self.run_with_records(&records).await
    }

    /// Runs every stage after the registry fetch on the given records.
    pub async fn run_with_records(&self, records: &[TickerRecord]) -> Result<RunReport, PipelineError> {
        let requests = HistoryRequest::create_history_requests(records, self.config.start_date, self.config.end_date);
        let throttle = RequestThrottle::new(self.config.request_delay);
        let outcomes = TickerFetcher::new(&self.provider, throttle).fetch_all(&requests).await;
        let accumulator = FetchAccumulator::from_outcomes(outcomes);
        info!(
            "Fetched {} of {} tickers ({} failed)",
            accumulator.fetched_count(),
            records.len(),
            accumulator.failed_count()
        );

        let assembly = PriceTableAssembler::assemble(&accumulator.prices)?;
        let survivors = assembly.table.symbols();
        info!(
            "Price table: {} business days x {} symbols ({} dropped for a late start)",
            assembly.table.df.height(),
            survivors.len(),
            assembly.pruned.len()
        );

        let sectors = SectorSummary::from_survivors(&survivors, &accumulator.sectors);
        for share in &sectors.shares {
            debug!("{} {}: {:?}", share.sector, share.percentage(), share.symbols);
        }

        let price_table_path = self.config.price_table_path();
        let sector_path = self.config.sector_path();
        sink::write_price_table(&assembly.table, &price_table_path)?;
        sink::write_sector_summary(&sectors, &sector_path)?;
        info!("Wrote {} and {}", price_table_path.display(), sector_path.display());

        Ok(RunReport {
            registry_size: records.len(),
            fetched: accumulator.fetched_count(),
            failed: accumulator.failures.into_iter().map(|(symbol, _)| symbol).collect(),
            pruned: assembly.pruned,
            table: assembly.table,
            sectors,
            price_table_path,
            sector_path,
        })
    }
}

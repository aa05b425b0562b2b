// src/lib.rs

pub mod calendar;
pub mod config;
pub mod error;
pub mod history_request;
pub mod market_data;
pub mod pipeline;
pub mod price_table;
pub mod sector;
pub mod session;
pub mod sink;
pub mod ticker_fetcher;
pub mod ticker_registry;

pub use session::{HttpSession, RequestThrottle};

pub use config::PipelineConfig;
pub use error::{FetchError, PipelineError, RegistryError};
pub use history_request::HistoryRequest;
pub use market_data::{MarketDataProvider, MarketTimezone, PricePoint, PriceSeries, TickerData, YahooParser, YahooProvider};
pub use pipeline::{Pipeline, RunReport};
pub use price_table::{PriceTable, PriceTableAssembler};
pub use sector::SectorSummary;
pub use ticker_fetcher::{FetchAccumulator, TickerFetcher, TickerOutcome};
pub use ticker_registry::TickerRecord;

// src/config.rs

use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

pub const REGISTRY_URL: &str = "https://www.sec.gov/files/company_tickers.json";

// sec.gov rejects requests without a recognizable client identity
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:132.0) Gecko/20100101 Firefox/132.0";
pub const ACCEPT: &str = "application/json";

pub const TICKER_LIMIT: usize = 1500;

/// History window as (year, month, day). The end date is exclusive.
pub const HISTORY_START: (i32, u32, u32) = (1985, 1, 2);
pub const HISTORY_END: (i32, u32, u32) = (2024, 12, 31);

pub const REQUEST_DELAY_SECS: u64 = 1;

pub const DATA_DIR: &str = "data";
pub const PRICE_TABLE_FILE: &str = "univers.csv";
pub const SECTOR_FILE: &str = "secteurs.csv";

/// Everything a single pipeline run needs, built from the constants above.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub registry_url: String,
    pub ticker_limit: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub request_delay: Duration,
    pub data_dir: PathBuf,
}

impl PipelineConfig {
    pub fn price_table_path(&self) -> PathBuf {
        self.data_dir.join(PRICE_TABLE_FILE)
    }

    pub fn sector_path(&self) -> PathBuf {
        self.data_dir.join(SECTOR_FILE)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            registry_url: REGISTRY_URL.to_string(),
            ticker_limit: TICKER_LIMIT,
            start_date: const_date(HISTORY_START),
            end_date: const_date(HISTORY_END),
            request_delay: Duration::from_secs(REQUEST_DELAY_SECS),
            data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DATA_DIR),
        }
    }
}

fn const_date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("history bounds are valid calendar dates")
}

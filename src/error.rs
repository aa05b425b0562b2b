// src/error.rs

use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures fetching or decoding the ticker registry. These end the run.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("registry returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("registry response is not in the expected format: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures for a single ticker. The fetch loop logs these and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} for {symbol}")]
    Status {
        symbol: String,
        status: reqwest::StatusCode,
    },

    #[error("{symbol}: no price data found, symbol may be delisted")]
    SymbolNotFound { symbol: String },

    #[error("provider error: {0}")]
    Provider(String),

    #[error("response format changed: {0}")]
    ResponseFormat(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("table operation failed: {0}")]
    Polars(#[from] PolarsError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

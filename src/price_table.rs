// src/price_table.rs

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

use crate::calendar::business_days;
use crate::market_data::{MarketTimezone, PriceSeries};

pub const DATE_COLUMN: &str = "date";
/// Exchange-local midnight with its UTC offset, e.g. `1985-01-02 00:00:00-05:00`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Closing prices on a shared business-day axis: a `date` column followed by
/// one Float64 column per symbol.
#[derive(Clone, Debug)]
pub struct PriceTable {
    pub df: DataFrame,
}

impl PriceTable {
    pub fn symbols(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .filter(|name| *name != DATE_COLUMN)
            .map(|name| name.to_string())
            .collect()
    }

    pub fn dates(&self) -> Result<Vec<NaiveDate>, PolarsError> {
        parse_dates(&self.df)
    }

    pub fn close(&self, symbol: &str, row: usize) -> Result<Option<f64>, PolarsError> {
        let column = self.df.column(symbol)?.f64()?;
        Ok(if row < column.len() { column.get(row) } else { None })
    }
}

/// Output of the assembler: the table plus the symbols dropped for lacking a
/// first value.
#[derive(Debug)]
pub struct Assembly {
    pub table: PriceTable,
    pub pruned: Vec<String>,
}

pub struct PriceTableAssembler;

impl PriceTableAssembler {
    /// Merges, reindexes onto business days, forward-fills, then drops columns
    /// that are still missing on the first row.
    pub fn assemble(series: &[PriceSeries]) -> Result<Assembly, PolarsError> {
        let calendar = match Self::observed_range(series) {
            Some((first, last)) => business_days(first, last),
            None => Vec::new(),
        };

        let raw = Self::reindex(series, &calendar)?;
        let mut df = Self::forward_fill(&raw)?;
        let pruned = Self::prune_incomplete(&mut df)?;

        Ok(Assembly {
            table: PriceTable { df },
            pruned,
        })
    }

    fn observed_range(series: &[PriceSeries]) -> Option<(NaiveDate, NaiveDate)> {
        let first = series.iter().filter_map(PriceSeries::first_date).min()?;
        let last = series.iter().filter_map(PriceSeries::last_date).max()?;
        Some((first, last))
    }

    /// Lays every series onto `calendar`. Dates a series has no close for are
    /// null, and closes on dates outside the calendar are dropped.
    pub fn reindex(series: &[PriceSeries], calendar: &[NaiveDate]) -> Result<DataFrame, PolarsError> {
        let date_strings = calendar
            .iter()
            .map(|d| format_session_date(*d))
            .collect::<Result<Vec<String>, PolarsError>>()?;
        let mut columns = Vec::with_capacity(series.len() + 1);
        columns.push(Series::new(DATE_COLUMN, date_strings));

        for s in series {
            let closes: HashMap<NaiveDate, f64> = s.points.iter().map(|p| (p.date, p.close)).collect();
            let values: Vec<Option<f64>> = calendar.iter().map(|d| closes.get(d).copied()).collect();
            columns.push(Series::new(&s.symbol, values));
        }

        DataFrame::new(columns)
    }

    /// Carries the last known close forward in every price column. No back-fill.
    pub fn forward_fill(df: &DataFrame) -> Result<DataFrame, PolarsError> {
        let columns = df
            .get_columns()
            .iter()
            .map(|s| {
                if s.name() == DATE_COLUMN {
                    Ok(s.clone())
                } else {
                    s.fill_null(FillNullStrategy::Forward(None))
                }
            })
            .collect::<Result<Vec<_>, PolarsError>>()?;
        DataFrame::new(columns)
    }

    /// Drops every price column whose first row is null and returns their names.
    pub fn prune_incomplete(df: &mut DataFrame) -> Result<Vec<String>, PolarsError> {
        let symbols: Vec<String> = df
            .get_column_names()
            .into_iter()
            .filter(|name| *name != DATE_COLUMN)
            .map(|name| name.to_string())
            .collect();

        let mut pruned = Vec::new();
        for symbol in symbols {
            let missing_first = df.height() == 0 || df.column(&symbol)?.f64()?.get(0).is_none();
            if missing_first {
                debug!("Dropping {}: no close on the first day of the range", symbol);
                df.drop_in_place(&symbol)?;
                pruned.push(symbol);
            }
        }
        Ok(pruned)
    }
}

pub fn parse_dates(df: &DataFrame) -> Result<Vec<NaiveDate>, PolarsError> {
    df.column(DATE_COLUMN)?
        .str()?
        .into_iter()
        .map(|value| {
            let value = value.ok_or_else(|| PolarsError::ComputeError("null date in price table".into()))?;
            DateTime::parse_from_str(value, DATE_FORMAT)
                .map(|dt| dt.date_naive())
                .map_err(|e| PolarsError::ComputeError(format!("bad date '{}': {}", value, e).into()))
        })
        .collect()
}

/// Renders a calendar day as midnight on the US exchanges.
pub fn format_session_date(date: NaiveDate) -> Result<String, PolarsError> {
    let midnight = MarketTimezone::Eastern
        .timezone()
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .ok_or_else(|| PolarsError::ComputeError(format!("no local midnight on {}", date).into()))?;
    Ok(midnight.format(DATE_FORMAT).to_string())
}

// src/sink.rs

use polars::prelude::*;
use std::fs::File;
use std::path::Path;

use crate::error::PipelineError;
use crate::price_table::PriceTable;
use crate::sector::SectorSummary;

pub const SECTOR_COLUMN: &str = "Secteur";
pub const PERCENTAGE_COLUMN: &str = "Pourcentage";

/// Writes the price table as CSV, date first. The target directory must exist.
pub fn write_price_table(table: &PriceTable, path: &Path) -> Result<(), PipelineError> {
    let mut df = table.df.clone();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}

pub fn write_sector_summary(summary: &SectorSummary, path: &Path) -> Result<(), PipelineError> {
    let (sectors, percentages): (Vec<String>, Vec<String>) = summary.rows().into_iter().unzip();
    let mut df = DataFrame::new(vec![
        Series::new(SECTOR_COLUMN, sectors),
        Series::new(PERCENTAGE_COLUMN, percentages),
    ])?;

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}

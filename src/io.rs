//! CSV ingestion of price and generation profiles.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::{ProfileKind, TimeSeries, TimeSeriesRow};

/// Input columns. Headers match case-sensitively on either spelling; any
/// other column (e.g. `Hour`) is ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Price")]
    price: f64,
    #[serde(alias = "Solar")]
    solar: f64,
    #[serde(alias = "Wind", default)]
    wind: Option<f64>,
}

/// Load a series from a CSV file. Row order is timestep order.
pub fn load_csv(path: &Path, profile: ProfileKind) -> Result<TimeSeries> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_csv(file, profile).with_context(|| format!("failed to read {}", path.display()))
}

pub fn read_csv(reader: impl Read, profile: ProfileKind) -> Result<TimeSeries> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, record) in rdr.deserialize::<CsvRow>().enumerate() {
        // Header is line 1
        let record = record.with_context(|| format!("invalid CSV record on line {}", i + 2))?;
        rows.push(TimeSeriesRow {
            price: record.price,
            solar_available: record.solar,
            wind_available: record.wind,
        });
    }

    Ok(TimeSeries::new(rows, profile))
}

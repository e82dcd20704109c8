use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::TimeSeriesRow;

/// Optimal operation at one timestep
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResultRow {
    pub t: usize,
    /// Input row, passed through for presentation layers
    pub input: TimeSeriesRow,
    pub solar_dispatch: f64,
    pub wind_dispatch: f64,
    pub charge: f64,
    pub discharge: f64,
    pub grid_export: f64,
    pub grid_import: f64,
    /// Stored energy at the end of the timestep (MWh)
    pub soc: f64,
    /// Revenue earned in this timestep
    pub objective: f64,
}

/// Time-indexed optimal schedule, aligned with the input series
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultSeries {
    pub rows: Vec<ResultRow>,
}

impl ResultSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn soc(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.soc).collect()
    }

    pub fn grid_import(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.grid_import).collect()
    }

    pub fn grid_export(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.grid_export).collect()
    }

    /// Sum of per-timestep objective contributions
    pub fn total_revenue(&self) -> f64 {
        self.rows.iter().map(|r| r.objective).sum()
    }
}

/// Outcome of one optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispatch {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub series: ResultSeries,
    pub total_revenue: f64,
    /// Wall clock time spent building, solving and extracting
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

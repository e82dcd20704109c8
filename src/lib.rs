//! Revenue-optimal scheduling of a battery co-located with solar and wind,
//! formulated as a linear program over a price time series.

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod optimizer;
pub mod scenario;
pub mod telemetry;

pub use error::{ArbitrageError, Result};

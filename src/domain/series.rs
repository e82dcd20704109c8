use serde::{Deserialize, Serialize};

use crate::error::{ArbitrageError, Result};

/// How the generation columns of a series are expressed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// Fraction of nameplate capacity, in [0, 1]
    Normalized,
    /// Available power in MW
    #[default]
    Absolute,
}

impl std::str::FromStr for ProfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normalized" | "normalised" => Ok(ProfileKind::Normalized),
            "absolute" => Ok(ProfileKind::Absolute),
            _ => Err(format!("Unknown profile kind: {}", s)),
        }
    }
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileKind::Normalized => write!(f, "normalized"),
            ProfileKind::Absolute => write!(f, "absolute"),
        }
    }
}

/// One row of input data. Row order is timestep order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeSeriesRow {
    /// Price per MWh
    pub price: f64,
    /// Raw solar profile, interpreted through the series' `ProfileKind`
    pub solar_available: f64,
    /// Raw wind profile, absent when the site has no wind data
    pub wind_available: Option<f64>,
}

impl TimeSeriesRow {
    pub fn new(price: f64, solar_available: f64) -> Self {
        Self {
            price,
            solar_available,
            wind_available: None,
        }
    }

    pub fn with_wind(mut self, wind_available: f64) -> Self {
        self.wind_available = Some(wind_available);
        self
    }
}

/// Read-only price and generation profile over the optimization horizon.
///
/// The raw profile is never rescaled in place. Available power for a given
/// capacity is derived on demand, so the same series can be re-solved with
/// different capacities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSeries {
    rows: Vec<TimeSeriesRow>,
    profile: ProfileKind,
}

impl TimeSeries {
    pub fn new(rows: Vec<TimeSeriesRow>, profile: ProfileKind) -> Self {
        Self { rows, profile }
    }

    /// Absolute-MW series from parallel price and solar columns
    pub fn from_columns(prices: &[f64], solar: &[f64]) -> Self {
        let rows = prices
            .iter()
            .zip(solar)
            .map(|(&price, &solar)| TimeSeriesRow::new(price, solar))
            .collect();
        Self::new(rows, ProfileKind::Absolute)
    }

    pub fn rows(&self) -> &[TimeSeriesRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn profile(&self) -> ProfileKind {
        self.profile
    }

    /// True when every row carries a wind value
    pub fn has_wind(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|r| r.wind_available.is_some())
    }

    /// First `n` timesteps (the whole series if shorter)
    pub fn head(&self, n: usize) -> Self {
        Self {
            rows: self.rows.iter().take(n).copied().collect(),
            profile: self.profile,
        }
    }

    /// Solar power available at `t` for a plant of `capacity` MW
    pub fn solar_power(&self, t: usize, capacity: f64) -> f64 {
        self.scale(self.rows[t].solar_available, capacity)
    }

    /// Wind power available at `t`, zero when the row has no wind value
    pub fn wind_power(&self, t: usize, capacity: f64) -> f64 {
        self.rows[t]
            .wind_available
            .map(|raw| self.scale(raw, capacity))
            .unwrap_or(0.0)
    }

    fn scale(&self, raw: f64, capacity: f64) -> f64 {
        match self.profile {
            ProfileKind::Normalized => raw * capacity,
            ProfileKind::Absolute => raw,
        }
    }

    /// Check every row for values the LP cannot use.
    ///
    /// `needs_wind` is set when a wind asset is configured; every row must then
    /// carry a valid wind value. Without it the wind column is ignored.
    pub fn validate(&self, needs_wind: bool) -> Result<()> {
        if self.rows.is_empty() {
            return Err(ArbitrageError::EmptySeries);
        }

        for (row, r) in self.rows.iter().enumerate() {
            if !r.price.is_finite() {
                return Err(invalid(row, format!("price is not finite: {}", r.price)));
            }
            self.check_profile(row, "solar", r.solar_available)?;
            if !needs_wind {
                continue;
            }
            match r.wind_available {
                Some(wind) => self.check_profile(row, "wind", wind)?,
                None => {
                    return Err(invalid(
                        row,
                        "wind capacity is configured but the row has no wind profile".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    fn check_profile(&self, row: usize, name: &str, value: f64) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(
                row,
                format!("{} availability must be finite and non-negative: {}", name, value),
            ));
        }
        if self.profile == ProfileKind::Normalized && value > 1.0 {
            return Err(invalid(
                row,
                format!("normalized {} availability exceeds 1.0: {}", name, value),
            ));
        }
        Ok(())
    }
}

fn invalid(row: usize, reason: String) -> ArbitrageError {
    ArbitrageError::InvalidSeries { row, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_profile_scales_by_capacity() {
        let series = TimeSeries::new(
            vec![TimeSeriesRow::new(10.0, 0.5).with_wind(0.25)],
            ProfileKind::Normalized,
        );
        assert_eq!(series.solar_power(0, 30.0), 15.0);
        assert_eq!(series.wind_power(0, 40.0), 10.0);
        // Raw values are untouched
        assert_eq!(series.rows()[0].solar_available, 0.5);
    }

    #[test]
    fn test_absolute_profile_ignores_capacity() {
        let series = TimeSeries::from_columns(&[10.0], &[7.0]);
        assert_eq!(series.solar_power(0, 50.0), 7.0);
        assert_eq!(series.wind_power(0, 50.0), 0.0);
        assert!(!series.has_wind());
    }

    #[test]
    fn test_head_truncates() {
        let series = TimeSeries::from_columns(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0]);
        assert_eq!(series.head(2).len(), 2);
        assert_eq!(series.head(10).len(), 3);
        assert_eq!(series.head(2).rows()[1].price, 2.0);
    }

    #[test]
    fn test_validation_empty() {
        let series = TimeSeries::new(vec![], ProfileKind::Absolute);
        assert_eq!(series.validate(false), Err(ArbitrageError::EmptySeries));
    }

    #[test]
    fn test_validation_rejects_bad_rows() {
        let series = TimeSeries::from_columns(&[1.0, f64::NAN], &[0.0, 0.0]);
        assert!(matches!(
            series.validate(false),
            Err(ArbitrageError::InvalidSeries { row: 1, .. })
        ));

        let series = TimeSeries::from_columns(&[1.0], &[-2.0]);
        assert!(series.validate(false).is_err());

        let series = TimeSeries::new(vec![TimeSeriesRow::new(1.0, 1.5)], ProfileKind::Normalized);
        assert!(series.validate(false).is_err());
    }

    #[test]
    fn test_validation_requires_wind_when_configured() {
        let series = TimeSeries::from_columns(&[1.0], &[1.0]);
        assert!(series.validate(false).is_ok());
        assert!(matches!(
            series.validate(true),
            Err(ArbitrageError::InvalidSeries { row: 0, .. })
        ));
    }

    #[test]
    fn test_wind_column_ignored_without_wind_asset() {
        let series = TimeSeries::new(
            vec![
                TimeSeriesRow::new(10.0, 0.5).with_wind(f64::NAN),
                TimeSeriesRow::new(10.0, 0.5).with_wind(3.0),
            ],
            ProfileKind::Normalized,
        );
        assert!(series.validate(false).is_ok());
        assert!(matches!(
            series.validate(true),
            Err(ArbitrageError::InvalidSeries { row: 0, .. })
        ));
    }

    #[test]
    fn test_profile_kind_parse() {
        assert_eq!("Normalized".parse::<ProfileKind>(), Ok(ProfileKind::Normalized));
        assert_eq!("absolute".parse::<ProfileKind>(), Ok(ProfileKind::Absolute));
        assert!("percent".parse::<ProfileKind>().is_err());
    }
}

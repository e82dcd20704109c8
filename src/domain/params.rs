use serde::{Deserialize, Serialize};

use crate::error::{ArbitrageError, Result};

/// Scalar configuration of one optimization run.
///
/// Capacities are in MW (power) and MWh (energy). No `Default`: the timestep
/// duration scales every energy and revenue term and must come from the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ModelParameters {
    pub solar_cap: f64,
    pub wind_cap: f64,
    /// Charge and discharge power limit (DC side)
    pub battery_power_cap: f64,
    pub battery_energy_cap: f64,
    /// Grid connection limit, applied to import and export separately (AC side)
    pub grid_cap: f64,
    pub inverter_efficiency: f64,
    /// One-way efficiency, applied on charge and again on discharge
    pub battery_efficiency: f64,
    /// Stored energy before the first timestep
    pub start_charge: f64,
    /// Hours represented by one row (1.0 hourly, 0.25 for 15-minute data)
    pub timestep_duration_h: f64,
}

impl ModelParameters {
    /// Same site with the battery removed
    pub fn without_storage(&self) -> Self {
        Self {
            battery_power_cap: 0.0,
            battery_energy_cap: 0.0,
            start_charge: 0.0,
            ..*self
        }
    }

    pub fn has_solar(&self) -> bool {
        self.solar_cap > 0.0
    }

    pub fn has_wind(&self) -> bool {
        self.wind_cap > 0.0
    }

    pub fn has_battery_power(&self) -> bool {
        self.battery_power_cap > 0.0
    }

    pub fn has_storage(&self) -> bool {
        self.battery_energy_cap > 0.0
    }

    pub fn has_grid(&self) -> bool {
        self.grid_cap > 0.0
    }

    /// Validate parameters for consistency
    pub fn validate(&self) -> Result<()> {
        let capacities = [
            ("solar_cap", self.solar_cap),
            ("wind_cap", self.wind_cap),
            ("battery_power_cap", self.battery_power_cap),
            ("battery_energy_cap", self.battery_energy_cap),
            ("grid_cap", self.grid_cap),
        ];
        for (name, value) in capacities {
            if !value.is_finite() {
                return Err(invalid(format!("{} is not finite: {}", name, value)));
            }
            if value < 0.0 {
                return Err(invalid(format!("{} cannot be negative: {}", name, value)));
            }
        }

        for (name, value) in [
            ("inverter_efficiency", self.inverter_efficiency),
            ("battery_efficiency", self.battery_efficiency),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(format!("{} must be in (0, 1]: {}", name, value)));
            }
        }

        if !self.start_charge.is_finite()
            || self.start_charge < 0.0
            || self.start_charge > self.battery_energy_cap
        {
            return Err(invalid(format!(
                "start_charge must be between 0 and battery_energy_cap ({}): {}",
                self.battery_energy_cap, self.start_charge
            )));
        }

        if !(self.timestep_duration_h.is_finite() && self.timestep_duration_h > 0.0) {
            return Err(invalid(format!(
                "timestep_duration_h must be positive: {}",
                self.timestep_duration_h
            )));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> ArbitrageError {
    ArbitrageError::InvalidParameters(reason)
}

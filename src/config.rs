use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{ModelParameters, ProfileKind};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    pub asset: AssetConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub solver: SolverConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub profile: ProfileKind,
    /// Optimize over the first N rows only
    pub horizon_steps: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    pub solar_cap_mw: f64,
    #[serde(default)]
    pub wind_cap_mw: f64,
    pub battery_power_mw: f64,
    pub battery_energy_mwh: f64,
    pub grid_cap_mw: f64,
    pub start_charge_mwh: Option<f64>,
    /// Start charge as a fraction of energy capacity
    pub start_charge_fraction: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub timestep_hours: f64,
    pub inverter_efficiency: f64,
    pub battery_efficiency: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SolverConfig {
    pub deadline_seconds: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("ARBITRAGE__").split("__"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

    /// Parameters for the optimizer. Range checks happen in the optimizer.
    pub fn model_parameters(&self) -> Result<ModelParameters> {
        let asset = &self.asset;
        let start_charge = match (asset.start_charge_mwh, asset.start_charge_fraction) {
            (Some(_), Some(_)) => anyhow::bail!(
                "set either asset.start_charge_mwh or asset.start_charge_fraction, not both"
            ),
            (Some(mwh), None) => mwh,
            (None, Some(fraction)) => fraction * asset.battery_energy_mwh,
            (None, None) => 0.0,
        };

        Ok(ModelParameters {
            solar_cap: asset.solar_cap_mw,
            wind_cap: asset.wind_cap_mw,
            battery_power_cap: asset.battery_power_mw,
            battery_energy_cap: asset.battery_energy_mwh,
            grid_cap: asset.grid_cap_mw,
            inverter_efficiency: self.model.inverter_efficiency,
            battery_efficiency: self.model.battery_efficiency,
            start_charge,
            timestep_duration_h: self.model.timestep_hours,
        })
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.solver.deadline_seconds.map(Duration::from_secs)
    }
}

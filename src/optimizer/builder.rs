//! LP formulation of co-located storage arbitrage.
//!
//! Per timestep `t` (prices in $/MWh, power in MW, energy in MWh):
//!
//! ```text
//! max  Σ_t (export[t] - import[t]) * price[t] * Δt
//!
//! s.t. solar[t] + wind[t] + discharge[t] - charge[t]
//!          = export[t] / η_inv - import[t] * η_inv          (DC energy balance)
//!      solar[t] <= solar_available[t]
//!      wind[t]  <= wind_available[t]
//!      soc[t] = soc[t-1] + Δt * (charge[t] * η_bat - discharge[t] / η_bat)
//!      soc[-1] = start_charge
//! ```
//!
//! Capacities are variable bounds. A role with zero capacity gets no variable
//! and every term that would reference it is dropped.

use tracing::{debug, warn};

use super::model::{Constraint, Direction, LinearExpr, LpModel, VarId};
use crate::domain::{ModelParameters, TimeSeries};
use crate::error::Result;

/// Horizon above which a solve is likely to be slow
const LARGE_HORIZON_STEPS: usize = 8760;

/// Decision variables of one timestep. `None` marks a role that was
/// collapsed to zero by a zero capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct StepVariables {
    pub solar: Option<VarId>,
    pub wind: Option<VarId>,
    pub charge: Option<VarId>,
    pub discharge: Option<VarId>,
    pub grid_export: Option<VarId>,
    pub grid_import: Option<VarId>,
    pub soc: Option<VarId>,
    /// Objective contribution of this timestep
    pub revenue: LinearExpr,
}

impl StepVariables {
    /// All variables declared for this timestep
    pub fn declared(&self) -> impl Iterator<Item = VarId> + '_ {
        [
            self.solar,
            self.wind,
            self.charge,
            self.discharge,
            self.grid_export,
            self.grid_import,
            self.soc,
        ]
        .into_iter()
        .flatten()
    }
}

/// An assembled model plus the per-timestep handles needed to read it back
#[derive(Debug, Clone)]
pub struct BuiltModel {
    pub model: LpModel,
    /// One entry per timestep, in timestep order
    pub steps: Vec<StepVariables>,
}

pub struct ModelBuilder<'a> {
    series: &'a TimeSeries,
    params: &'a ModelParameters,
}

impl<'a> ModelBuilder<'a> {
    /// Validate inputs. Nothing is built when this fails.
    pub fn new(series: &'a TimeSeries, params: &'a ModelParameters) -> Result<Self> {
        params.validate()?;
        series.validate(params.has_wind())?;
        Ok(Self { series, params })
    }

    pub fn build(self) -> BuiltModel {
        let p = self.params;
        let n_steps = self.series.len();
        let dt = p.timestep_duration_h;

        if n_steps > LARGE_HORIZON_STEPS {
            warn!(
                n_steps,
                "LP horizon is longer than one year of hourly data, solve may take a while"
            );
        }

        let mut model = LpModel::new(Direction::Maximize);
        let mut steps: Vec<StepVariables> = Vec::with_capacity(n_steps);
        let mut objective = LinearExpr::new();

        for (t, row) in self.series.rows().iter().enumerate() {
            let mut bounded = |name: &str, enabled: bool, cap: f64| {
                enabled.then(|| model.add_variable(format!("{}_{}", name, t), 0.0, cap))
            };

            let solar = bounded("solar", p.has_solar(), p.solar_cap);
            let wind = bounded("wind", p.has_wind(), p.wind_cap);
            let charge = bounded("charge", p.has_battery_power(), p.battery_power_cap);
            let discharge = bounded("discharge", p.has_battery_power(), p.battery_power_cap);
            let grid_export = bounded("grid_export", p.has_grid(), p.grid_cap);
            let grid_import = bounded("grid_import", p.has_grid(), p.grid_cap);
            let soc = bounded("soc", p.has_storage(), p.battery_energy_cap);

            // DC energy balance
            let mut balance = LinearExpr::new();
            balance
                .add_opt(solar, 1.0)
                .add_opt(wind, 1.0)
                .add_opt(discharge, 1.0)
                .add_opt(charge, -1.0)
                .add_opt(grid_export, -1.0 / p.inverter_efficiency)
                .add_opt(grid_import, p.inverter_efficiency);
            model.add_constraint(Constraint::eq(format!("balance_{}", t), balance, 0.0));

            // Dispatch ceilings
            if let Some(solar) = solar {
                let mut ceiling = LinearExpr::new();
                ceiling.add(solar, 1.0);
                let available = self.series.solar_power(t, p.solar_cap);
                model.add_constraint(Constraint::leq(format!("solar_avail_{}", t), ceiling, available));
            }
            if let Some(wind) = wind {
                let mut ceiling = LinearExpr::new();
                ceiling.add(wind, 1.0);
                let available = self.series.wind_power(t, p.wind_cap);
                model.add_constraint(Constraint::leq(format!("wind_avail_{}", t), ceiling, available));
            }

            // SOC recursion: soc[t] - soc[t-1] - Δt*η*charge + Δt/η*discharge = soc[-1]
            let (previous_soc, carried_in) = match steps.last() {
                Some(prev) => (prev.soc, 0.0),
                None => (None, p.start_charge),
            };
            let mut recursion = LinearExpr::new();
            recursion
                .add_opt(soc, 1.0)
                .add_opt(previous_soc, -1.0)
                .add_opt(charge, -dt * p.battery_efficiency)
                .add_opt(discharge, dt / p.battery_efficiency);
            model.add_constraint(Constraint::eq(format!("soc_{}", t), recursion, carried_in));

            let mut revenue = LinearExpr::new();
            revenue
                .add_opt(grid_export, row.price * dt)
                .add_opt(grid_import, -row.price * dt);
            for &(var, coefficient) in revenue.terms() {
                objective.add(var, coefficient);
            }

            steps.push(StepVariables {
                solar,
                wind,
                charge,
                discharge,
                grid_export,
                grid_import,
                soc,
                revenue,
            });
        }

        model.set_objective(objective);

        debug!(
            n_steps,
            variables = model.num_variables(),
            constraints = model.constraints().len(),
            wind = p.has_wind(),
            "built arbitrage LP"
        );

        BuiltModel { model, steps }
    }
}

//! Shared fixtures and physics checks for integration tests.
#![allow(dead_code)]

use storage_arbitrage::domain::{Dispatch, ModelParameters, TimeSeries};

/// Absolute tolerance for values coming back from the simplex solver
pub const TOL: f64 = 1e-5;

/// Hourly day-ahead style prices ($/MWh)
pub const DAY_PRICES: [f64; 24] = [
    22.0, 18.0, 15.0, 12.0, 10.0, 14.0, 25.0, 38.0, 45.0, 40.0, 32.0, 28.0, 24.0, 22.0, 26.0,
    34.0, 48.0, 72.0, 95.0, 88.0, 64.0, 48.0, 36.0, 28.0,
];

/// Solar output (MW) of a 50 MW plant
pub const DAY_SOLAR: [f64; 24] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 11.97, 23.24, 33.16, 41.15, 46.79, 49.64, 49.64, 46.79,
    41.15, 33.16, 23.24, 11.97, 0.0, 0.0, 0.0, 0.0, 0.0,
];

/// 50 MW solar, 10 MW / 40 MWh battery, 10 MW grid connection, hourly
pub fn site_params() -> ModelParameters {
    ModelParameters {
        solar_cap: 50.0,
        wind_cap: 0.0,
        battery_power_cap: 10.0,
        battery_energy_cap: 40.0,
        grid_cap: 10.0,
        inverter_efficiency: 0.95,
        battery_efficiency: 0.92,
        start_charge: 20.0,
        timestep_duration_h: 1.0,
    }
}

pub fn day_series() -> TimeSeries {
    TimeSeries::from_columns(&DAY_PRICES, &DAY_SOLAR)
}

/// Check the solved schedule against every hard constraint of the LP
pub fn assert_physics(series: &TimeSeries, params: &ModelParameters, dispatch: &Dispatch) {
    let rows = &dispatch.series.rows;
    assert_eq!(rows.len(), series.len(), "one result row per timestep");

    let dt = params.timestep_duration_h;
    let eta_inv = params.inverter_efficiency;
    let eta_bat = params.battery_efficiency;

    let mut previous_soc = params.start_charge;
    for (t, r) in rows.iter().enumerate() {
        assert_eq!(r.t, t);

        // DC energy balance
        let dc_supply = r.solar_dispatch + r.wind_dispatch + r.discharge - r.charge;
        let dc_grid = r.grid_export / eta_inv - r.grid_import * eta_inv;
        assert!(
            (dc_supply - dc_grid).abs() <= TOL,
            "energy balance violated at t={}: {} vs {}",
            t,
            dc_supply,
            dc_grid
        );

        // SOC recursion
        let expected_soc = previous_soc + dt * (r.charge * eta_bat - r.discharge / eta_bat);
        assert!(
            (r.soc - expected_soc).abs() <= TOL,
            "soc recursion violated at t={}: {} vs {}",
            t,
            r.soc,
            expected_soc
        );
        previous_soc = r.soc;

        // Bounds
        let within = |value: f64, cap: f64| value >= -TOL && value <= cap + TOL;
        assert!(within(r.solar_dispatch, params.solar_cap), "solar out of bounds at t={}", t);
        assert!(within(r.wind_dispatch, params.wind_cap), "wind out of bounds at t={}", t);
        assert!(within(r.charge, params.battery_power_cap), "charge out of bounds at t={}", t);
        assert!(within(r.discharge, params.battery_power_cap), "discharge out of bounds at t={}", t);
        assert!(within(r.grid_export, params.grid_cap), "export out of bounds at t={}", t);
        assert!(within(r.grid_import, params.grid_cap), "import out of bounds at t={}", t);
        assert!(within(r.soc, params.battery_energy_cap), "soc out of bounds at t={}", t);

        // Dispatch ceilings
        assert!(r.solar_dispatch <= series.solar_power(t, params.solar_cap) + TOL);
        assert!(r.wind_dispatch <= series.wind_power(t, params.wind_cap) + TOL);

        // Objective contribution
        let expected = (r.grid_export - r.grid_import) * r.input.price * dt;
        assert!((r.objective - expected).abs() <= TOL * r.input.price.abs().max(1.0));
    }
}

use std::collections::HashMap;

use tracing::warn;

use super::builder::BuiltModel;
use super::model::VarId;
use super::solver::{SolveStatus, SolverOutput};
use crate::domain::{ResultRow, ResultSeries, TimeSeries};
use crate::error::{ArbitrageError, Result};

/// Read solved values back into a timestep-aligned `ResultSeries`.
///
/// Pure projection: no value the solver produced is recomputed. Collapsed
/// roles read as `0.0`; a declared variable missing from the output is an
/// error. `series` must be the one the model was built from.
pub fn extract(series: &TimeSeries, built: &BuiltModel, output: &SolverOutput) -> Result<ResultSeries> {
    if series.len() != built.steps.len() {
        return Err(ArbitrageError::InvalidSeries {
            row: series.len().min(built.steps.len()),
            reason: format!(
                "series has {} rows but the model has {} timesteps",
                series.len(),
                built.steps.len()
            ),
        });
    }

    match output.status {
        SolveStatus::Optimal => {}
        status => {
            warn!(%status, message = ?output.message, "LP solve did not reach optimality");
            return Err(match status {
                SolveStatus::Infeasible => ArbitrageError::Infeasible,
                SolveStatus::Unbounded => ArbitrageError::Unbounded,
                _ => ArbitrageError::NotSolved(
                    output
                        .message
                        .clone()
                        .unwrap_or_else(|| "solver returned no solution".to_string()),
                ),
            });
        }
    }

    let values = &output.values;
    let missing = |var: VarId| ArbitrageError::MissingVariableValue {
        variable: built.model.variable(var).name.clone(),
    };
    let value = |slot: Option<VarId>| -> Result<f64> {
        match slot {
            Some(var) => lookup(values, var).ok_or_else(|| missing(var)),
            None => Ok(0.0),
        }
    };

    let rows = series
        .rows()
        .iter()
        .zip(&built.steps)
        .enumerate()
        .map(|(t, (input, step))| {
            Ok(ResultRow {
                t,
                input: *input,
                solar_dispatch: value(step.solar)?,
                wind_dispatch: value(step.wind)?,
                charge: value(step.charge)?,
                discharge: value(step.discharge)?,
                grid_export: value(step.grid_export)?,
                grid_import: value(step.grid_import)?,
                soc: value(step.soc)?,
                objective: step.revenue.evaluate(values).map_err(missing)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ResultSeries { rows })
}

fn lookup(values: &HashMap<VarId, f64>, var: VarId) -> Option<f64> {
    values.get(&var).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelParameters;
    use crate::optimizer::builder::ModelBuilder;

    fn params() -> ModelParameters {
        ModelParameters {
            solar_cap: 5.0,
            wind_cap: 0.0,
            battery_power_cap: 0.0,
            battery_energy_cap: 0.0,
            grid_cap: 5.0,
            inverter_efficiency: 1.0,
            battery_efficiency: 1.0,
            start_charge: 0.0,
            timestep_duration_h: 0.5,
        }
    }

    #[test]
    fn test_projection_of_solved_values() {
        let series = TimeSeries::from_columns(&[10.0, -2.0], &[5.0, 1.0]);
        let p = params();
        let built = ModelBuilder::new(&series, &p).unwrap().build();

        let mut values = HashMap::new();
        for (step, (solar, export, import)) in built.steps.iter().zip([(5.0, 5.0, 0.0), (0.0, 0.0, 0.0)]) {
            values.insert(step.solar.unwrap(), solar);
            values.insert(step.grid_export.unwrap(), export);
            values.insert(step.grid_import.unwrap(), import);
        }

        let result = extract(&series, &built, &SolverOutput::optimal(values)).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0].grid_export, 5.0);
        assert_eq!(result.rows[0].objective, 5.0 * 10.0 * 0.5);
        assert_eq!(result.rows[0].input.price, 10.0);
        // Collapsed battery roles read as zero
        assert_eq!(result.rows[1].soc, 0.0);
        assert_eq!(result.rows[1].charge, 0.0);
        assert_eq!(result.total_revenue(), 25.0);
        assert_eq!(result.grid_export(), vec![5.0, 0.0]);
        assert_eq!(result.grid_import(), vec![0.0, 0.0]);
        assert_eq!(result.soc(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let series = TimeSeries::from_columns(&[10.0], &[5.0]);
        let p = params();
        let built = ModelBuilder::new(&series, &p).unwrap().build();

        let mut values = HashMap::new();
        values.insert(built.steps[0].solar.unwrap(), 5.0);
        values.insert(built.steps[0].grid_export.unwrap(), 5.0);

        let err = extract(&series, &built, &SolverOutput::optimal(values)).unwrap_err();
        assert_eq!(
            err,
            ArbitrageError::MissingVariableValue {
                variable: "grid_import_0".to_string()
            }
        );
    }

    #[test]
    fn test_series_length_must_match_model() {
        let series = TimeSeries::from_columns(&[10.0, 20.0], &[5.0, 5.0]);
        let p = params();
        let built = ModelBuilder::new(&series, &p).unwrap().build();
        let values = built.model.variable_ids().map(|id| (id, 0.0)).collect();
        let output = SolverOutput::optimal(values);

        let longer = TimeSeries::from_columns(&[10.0, 20.0, 30.0], &[5.0, 5.0, 5.0]);
        assert!(matches!(
            extract(&longer, &built, &output),
            Err(ArbitrageError::InvalidSeries { row: 2, .. })
        ));
        assert!(matches!(
            extract(&series.head(1), &built, &output),
            Err(ArbitrageError::InvalidSeries { row: 1, .. })
        ));
        assert_eq!(extract(&series, &built, &output).unwrap().len(), 2);
    }

    #[test]
    fn test_statuses_map_to_errors() {
        let series = TimeSeries::from_columns(&[10.0], &[5.0]);
        let p = params();
        let built = ModelBuilder::new(&series, &p).unwrap().build();

        let cases = [
            (SolveStatus::Infeasible, ArbitrageError::Infeasible),
            (SolveStatus::Unbounded, ArbitrageError::Unbounded),
            (
                SolveStatus::NotSolved,
                ArbitrageError::NotSolved("iteration limit".to_string()),
            ),
        ];
        for (status, expected) in cases {
            let output = SolverOutput::failed(status, Some("iteration limit".to_string()));
            assert_eq!(extract(&series, &built, &output).unwrap_err(), expected);
        }
    }
}

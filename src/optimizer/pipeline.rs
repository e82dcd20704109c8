use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::builder::ModelBuilder;
use super::extract::extract;
use super::solver::{SolverAdapter, SolverOutput};
use crate::domain::{Dispatch, ModelParameters, TimeSeries};
use crate::error::Result;

/// Build, solve and read back one arbitrage LP.
///
/// Each call is fully independent. Inputs are validated before anything is
/// built, and solver failures come back as errors without retry.
pub fn solve(series: &TimeSeries, params: &ModelParameters, solver: &dyn SolverAdapter) -> Result<Dispatch> {
    let started = Instant::now();

    let built = ModelBuilder::new(series, params)?.build();

    let output = if built.model.num_variables() == 0 {
        // Every capacity is zero: the only feasible schedule is idle
        debug!("LP has no variables, skipping solver");
        SolverOutput::optimal(HashMap::new())
    } else if solver.supports_variable_bounds() {
        solver.solve(&built.model)
    } else {
        debug!(solver = solver.name(), "submitting variable bounds as rows");
        solver.solve(&built.model.with_bounds_as_rows())
    };

    let result = extract(series, &built, &output)?;
    let total_revenue = result.total_revenue();
    let elapsed = started.elapsed();

    info!(
        solver = solver.name(),
        n_steps = result.len(),
        total_revenue,
        elapsed_ms = elapsed.as_millis() as u64,
        "arbitrage LP solved"
    );

    Ok(Dispatch {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        series: result,
        total_revenue,
        elapsed,
    })
}

/// Owns a solver adapter and runs independent solves against it
#[derive(Clone)]
pub struct ArbitrageOptimizer {
    solver: Arc<dyn SolverAdapter>,
}

impl std::fmt::Debug for ArbitrageOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArbitrageOptimizer")
            .field("solver", &self.solver.name())
            .finish()
    }
}

impl Default for ArbitrageOptimizer {
    fn default() -> Self {
        Self::new(Arc::new(super::solver::GoodLpSolver))
    }
}

impl ArbitrageOptimizer {
    pub fn new(solver: Arc<dyn SolverAdapter>) -> Self {
        Self { solver }
    }

    pub fn solver_name(&self) -> &'static str {
        self.solver.name()
    }

    pub fn solve(&self, series: &TimeSeries, params: &ModelParameters) -> Result<Dispatch> {
        solve(series, params, self.solver.as_ref())
    }
}

//! Caller-side helpers around the optimizer: deadlines, baseline comparison
//! and concurrent sweeps over independent parameter sets.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::{Dispatch, ModelParameters, TimeSeries};
use crate::error::ArbitrageError;
use crate::optimizer::ArbitrageOptimizer;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Optimization(#[from] ArbitrageError),

    #[error("Solve did not finish within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Solve task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Run one solve on the blocking pool, optionally under a deadline.
///
/// The solver cannot be interrupted: on timeout the blocking task is left to
/// finish in the background and its result is discarded.
pub async fn solve_with_deadline(
    optimizer: ArbitrageOptimizer,
    series: Arc<TimeSeries>,
    params: ModelParameters,
    deadline: Option<Duration>,
) -> Result<Dispatch, ScenarioError> {
    let task = tokio::task::spawn_blocking(move || optimizer.solve(&series, &params));

    let joined = match deadline {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| ScenarioError::DeadlineExceeded(limit))?,
        None => task.await,
    };

    Ok(joined??)
}

/// Optimal revenue against the same site without storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineComparison {
    pub baseline_revenue: f64,
    pub optimal_revenue: f64,
    /// Relative uplift in percent, `None` when the baseline earns nothing
    pub uplift_pct: Option<f64>,
}

impl BaselineComparison {
    pub fn new(baseline_revenue: f64, optimal_revenue: f64) -> Self {
        let uplift_pct = (baseline_revenue.abs() > f64::EPSILON)
            .then(|| 100.0 * (optimal_revenue / baseline_revenue - 1.0));
        Self {
            baseline_revenue,
            optimal_revenue,
            uplift_pct,
        }
    }
}

/// Solve the storage-free baseline under `deadline` and compare it with
/// `optimal`
pub async fn compare_to_baseline(
    optimizer: ArbitrageOptimizer,
    series: Arc<TimeSeries>,
    params: &ModelParameters,
    optimal: &Dispatch,
    deadline: Option<Duration>,
) -> Result<BaselineComparison, ScenarioError> {
    let baseline = solve_with_deadline(optimizer, series, params.without_storage(), deadline).await?;
    Ok(BaselineComparison::new(baseline.total_revenue, optimal.total_revenue))
}

/// One named parameter set in a sweep
#[derive(Debug, Clone)]
pub struct Scenario {
    pub label: String,
    pub params: ModelParameters,
}

impl Scenario {
    pub fn new(label: impl Into<String>, params: ModelParameters) -> Self {
        Self {
            label: label.into(),
            params,
        }
    }
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub label: String,
    pub params: ModelParameters,
    pub result: Result<Dispatch, ScenarioError>,
}

/// Solve every scenario concurrently against the same series.
///
/// Each solve is an independent optimizer call. Every scenario yields exactly
/// one outcome, in input order; a failing or panicking solve does not affect
/// the others.
pub async fn sweep(
    optimizer: &ArbitrageOptimizer,
    series: Arc<TimeSeries>,
    scenarios: Vec<Scenario>,
    deadline: Option<Duration>,
) -> Vec<ScenarioOutcome> {
    let total = scenarios.len();

    let handles: Vec<_> = scenarios
        .into_iter()
        .map(|scenario| {
            let task = tokio::spawn(solve_with_deadline(
                optimizer.clone(),
                Arc::clone(&series),
                scenario.params,
                deadline,
            ));
            (scenario, task)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(total);
    for (scenario, task) in handles {
        let result = match task.await {
            Ok(result) => result,
            Err(e) => {
                error!(label = %scenario.label, error = %e, "scenario task aborted");
                Err(ScenarioError::Task(e))
            }
        };
        outcomes.push(ScenarioOutcome {
            label: scenario.label,
            params: scenario.params,
            result,
        });
    }

    let solved = outcomes.iter().filter(|o| o.result.is_ok()).count();
    info!(total, solved, "scenario sweep finished");

    outcomes
}

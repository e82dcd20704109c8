use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use storage_arbitrage::{config, io, optimizer, scenario, telemetry};
use config::Config;
use optimizer::ArbitrageOptimizer;
use scenario::BaselineComparison;
use storage_arbitrage::domain::{ModelParameters, ResultRow};
use telemetry::init_tracing;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct Report<'a> {
    solver: &'static str,
    parameters: &'a ModelParameters,
    n_steps: usize,
    total_revenue: f64,
    solve_seconds: f64,
    baseline: BaselineComparison,
    rows: &'a [ResultRow],
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;
    let params = cfg.model_parameters()?;

    let mut series = io::load_csv(&cfg.input.path, cfg.input.profile)?;
    if let Some(steps) = cfg.input.horizon_steps {
        if steps > series.len() {
            warn!(
                requested = steps,
                available = series.len(),
                "horizon longer than input, using full series"
            );
        }
        series = series.head(steps);
    }
    info!(
        path = %cfg.input.path.display(),
        n_steps = series.len(),
        profile = %series.profile(),
        "loaded time series"
    );

    let optimizer = ArbitrageOptimizer::default();
    let series = Arc::new(series);
    let deadline = cfg.deadline();

    let dispatch = scenario::solve_with_deadline(optimizer.clone(), Arc::clone(&series), params, deadline)
        .await
        .context("optimal schedule")?;
    let comparison = scenario::compare_to_baseline(
        optimizer.clone(),
        Arc::clone(&series),
        &params,
        &dispatch,
        deadline,
    )
    .await
    .context("baseline schedule")?;
    info!(
        total_revenue = dispatch.total_revenue,
        baseline_revenue = comparison.baseline_revenue,
        uplift_pct = ?comparison.uplift_pct,
        "optimization complete"
    );

    let report = Report {
        solver: optimizer.solver_name(),
        parameters: &params,
        n_steps: dispatch.series.len(),
        total_revenue: dispatch.total_revenue,
        solve_seconds: dispatch.elapsed.as_secs_f64(),
        baseline: comparison,
        rows: &dispatch.series.rows,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

//! Boundary to the LP solver.
//!
//! The optimizer only needs: submit an [`LpModel`], get back a status and,
//! when optimal, one value per declared variable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::model::{LpModel, VarId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    NotSolved,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::Infeasible => write!(f, "infeasible"),
            SolveStatus::Unbounded => write!(f, "unbounded"),
            SolveStatus::NotSolved => write!(f, "not_solved"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutput {
    pub status: SolveStatus,
    /// Variable values, only meaningful when `status` is `Optimal`
    pub values: HashMap<VarId, f64>,
    /// Solver diagnostic for non-optimal outcomes
    pub message: Option<String>,
}

impl SolverOutput {
    pub fn optimal(values: HashMap<VarId, f64>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
            message: None,
        }
    }

    pub fn failed(status: SolveStatus, message: Option<String>) -> Self {
        Self {
            status,
            values: HashMap::new(),
            message,
        }
    }
}

/// An LP solver the optimizer can hand a model to.
///
/// Implementations must not assume anything about how the model was built.
/// The call blocks until the solver returns.
#[cfg_attr(test, mockall::automock)]
pub trait SolverAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether variable bounds can be passed natively. When false the
    /// optimizer submits bounds as explicit rows instead.
    fn supports_variable_bounds(&self) -> bool;

    fn solve(&self, model: &LpModel) -> SolverOutput;
}

/// `good_lp` adapter using its default pure-Rust simplex backend
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

#[cfg(feature = "optimization")]
impl SolverAdapter for GoodLpSolver {
    fn name(&self) -> &'static str {
        "good_lp"
    }

    fn supports_variable_bounds(&self) -> bool {
        true
    }

    fn solve(&self, model: &LpModel) -> SolverOutput {
        use good_lp::{constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel};

        use super::model::{Direction, LinearExpr, Relation};

        let mut problem = ProblemVariables::new();
        let vars: Vec<good_lp::Variable> = model
            .variables()
            .iter()
            .map(|def| {
                let mut definition = variable().name(def.name.clone());
                if def.lower.is_finite() {
                    definition = definition.min(def.lower);
                }
                if def.upper.is_finite() {
                    definition = definition.max(def.upper);
                }
                problem.add(definition)
            })
            .collect();

        let to_expression = |expr: &LinearExpr| {
            let mut expression = Expression::with_capacity(expr.terms().len());
            for &(var, coefficient) in expr.terms() {
                expression.add_mul(coefficient, vars[var.index()]);
            }
            expression
        };

        let objective = to_expression(model.objective());
        let unsolved = match model.direction() {
            Direction::Maximize => problem.maximise(objective),
            Direction::Minimize => problem.minimise(objective),
        };

        let mut lp = unsolved.using(default_solver);
        for row in model.constraints() {
            let lhs = to_expression(&row.expr);
            lp = lp.with(match row.relation {
                Relation::Eq => constraint::eq(lhs, row.rhs),
                Relation::Leq => constraint::leq(lhs, row.rhs),
                Relation::Geq => constraint::geq(lhs, row.rhs),
            });
        }

        match lp.solve() {
            Ok(solution) => {
                let values = model
                    .variable_ids()
                    .zip(&vars)
                    .map(|(id, var)| (id, solution.value(*var)))
                    .collect();
                SolverOutput::optimal(values)
            }
            Err(ResolutionError::Infeasible) => SolverOutput::failed(SolveStatus::Infeasible, None),
            Err(ResolutionError::Unbounded) => SolverOutput::failed(SolveStatus::Unbounded, None),
            Err(other) => SolverOutput::failed(SolveStatus::NotSolved, Some(other.to_string())),
        }
    }
}

#[cfg(not(feature = "optimization"))]
impl SolverAdapter for GoodLpSolver {
    fn name(&self) -> &'static str {
        "good_lp/disabled"
    }

    fn supports_variable_bounds(&self) -> bool {
        true
    }

    fn solve(&self, _model: &LpModel) -> SolverOutput {
        SolverOutput::failed(
            SolveStatus::NotSolved,
            Some("LP solving requires the 'optimization' feature to be enabled".to_string()),
        )
    }
}

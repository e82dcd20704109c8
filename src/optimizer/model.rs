//! Solver-independent LP model.
//!
//! This is the whole contract handed to a solver adapter: bounded variables,
//! linear rows, a linear objective and an optimization direction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Handle to a variable declared in an [`LpModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(usize);

impl VarId {
    /// Position of the variable in declaration order
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDef {
    pub name: String,
    /// Lower bound, `f64::NEG_INFINITY` when free
    pub lower: f64,
    /// Upper bound, `f64::INFINITY` when free
    pub upper: f64,
}

/// Sum of `coefficient * variable` terms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `coefficient * var`. Zero coefficients are skipped.
    pub fn add(&mut self, var: VarId, coefficient: f64) -> &mut Self {
        if coefficient != 0.0 {
            self.terms.push((var, coefficient));
        }
        self
    }

    /// Add `coefficient * var` when the variable exists
    pub fn add_opt(&mut self, var: Option<VarId>, coefficient: f64) -> &mut Self {
        if let Some(var) = var {
            self.add(var, coefficient);
        }
        self
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate against a solved assignment. Returns the first variable with
    /// no value as the error.
    pub fn evaluate(&self, values: &HashMap<VarId, f64>) -> Result<f64, VarId> {
        self.terms.iter().try_fold(0.0, |acc, &(var, coefficient)| {
            values
                .get(&var)
                .map(|value| acc + coefficient * value)
                .ok_or(var)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    Eq,
    Leq,
    Geq,
}

/// A linear row: `expr <relation> rhs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    pub fn eq(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self::new(name, expr, Relation::Eq, rhs)
    }

    pub fn leq(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self::new(name, expr, Relation::Leq, rhs)
    }

    pub fn geq(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self::new(name, expr, Relation::Geq, rhs)
    }

    fn new(name: impl Into<String>, expr: LinearExpr, relation: Relation, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            relation,
            rhs,
        }
    }

    /// True when the row holds for `lhs` within `tolerance`
    pub fn is_satisfied_by(&self, lhs: f64, tolerance: f64) -> bool {
        match self.relation {
            Relation::Eq => (lhs - self.rhs).abs() <= tolerance,
            Relation::Leq => lhs <= self.rhs + tolerance,
            Relation::Geq => lhs >= self.rhs - tolerance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Maximize,
    Minimize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpModel {
    variables: Vec<VariableDef>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
    direction: Direction,
}

impl LpModel {
    pub fn new(direction: Direction) -> Self {
        Self {
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: LinearExpr::new(),
            direction,
        }
    }

    pub fn add_variable(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(VariableDef {
            name: name.into(),
            lower,
            upper,
        });
        id
    }

    /// Add a row. A row with no terms is dropped when it holds trivially
    /// (`0 = 0`); returns whether the row was kept.
    pub fn add_constraint(&mut self, constraint: Constraint) -> bool {
        if constraint.expr.is_empty() && constraint.is_satisfied_by(0.0, 0.0) {
            return false;
        }
        self.constraints.push(constraint);
        true
    }

    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> &VariableDef {
        &self.variables[id.0]
    }

    /// Ids of all declared variables, in declaration order
    pub fn variable_ids(&self) -> impl Iterator<Item = VarId> + '_ {
        (0..self.variables.len()).map(VarId)
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Equivalent model for solvers without native variable bounds.
    ///
    /// Every finite bound becomes an explicit row and the variables are
    /// declared free. Variable ids are unchanged.
    pub fn with_bounds_as_rows(&self) -> Self {
        let mut model = Self {
            variables: self
                .variables
                .iter()
                .map(|def| VariableDef {
                    name: def.name.clone(),
                    lower: f64::NEG_INFINITY,
                    upper: f64::INFINITY,
                })
                .collect(),
            constraints: self.constraints.clone(),
            objective: self.objective.clone(),
            direction: self.direction,
        };

        for (id, def) in self.variable_ids().zip(&self.variables) {
            let mut expr = LinearExpr::new();
            expr.add(id, 1.0);
            if def.lower.is_finite() {
                model.add_constraint(Constraint::geq(format!("{}_lb", def.name), expr.clone(), def.lower));
            }
            if def.upper.is_finite() {
                model.add_constraint(Constraint::leq(format!("{}_ub", def.name), expr, def.upper));
            }
        }

        model
    }
}

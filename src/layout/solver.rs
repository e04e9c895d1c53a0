//! Constraint solver integration for column placement
//!
//! Wraps the kasuari Cassowary solver. Each column contributes one variable,
//! its left edge; spacing rules become required inequalities and a weak
//! preference pulls every column as far left as the inequalities allow.

use kasuari::{
    Solver as KasuariSolver, Strength, Variable as KasuariVariable, WeightedRelation::*,
};
use thiserror::Error;

/// A constraint on column left edges
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    /// `column.left >= value`
    AtLeast { column: usize, value: f64 },

    /// `later.left >= earlier.left + distance`
    After {
        earlier: usize,
        later: usize,
        distance: f64,
    },

    /// Weak preference for `column.left = value`
    Prefer { column: usize, value: f64 },
}

impl ColumnConstraint {
    fn describe(&self) -> String {
        match self {
            ColumnConstraint::AtLeast { column, value } => {
                format!("column {} left >= {}", column, value)
            }
            ColumnConstraint::After {
                earlier,
                later,
                distance,
            } => format!(
                "column {} left >= column {} left + {}",
                later, earlier, distance
            ),
            ColumnConstraint::Prefer { column, value } => {
                format!("column {} left ~ {}", column, value)
            }
        }
    }
}

/// Errors from the constraint solver
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Unsatisfiable constraints: {reason}")]
    Unsatisfiable { reason: String },

    #[error("Unknown column {column} (solver has {count})")]
    UnknownColumn { column: usize, count: usize },

    #[error("Internal solver error: {0}")]
    Internal(String),
}

/// Wrapper around kasuari solver with one variable per column
pub struct ColumnSolver {
    solver: KasuariSolver,
    lefts: Vec<KasuariVariable>,
    constraints: usize,
}

impl ColumnSolver {
    pub fn new(columns: usize) -> Self {
        Self {
            solver: KasuariSolver::new(),
            lefts: (0..columns).map(|_| KasuariVariable::new()).collect(),
            constraints: 0,
        }
    }

    fn var(&self, column: usize) -> Result<KasuariVariable, SolverError> {
        self.lefts
            .get(column)
            .copied()
            .ok_or(SolverError::UnknownColumn {
                column,
                count: self.lefts.len(),
            })
    }

    /// Convert a kasuari error to a SolverError with context
    fn convert_kasuari_error(e: kasuari::AddConstraintError, desc: &str) -> SolverError {
        match e {
            kasuari::AddConstraintError::UnsatisfiableConstraint => SolverError::Unsatisfiable {
                reason: format!("Cannot satisfy {}", desc),
            },
            kasuari::AddConstraintError::DuplicateConstraint => {
                SolverError::Internal(format!("Duplicate constraint: {}", desc))
            }
            kasuari::AddConstraintError::InternalSolverError(msg) => {
                SolverError::Internal(format!("Internal solver error for {}: {}", desc, msg))
            }
        }
    }

    /// Add a constraint to the solver
    pub fn add_constraint(&mut self, constraint: ColumnConstraint) -> Result<(), SolverError> {
        let desc = constraint.describe();
        let result = match constraint {
            ColumnConstraint::AtLeast { column, value } => {
                let left = self.var(column)?;
                self.solver
                    .add_constraint(left | GE(Strength::REQUIRED) | value)
            }
            ColumnConstraint::After {
                earlier,
                later,
                distance,
            } => {
                let a = self.var(earlier)?;
                let b = self.var(later)?;
                self.solver
                    .add_constraint(b | GE(Strength::REQUIRED) | a + distance)
            }
            ColumnConstraint::Prefer { column, value } => {
                let left = self.var(column)?;
                self.solver.add_constraint(left | EQ(Strength::WEAK) | value)
            }
        };
        result.map_err(|e| Self::convert_kasuari_error(e, &desc))?;
        self.constraints += 1;
        Ok(())
    }

    /// Solve the system, returning the left edge of every column
    pub fn solve(&mut self) -> Vec<f64> {
        // unreported variables kept their initial value of zero
        let mut values = vec![0.0; self.lefts.len()];
        for (kvar, value) in self.solver.fetch_changes() {
            if let Some(i) = self.lefts.iter().position(|k| k == kvar) {
                values[i] = *value;
            }
        }
        values
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints
    }
}

/// Pack columns of the given widths left to right from `start`, `gap` apart
pub fn pack_columns(widths: &[f64], start: f64, gap: f64) -> Result<Vec<f64>, SolverError> {
    let mut solver = ColumnSolver::new(widths.len());
    for (i, width) in widths.iter().enumerate() {
        solver.add_constraint(ColumnConstraint::AtLeast {
            column: i,
            value: start,
        })?;
        solver.add_constraint(ColumnConstraint::Prefer {
            column: i,
            value: start,
        })?;
        if i + 1 < widths.len() {
            solver.add_constraint(ColumnConstraint::After {
                earlier: i,
                later: i + 1,
                distance: width + gap,
            })?;
        }
    }
    // snap simplex noise so integral inputs give integral edges
    Ok(solver
        .solve()
        .into_iter()
        .map(|v| (v * 1e6).round() / 1e6)
        .collect())
}

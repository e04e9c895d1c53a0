//! Error types for the layout engine

use thiserror::Error;

use super::solver::SolverError;

/// Errors that can occur during layout computation
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Circuit without any qubit has nothing to draw
    #[error("circuit '{0}' has no qubits to draw")]
    NoWires(String),

    #[error("circuit '{name}' has {count} qubits, more than the {max} that can be drawn")]
    TooManyWires {
        name: String,
        count: usize,
        max: usize,
    },

    /// Constraint solver error
    #[error("constraint solver error: {0}")]
    SolverError(#[from] SolverError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_wires_display() {
        let err = LayoutError::NoWires("empty".to_string());
        assert!(err.to_string().contains("'empty'"));
    }

    #[test]
    fn test_too_many_wires_display() {
        let err = LayoutError::TooManyWires {
            name: "wide".to_string(),
            count: 5000,
            max: 4096,
        };
        assert_eq!(
            err.to_string(),
            "circuit 'wide' has 5000 qubits, more than the 4096 that can be drawn"
        );
    }

    #[test]
    fn test_solver_error_wraps() {
        let err: LayoutError = SolverError::Internal("boom".to_string()).into();
        assert!(err.to_string().contains("boom"));
    }
}

//! Error types for circuit construction

use thiserror::Error;

/// Errors raised when an operation cannot be appended to a circuit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    /// Qubit index outside the circuit's qubit range
    #[error("qubit {qubit} out of range for '{operation}' (circuit has {num_qubits} qubits)")]
    QubitOutOfRange {
        qubit: usize,
        num_qubits: usize,
        operation: String,
    },

    /// Classical bit index outside the circuit's classical range
    #[error("clbit {clbit} out of range for '{operation}' (circuit has {num_clbits} clbits)")]
    ClbitOutOfRange {
        clbit: usize,
        num_clbits: usize,
        operation: String,
    },

    /// The same qubit named twice in one operation
    #[error("qubit {qubit} used more than once in '{operation}'")]
    DuplicateQubit { qubit: usize, operation: String },

    /// Barrier with no qubits
    #[error("barrier must cover at least one qubit")]
    EmptyBarrier,

    /// Measure-all whose qubit and clbit lists differ in length
    #[error("'{operation}' pairs {qubits} qubits with {clbits} clbits")]
    MeasureMismatch {
        qubits: usize,
        clbits: usize,
        operation: String,
    },

    /// Classical register with an existing name
    #[error("classical register '{0}' already exists")]
    DuplicateRegister(String),
}

impl CircuitError {
    pub fn qubit_out_of_range(qubit: usize, num_qubits: usize, operation: &str) -> Self {
        Self::QubitOutOfRange {
            qubit,
            num_qubits,
            operation: operation.to_string(),
        }
    }

    pub fn clbit_out_of_range(clbit: usize, num_clbits: usize, operation: &str) -> Self {
        Self::ClbitOutOfRange {
            clbit,
            num_clbits,
            operation: operation.to_string(),
        }
    }

    pub fn duplicate_qubit(qubit: usize, operation: &str) -> Self {
        Self::DuplicateQubit {
            qubit,
            operation: operation.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = CircuitError::qubit_out_of_range(9, 8, "cx");
        let msg = err.to_string();
        assert!(msg.contains("qubit 9"));
        assert!(msg.contains("8 qubits"));
        assert!(msg.contains("'cx'"));
    }

    #[test]
    fn test_measure_mismatch_display() {
        let err = CircuitError::MeasureMismatch {
            qubits: 3,
            clbits: 2,
            operation: "measure_all".to_string(),
        };
        assert_eq!(err.to_string(), "'measure_all' pairs 3 qubits with 2 clbits");
    }

    #[test]
    fn test_duplicate_display() {
        let err = CircuitError::duplicate_qubit(2, "swap");
        assert!(err.to_string().contains("more than once"));
    }
}

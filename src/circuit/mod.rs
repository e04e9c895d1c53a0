//! Circuit description: an ordered list of operations over indexed qubits
//!
//! Circuits are built by appending operations through the fluent builder
//! methods. Every append validates qubit and clbit indices first, so a
//! circuit never holds an operation that names a wire it does not have.
//!
//! # Example
//!
//! ```rust
//! use qdraw::circuit::Circuit;
//!
//! let mut circuit = Circuit::new("bell", 2);
//! circuit.h(0)?.cx(0, 1)?.measure_all()?;
//! assert_eq!(circuit.operations().len(), 3);
//! assert_eq!(circuit.num_clbits(), 2);
//! # Ok::<(), qdraw::circuit::CircuitError>(())
//! ```

mod error;
mod gate;

use std::collections::BTreeMap;

pub use error::CircuitError;
pub use gate::{format_angle, ControlledGate, GateFamily, SingleGate};

/// Qubit count of the fixed GHZ-chain circuit
pub const GHZ_QUBITS: usize = 8;

/// Number of CNOT links in the fixed GHZ-chain circuit
pub const GHZ_LINKS: usize = 7;

/// Largest register size accepted from QASM input and drawn by the layout
pub const MAX_QUBITS: usize = 4096;

/// One step of a circuit
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Single {
        gate: SingleGate,
        qubit: usize,
    },
    Controlled {
        gate: ControlledGate,
        control: usize,
        target: usize,
    },
    Swap {
        a: usize,
        b: usize,
    },
    Barrier {
        qubits: Vec<usize>,
    },
    Measure {
        qubit: usize,
        clbit: usize,
    },
    /// Measurement of every qubit into a dedicated register, `qubits[i] -> clbits[i]`
    MeasureAll {
        qubits: Vec<usize>,
        clbits: Vec<usize>,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Single { gate, .. } => gate.name(),
            Operation::Controlled { gate, .. } => gate.name(),
            Operation::Swap { .. } => "swap",
            Operation::Barrier { .. } => "barrier",
            Operation::Measure { .. } => "measure",
            Operation::MeasureAll { .. } => "measure_all",
        }
    }

    /// Qubits touched, in operand order
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Operation::Single { qubit, .. } | Operation::Measure { qubit, .. } => vec![*qubit],
            Operation::Controlled {
                control, target, ..
            } => vec![*control, *target],
            Operation::Swap { a, b } => vec![*a, *b],
            Operation::Barrier { qubits } | Operation::MeasureAll { qubits, .. } => qubits.clone(),
        }
    }

    pub fn clbits(&self) -> Vec<usize> {
        match self {
            Operation::Measure { clbit, .. } => vec![*clbit],
            Operation::MeasureAll { clbits, .. } => clbits.clone(),
            _ => vec![],
        }
    }

    pub fn is_measurement(&self) -> bool {
        matches!(self, Operation::Measure { .. } | Operation::MeasureAll { .. })
    }
}

/// A named, contiguous range of classical bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicalRegister {
    pub name: String,
    pub start: usize,
    pub size: usize,
}

impl ClassicalRegister {
    pub fn contains(&self, clbit: usize) -> bool {
        clbit >= self.start && clbit < self.start + self.size
    }
}

/// A quantum circuit over a fixed number of qubits
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    name: String,
    num_qubits: usize,
    registers: Vec<ClassicalRegister>,
    operations: Vec<Operation>,
}

impl Circuit {
    /// Create an empty circuit with `num_qubits` qubits and no classical bits
    pub fn new(name: impl Into<String>, num_qubits: usize) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            registers: vec![],
            operations: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.registers.iter().map(|r| r.size).sum()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn registers(&self) -> &[ClassicalRegister] {
        &self.registers
    }

    /// Register holding a global clbit index
    pub fn register_of(&self, clbit: usize) -> Option<&ClassicalRegister> {
        self.registers.iter().find(|r| r.contains(clbit))
    }

    /// Append a classical register and return the global index of its first bit
    pub fn add_creg(&mut self, name: impl Into<String>, size: usize) -> Result<usize, CircuitError> {
        let name = name.into();
        if self.registers.iter().any(|r| r.name == name) {
            return Err(CircuitError::DuplicateRegister(name));
        }
        let start = self.num_clbits();
        self.registers.push(ClassicalRegister { name, start, size });
        Ok(start)
    }

    /// Operation counts keyed by name
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for op in &self.operations {
            *counts.entry(op.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Length of the longest dependency chain, ignoring barriers
    pub fn depth(&self) -> usize {
        let mut qubit_level = vec![0usize; self.num_qubits];
        let mut clbit_level = vec![0usize; self.num_clbits()];

        for op in &self.operations {
            match op {
                Operation::Barrier { .. } => {}
                Operation::MeasureAll { qubits, clbits } => {
                    for (&q, &c) in qubits.iter().zip(clbits) {
                        let level = qubit_level[q].max(clbit_level[c]) + 1;
                        qubit_level[q] = level;
                        clbit_level[c] = level;
                    }
                }
                _ => {
                    let qubits = op.qubits();
                    let clbits = op.clbits();
                    let level = qubits
                        .iter()
                        .map(|&q| qubit_level[q])
                        .chain(clbits.iter().map(|&c| clbit_level[c]))
                        .max()
                        .unwrap_or(0)
                        + 1;
                    for q in qubits {
                        qubit_level[q] = level;
                    }
                    for c in clbits {
                        clbit_level[c] = level;
                    }
                }
            }
        }

        qubit_level
            .into_iter()
            .chain(clbit_level)
            .max()
            .unwrap_or(0)
    }

    fn check_qubit(&self, qubit: usize, operation: &str) -> Result<(), CircuitError> {
        if qubit >= self.num_qubits {
            return Err(CircuitError::qubit_out_of_range(
                qubit,
                self.num_qubits,
                operation,
            ));
        }
        Ok(())
    }

    fn check_clbit(&self, clbit: usize, operation: &str) -> Result<(), CircuitError> {
        let num_clbits = self.num_clbits();
        if clbit >= num_clbits {
            return Err(CircuitError::clbit_out_of_range(clbit, num_clbits, operation));
        }
        Ok(())
    }

    fn check_pair(&self, a: usize, b: usize, operation: &str) -> Result<(), CircuitError> {
        self.check_qubit(a, operation)?;
        self.check_qubit(b, operation)?;
        if a == b {
            return Err(CircuitError::duplicate_qubit(a, operation));
        }
        Ok(())
    }

    /// Every qubit in range and named once
    fn check_distinct(&self, qubits: &[usize], operation: &str) -> Result<(), CircuitError> {
        for (i, &q) in qubits.iter().enumerate() {
            self.check_qubit(q, operation)?;
            if qubits[..i].contains(&q) {
                return Err(CircuitError::duplicate_qubit(q, operation));
            }
        }
        Ok(())
    }

    /// Append an already-built operation after validating its operands
    pub fn append(&mut self, op: Operation) -> Result<&mut Self, CircuitError> {
        let name = op.name();
        match &op {
            Operation::Single { qubit, .. } => self.check_qubit(*qubit, name)?,
            Operation::Controlled {
                control, target, ..
            } => self.check_pair(*control, *target, name)?,
            Operation::Swap { a, b } => self.check_pair(*a, *b, name)?,
            Operation::Barrier { qubits } => {
                if qubits.is_empty() {
                    return Err(CircuitError::EmptyBarrier);
                }
                self.check_distinct(qubits, name)?;
            }
            Operation::Measure { qubit, clbit } => {
                self.check_qubit(*qubit, name)?;
                self.check_clbit(*clbit, name)?;
            }
            Operation::MeasureAll { qubits, clbits } => {
                if qubits.len() != clbits.len() {
                    return Err(CircuitError::MeasureMismatch {
                        qubits: qubits.len(),
                        clbits: clbits.len(),
                        operation: name.to_string(),
                    });
                }
                self.check_distinct(qubits, name)?;
                for &c in clbits {
                    self.check_clbit(c, name)?;
                }
            }
        }
        self.operations.push(op);
        Ok(self)
    }

    pub fn single(&mut self, gate: SingleGate, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.append(Operation::Single { gate, qubit })
    }

    pub fn controlled(
        &mut self,
        gate: ControlledGate,
        control: usize,
        target: usize,
    ) -> Result<&mut Self, CircuitError> {
        self.append(Operation::Controlled {
            gate,
            control,
            target,
        })
    }

    /// Apply a Hadamard gate
    pub fn h(&mut self, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::H, qubit)
    }

    pub fn x(&mut self, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::X, qubit)
    }

    pub fn y(&mut self, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::Y, qubit)
    }

    pub fn z(&mut self, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::Z, qubit)
    }

    pub fn s(&mut self, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::S, qubit)
    }

    pub fn sdg(&mut self, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::Sdg, qubit)
    }

    pub fn t(&mut self, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::T, qubit)
    }

    pub fn tdg(&mut self, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::Tdg, qubit)
    }

    pub fn sx(&mut self, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::SX, qubit)
    }

    pub fn rx(&mut self, theta: f64, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::Rx(theta), qubit)
    }

    pub fn ry(&mut self, theta: f64, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::Ry(theta), qubit)
    }

    pub fn rz(&mut self, theta: f64, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::Rz(theta), qubit)
    }

    pub fn p(&mut self, theta: f64, qubit: usize) -> Result<&mut Self, CircuitError> {
        self.single(SingleGate::P(theta), qubit)
    }

    /// Apply a CNOT with the given control and target
    pub fn cx(&mut self, control: usize, target: usize) -> Result<&mut Self, CircuitError> {
        self.controlled(ControlledGate::CX, control, target)
    }

    pub fn cy(&mut self, control: usize, target: usize) -> Result<&mut Self, CircuitError> {
        self.controlled(ControlledGate::CY, control, target)
    }

    pub fn cz(&mut self, control: usize, target: usize) -> Result<&mut Self, CircuitError> {
        self.controlled(ControlledGate::CZ, control, target)
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<&mut Self, CircuitError> {
        self.append(Operation::Swap { a, b })
    }

    pub fn barrier(&mut self, qubits: &[usize]) -> Result<&mut Self, CircuitError> {
        self.append(Operation::Barrier {
            qubits: qubits.to_vec(),
        })
    }

    pub fn barrier_all(&mut self) -> Result<&mut Self, CircuitError> {
        let qubits: Vec<usize> = (0..self.num_qubits).collect();
        self.barrier(&qubits)
    }

    pub fn measure(&mut self, qubit: usize, clbit: usize) -> Result<&mut Self, CircuitError> {
        self.append(Operation::Measure { qubit, clbit })
    }

    /// Measure every qubit into a fresh `meas` register, as one operation
    pub fn measure_all(&mut self) -> Result<&mut Self, CircuitError> {
        let mut name = "meas".to_string();
        let mut suffix = 0;
        while self.registers.iter().any(|r| r.name == name) {
            suffix += 1;
            name = format!("meas{}", suffix);
        }

        let start = self.add_creg(name, self.num_qubits)?;
        let qubits: Vec<usize> = (0..self.num_qubits).collect();
        let clbits: Vec<usize> = (start..start + self.num_qubits).collect();
        self.append(Operation::MeasureAll { qubits, clbits })
    }
}

/// Build the GHZ-chain circuit: H on qubit 0, `cx(i, i + 1)` for each link, then measure-all
pub fn ghz_chain(num_qubits: usize, links: usize) -> Result<Circuit, CircuitError> {
    let mut circuit = Circuit::new("ghz", num_qubits);
    circuit.h(0)?;
    for i in 0..links {
        circuit.cx(i, i + 1)?;
    }
    circuit.measure_all()?;
    Ok(circuit)
}

/// The fixed 8-qubit circuit drawn when no input is given
pub fn default_circuit() -> Result<Circuit, CircuitError> {
    ghz_chain(GHZ_QUBITS, GHZ_LINKS)
}

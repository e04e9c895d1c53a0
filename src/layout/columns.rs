//! Column assignment
//!
//! Operations are placed as early as possible: an operation occupies the
//! contiguous span of wires between its lowest and highest wire, and lands
//! in the first column after every earlier occupant of that span. A
//! measurement's span reaches down to the classical wire of its register,
//! so consecutive meters of a measure-all step into separate columns.

use tracing::trace;

use crate::circuit::{Circuit, ControlledGate, GateFamily, Operation};

use super::types::{Cell, Glyph};

/// Glyphs of one placement, before a column is chosen
type Pending = Vec<(Option<GateFamily>, Glyph)>;

/// Assigns operations to columns over a fixed set of wires
///
/// Cell widths are left at zero; sizing happens once columns are known.
pub(crate) struct ColumnAssigner<'a> {
    circuit: &'a Circuit,
    /// First free column per wire; classical wires follow the qubits
    next_free: Vec<usize>,
    cells: Vec<Cell>,
    num_columns: usize,
}

impl<'a> ColumnAssigner<'a> {
    pub(crate) fn new(circuit: &'a Circuit) -> Self {
        let wires = circuit.num_qubits() + circuit.registers().len();
        Self {
            circuit,
            next_free: vec![0; wires],
            cells: Vec::new(),
            num_columns: 0,
        }
    }

    /// Place every operation of the circuit
    pub(crate) fn assign(mut self) -> (Vec<Cell>, usize) {
        for (op_index, op) in self.circuit.operations().iter().enumerate() {
            self.operation(op_index, op);
        }
        (self.cells, self.num_columns)
    }

    fn operation(&mut self, op_index: usize, op: &Operation) {
        match op {
            Operation::Single { gate, qubit } => {
                let glyphs = vec![(
                    Some(gate.family()),
                    Glyph::Gate {
                        wire: *qubit,
                        label: gate.label(),
                    },
                )];
                self.place(op_index, *qubit, *qubit, glyphs);
            }
            Operation::Controlled {
                gate,
                control,
                target,
            } => {
                let family = Some(gate.family());
                let (lo, hi) = ordered(*control, *target);
                let target_glyph = match gate {
                    ControlledGate::CX => Glyph::Target { wire: *target },
                    ControlledGate::CZ => Glyph::Control { wire: *target },
                    ControlledGate::CY => Glyph::Gate {
                        wire: *target,
                        label: gate.target_label().to_string(),
                    },
                };
                let glyphs = vec![
                    (family, Glyph::Link { from: lo, to: hi }),
                    (family, Glyph::Control { wire: *control }),
                    (family, target_glyph),
                ];
                self.place(op_index, lo, hi, glyphs);
            }
            Operation::Swap { a, b } => {
                let family = Some(GateFamily::Swap);
                let (lo, hi) = ordered(*a, *b);
                let glyphs = vec![
                    (family, Glyph::Link { from: lo, to: hi }),
                    (family, Glyph::SwapCross { wire: *a }),
                    (family, Glyph::SwapCross { wire: *b }),
                ];
                self.place(op_index, lo, hi, glyphs);
            }
            Operation::Barrier { qubits } => self.barrier(op_index, qubits),
            Operation::Measure { qubit, clbit } => self.measure(op_index, *qubit, *clbit),
            Operation::MeasureAll { qubits, clbits } => {
                self.barrier(op_index, qubits);
                for (&q, &c) in qubits.iter().zip(clbits) {
                    self.measure(op_index, q, c);
                }
            }
        }
    }

    fn barrier(&mut self, op_index: usize, qubits: &[usize]) {
        let runs = contiguous_runs(qubits);
        let (Some(first), Some(last)) = (runs.first(), runs.last()) else {
            return;
        };
        let (lo, hi) = (first.0, last.1);
        let glyphs = runs
            .iter()
            .map(|&(from, to)| (None, Glyph::Barrier { from, to }))
            .collect();
        self.place(op_index, lo, hi, glyphs);
    }

    fn measure(&mut self, op_index: usize, qubit: usize, clbit: usize) {
        let registers = self.circuit.registers();
        let Some(reg_index) = registers.iter().position(|r| r.contains(clbit)) else {
            // append() validated the clbit, so a register always exists
            return;
        };
        let creg_wire = self.circuit.num_qubits() + reg_index;
        let glyphs = vec![(
            Some(GateFamily::Measure),
            Glyph::Meter {
                wire: qubit,
                creg_wire,
                bit: clbit - registers[reg_index].start,
            },
        )];
        self.place(op_index, qubit, creg_wire, glyphs);
    }

    /// Put glyphs in the first column free across wires `lo..=hi`
    fn place(&mut self, op_index: usize, lo: usize, hi: usize, glyphs: Pending) {
        let column = self.next_free[lo..=hi].iter().copied().max().unwrap_or(0);
        for slot in &mut self.next_free[lo..=hi] {
            *slot = column + 1;
        }
        self.num_columns = self.num_columns.max(column + 1);
        trace!(op_index, column, lo, hi, "placed operation");

        self.cells
            .extend(glyphs.into_iter().map(|(family, glyph)| Cell {
                column,
                op_index,
                family,
                glyph,
                width: 0.0,
            }));
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Group qubits into maximal runs of consecutive indices, `(first, last)` inclusive
pub(crate) fn contiguous_runs(qubits: &[usize]) -> Vec<(usize, usize)> {
    let mut sorted = qubits.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut runs: Vec<(usize, usize)> = Vec::new();
    for q in sorted {
        match runs.last_mut() {
            Some(run) if run.1 + 1 == q => run.1 = q,
            _ => runs.push((q, q)),
        }
    }
    runs
}

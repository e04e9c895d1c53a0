//! Layout engine for circuit drawings
//!
//! Takes a circuit and computes where every wire, column and glyph goes,
//! producing a LayoutResult in abstract units that the renderers scale.

mod columns;
pub mod config;
pub mod error;
pub mod solver;
pub mod types;

pub use config::LayoutConfig;
pub use error::LayoutError;
pub use types::*;

use tracing::debug;

use crate::circuit::{Circuit, MAX_QUBITS};
use columns::ColumnAssigner;

/// Default quantum register name used for wire labels
pub const QUBIT_REGISTER: &str = "q";

/// Compute the layout of a circuit
pub fn compute(circuit: &Circuit, config: &LayoutConfig) -> Result<LayoutResult, LayoutError> {
    if circuit.num_qubits() == 0 {
        return Err(LayoutError::NoWires(circuit.name().to_string()));
    }
    if circuit.num_qubits() > MAX_QUBITS {
        return Err(LayoutError::TooManyWires {
            name: circuit.name().to_string(),
            count: circuit.num_qubits(),
            max: MAX_QUBITS,
        });
    }

    let (mut cells, num_columns) = ColumnAssigner::new(circuit).assign();

    let (_, gate_height) = config.gate_size;
    let mut wires = Vec::with_capacity(circuit.num_qubits() + circuit.registers().len());
    for q in 0..circuit.num_qubits() {
        wires.push(WireLayout {
            register: QUBIT_REGISTER.to_string(),
            index: Some(q),
            kind: WireKind::Quantum,
            y: 0.0,
        });
    }
    for reg in circuit.registers() {
        wires.push(WireLayout {
            register: reg.name.clone(),
            index: None,
            kind: WireKind::Classical { size: reg.size },
            y: 0.0,
        });
    }
    for (i, wire) in wires.iter_mut().enumerate() {
        wire.y = config.margin + gate_height / 2.0 + i as f64 * config.wire_pitch;
    }

    let label_chars = wires
        .iter()
        .map(|w| w.label().chars().count())
        .max()
        .unwrap_or(0);
    let label_x = config.margin + label_chars as f64 * config.char_width;
    let wire_start = label_x + config.label_padding;

    let widths = size_cells(&mut cells, num_columns, config);
    let lefts = solver::pack_columns(&widths, wire_start + config.column_gap, config.column_gap)?;
    let columns: Vec<ColumnLayout> = lefts
        .iter()
        .zip(&widths)
        .map(|(&x, &width)| ColumnLayout { x, width })
        .collect();

    let wire_end = match columns.last() {
        Some(last) => last.right() + config.column_gap,
        None => wire_start + config.gate_size.0,
    };

    let bottom = wires.last().map_or(config.margin, |w| w.y) + gate_height / 2.0 + config.margin;
    let bounds = BoundingBox::new(0.0, 0.0, wire_end + config.margin, bottom);

    debug!(
        circuit = circuit.name(),
        wires = wires.len(),
        columns = columns.len(),
        width = bounds.width,
        height = bounds.height,
        "layout computed"
    );

    Ok(LayoutResult {
        wires,
        columns,
        cells,
        wire_start,
        wire_end,
        label_x,
        gate_size: config.gate_size,
        bounds,
    })
}

/// Set every cell's width and return each column's width: its widest cell
fn size_cells(cells: &mut [Cell], num_columns: usize, config: &LayoutConfig) -> Vec<f64> {
    let mut widths = vec![config.barrier_width; num_columns];
    for cell in cells.iter_mut() {
        cell.width = match &cell.glyph {
            Glyph::Gate { label, .. } => config.box_width(label),
            Glyph::Barrier { .. } => config.barrier_width,
            Glyph::Link { .. } => 0.0,
            Glyph::Control { .. }
            | Glyph::Target { .. }
            | Glyph::SwapCross { .. }
            | Glyph::Meter { .. } => config.gate_size.0,
        };
        widths[cell.column] = widths[cell.column].max(cell.width);
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::default_circuit;

    #[test]
    fn test_empty_circuit_rejected() {
        let circuit = Circuit::new("empty", 0);
        let err = compute(&circuit, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, LayoutError::NoWires(_)));
    }

    #[test]
    fn test_oversized_circuit_rejected() {
        let circuit = Circuit::new("huge", 100_000_000_000_000);
        let err = compute(&circuit, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::TooManyWires {
                count: 100_000_000_000_000,
                ..
            }
        ));
    }

    #[test]
    fn test_ghz_layout_geometry() {
        let circuit = default_circuit().unwrap();
        let config = LayoutConfig::default();
        let layout = compute(&circuit, &config).unwrap();

        assert_eq!(layout.wires.len(), 9);
        assert_eq!(layout.num_qubits(), 8);
        assert_eq!(layout.wires[8].kind, WireKind::Classical { size: 8 });
        assert_eq!(layout.num_columns(), 17);

        // wires are evenly spaced
        for pair in layout.wires.windows(2) {
            assert!((pair[1].y - pair[0].y - config.wire_pitch).abs() < 1e-9);
        }

        // columns never overlap and keep the gap
        for pair in layout.columns.windows(2) {
            assert!(pair[1].x >= pair[0].right() + config.column_gap - 1e-6);
        }
        assert!(layout.columns[0].x >= layout.wire_start);
        assert!(layout.wire_end <= layout.bounds.right());
        assert!(layout.wires[8].y < layout.bounds.bottom());
    }

    #[test]
    fn test_no_operations() {
        let circuit = Circuit::new("idle", 2);
        let layout = compute(&circuit, &LayoutConfig::default()).unwrap();
        assert_eq!(layout.num_columns(), 0);
        assert!(layout.wire_end > layout.wire_start);
    }

    #[test]
    fn test_wide_label_widens_column() {
        let mut circuit = Circuit::new("rot", 2);
        circuit
            .rx(std::f64::consts::FRAC_PI_2, 0)
            .unwrap()
            .h(1)
            .unwrap();
        let config = LayoutConfig::default();
        let layout = compute(&circuit, &config).unwrap();
        assert_eq!(layout.num_columns(), 1);
        assert_eq!(layout.columns[0].width, config.box_width("Rx(π/2)"));

        // the H box keeps its own width inside the wider column
        let h = layout
            .cells
            .iter()
            .find(|c| matches!(&c.glyph, Glyph::Gate { label, .. } if label == "H"))
            .unwrap();
        assert_eq!(h.width, config.gate_size.0);
    }
}

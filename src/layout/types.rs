//! Core types for the layout engine

use crate::circuit::GateFamily;

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A bounding box representing the spatial extent of an element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireKind {
    Quantum,
    /// One bundled wire per classical register
    Classical { size: usize },
}

/// A horizontal wire: one per qubit, then one per classical register
#[derive(Debug, Clone, PartialEq)]
pub struct WireLayout {
    pub register: String,
    /// Bit index for quantum wires; classical wires are bundled
    pub index: Option<usize>,
    pub kind: WireKind,
    pub y: f64,
}

impl WireLayout {
    /// Plain-text label, e.g. `q_3` or `meas`
    pub fn label(&self) -> String {
        match self.index {
            Some(i) => format!("{}_{}", self.register, i),
            None => self.register.clone(),
        }
    }

    pub fn is_classical(&self) -> bool {
        matches!(self.kind, WireKind::Classical { .. })
    }
}

/// Horizontal slot holding operations with disjoint wire spans
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    pub x: f64,
    pub width: f64,
}

impl ColumnLayout {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Visual primitive placed on one or more wires
#[derive(Debug, Clone, PartialEq)]
pub enum Glyph {
    /// Labelled box on a single wire
    Gate { wire: usize, label: String },
    /// Filled control dot
    Control { wire: usize },
    /// Circled plus of a CNOT target
    Target { wire: usize },
    SwapCross { wire: usize },
    /// Vertical connector between two quantum wires, `from < to`
    Link { from: usize, to: usize },
    /// Barrier over the contiguous wires `from..=to`
    Barrier { from: usize, to: usize },
    /// Meter on `wire` with an arrow down to bit `bit` of the register on `creg_wire`
    Meter {
        wire: usize,
        creg_wire: usize,
        bit: usize,
    },
}

/// A glyph placed in a column, tagged with the operation that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub column: usize,
    pub op_index: usize,
    pub family: Option<GateFamily>,
    pub glyph: Glyph,
    /// Horizontal extent of the glyph, at most the column width
    pub width: f64,
}

/// Complete layout of a circuit drawing
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub wires: Vec<WireLayout>,
    pub columns: Vec<ColumnLayout>,
    pub cells: Vec<Cell>,
    /// Horizontal extent of the wires
    pub wire_start: f64,
    pub wire_end: f64,
    /// Right edge of the register labels
    pub label_x: f64,
    /// Height of gate boxes and width of fixed-size glyphs
    pub gate_size: (f64, f64),
    pub bounds: BoundingBox,
}

impl LayoutResult {
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn wire_y(&self, wire: usize) -> f64 {
        self.wires[wire].y
    }

    pub fn cells_in_column(&self, column: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(move |c| c.column == column)
    }

    /// Number of quantum wires
    pub fn num_qubits(&self) -> usize {
        self.wires.iter().filter(|w| !w.is_classical()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_edges() {
        let b = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.right(), 40.0);
        assert_eq!(b.bottom(), 60.0);
        assert_eq!(b.center(), Point::new(25.0, 40.0));
    }

    #[test]
    fn test_wire_label() {
        let q = WireLayout {
            register: "q".to_string(),
            index: Some(3),
            kind: WireKind::Quantum,
            y: 0.0,
        };
        assert_eq!(q.label(), "q_3");
        let c = WireLayout {
            register: "meas".to_string(),
            index: None,
            kind: WireKind::Classical { size: 8 },
            y: 0.0,
        };
        assert_eq!(c.label(), "meas");
        assert!(c.is_classical());
    }
}

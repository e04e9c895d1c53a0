//! Plain-text rendering with box-drawing characters
//!
//! Every wire takes three rows: the box tops, the wire itself and the box
//! bottoms. Columns come from the layout, so the text and SVG drawings
//! always agree on operation order.

use crate::layout::{Cell, Glyph, LayoutResult, WireKind};

/// Character grid the drawing is painted on
struct Canvas {
    rows: Vec<Vec<char>>,
}

impl Canvas {
    fn new(height: usize, width: usize) -> Self {
        Self {
            rows: vec![vec![' '; width]; height],
        }
    }

    fn get(&self, row: usize, col: usize) -> char {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(' ')
    }

    fn set(&mut self, row: usize, col: usize, ch: char) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = ch;
        }
    }

    fn write(&mut self, row: usize, col: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.set(row, col + i, ch);
        }
    }

    fn finish(self) -> String {
        let mut lines: Vec<String> = self
            .rows
            .into_iter()
            .map(|r| r.into_iter().collect::<String>().trim_end().to_string())
            .collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

fn mid_row(wire: usize) -> usize {
    wire * 3 + 1
}

/// Text between the box walls, padded so the box width is odd
fn box_body(label: &str) -> String {
    let mut body = format!(" {} ", label);
    if body.chars().count() % 2 == 0 {
        body.push(' ');
    }
    body
}

fn glyph_width(glyph: &Glyph) -> usize {
    match glyph {
        Glyph::Gate { label, .. } => box_body(label).chars().count() + 2,
        Glyph::Target { .. } => box_body("X").chars().count() + 2,
        Glyph::Control { .. } | Glyph::SwapCross { .. } | Glyph::Meter { .. } => 3,
        Glyph::Barrier { .. } | Glyph::Link { .. } => 1,
    }
}

/// Render a circuit layout as box-drawing text
pub fn render_text(layout: &LayoutResult) -> String {
    let prefixes: Vec<String> = layout
        .wires
        .iter()
        .map(|w| match w.kind {
            WireKind::Quantum => format!("{}: ", w.label()),
            WireKind::Classical { size } => format!("{}: {}/", w.label(), size),
        })
        .collect();
    let prefix_width = prefixes.iter().map(|p| p.chars().count()).max().unwrap_or(0);

    // column widths are odd so links meet box centres exactly
    let mut widths = vec![1usize; layout.num_columns()];
    for cell in &layout.cells {
        widths[cell.column] = widths[cell.column].max(glyph_width(&cell.glyph));
    }
    let mut starts = Vec::with_capacity(widths.len());
    let mut x = prefix_width + 1;
    for w in &widths {
        starts.push(x);
        x += w + 1;
    }
    let total = x;

    let mut canvas = Canvas::new(layout.wires.len() * 3, total);
    for (i, (wire, prefix)) in layout.wires.iter().zip(&prefixes).enumerate() {
        let row = mid_row(i);
        let line = if wire.is_classical() { '═' } else { '─' };
        for col in prefix_width..total {
            canvas.set(row, col, line);
        }
        canvas.write(row, prefix_width - prefix.chars().count(), prefix);
    }

    for column in 0..layout.num_columns() {
        let x0 = starts[column];
        let w = widths[column];
        let cells: Vec<&Cell> = layout.cells_in_column(column).collect();

        for cell in &cells {
            draw_glyph(&mut canvas, &cell.glyph, x0, w);
        }
        for cell in &cells {
            if let Glyph::Link { from, to } = cell.glyph {
                draw_link(&mut canvas, x0 + w / 2, mid_row(from), mid_row(to));
            }
        }
        for cell in &cells {
            if let Glyph::Meter { wire, creg_wire, bit } = cell.glyph {
                draw_meter_arrow(&mut canvas, x0 + w / 2, wire, creg_wire, bit);
            }
        }
    }

    canvas.finish()
}

fn draw_box(canvas: &mut Canvas, wire: usize, x0: usize, w: usize, label: &str) {
    let body = box_body(label);
    let inner = body.chars().count();
    let start = x0 + (w - inner - 2) / 2;
    let row = mid_row(wire);
    canvas.write(row - 1, start, &format!("┌{}┐", "─".repeat(inner)));
    canvas.write(row, start, &format!("┤{}├", body));
    canvas.write(row + 1, start, &format!("└{}┘", "─".repeat(inner)));
}

fn draw_glyph(canvas: &mut Canvas, glyph: &Glyph, x0: usize, w: usize) {
    let center = x0 + w / 2;
    match glyph {
        Glyph::Gate { wire, label } => draw_box(canvas, *wire, x0, w, label),
        Glyph::Target { wire } => draw_box(canvas, *wire, x0, w, "X"),
        Glyph::Control { wire } => canvas.set(mid_row(*wire), center, '■'),
        Glyph::SwapCross { wire } => canvas.set(mid_row(*wire), center, 'X'),
        Glyph::Barrier { from, to } => {
            for row in (from * 3)..=(to * 3 + 2) {
                canvas.set(row, center, '░');
            }
        }
        Glyph::Meter { wire, .. } => {
            let row = mid_row(*wire);
            canvas.write(row - 1, center - 1, "┌─┐");
            canvas.write(row, center - 1, "┤M├");
            canvas.write(row + 1, center - 1, "└╥┘");
        }
        Glyph::Link { .. } => {}
    }
}

/// Vertical connector between two wire rows, joined into any box edge it meets
fn draw_link(canvas: &mut Canvas, col: usize, from_row: usize, to_row: usize) {
    for row in (from_row + 1)..to_row {
        let joined = match (canvas.get(row, col), row % 3) {
            ('─', 0) => '┴',
            ('─', 2) => '┬',
            ('─', _) => '┼',
            ('═', _) => '╪',
            (' ', _) => '│',
            (other, _) => other,
        };
        canvas.set(row, col, joined);
    }
}

fn draw_meter_arrow(canvas: &mut Canvas, col: usize, wire: usize, creg_wire: usize, bit: usize) {
    let creg_row = mid_row(creg_wire);
    for row in (mid_row(wire) + 2)..creg_row {
        let joined = match canvas.get(row, col) {
            '─' => '╫',
            '═' => '╬',
            ' ' => '║',
            other => other,
        };
        canvas.set(row, col, joined);
    }
    canvas.set(creg_row, col, '╩');

    let index = bit.to_string();
    let start = col.saturating_sub((index.chars().count() - 1) / 2);
    canvas.write(creg_row + 1, start, &index);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{default_circuit, Circuit};
    use crate::layout::{compute, LayoutConfig};
    use pretty_assertions::assert_eq;

    fn text_of(circuit: &Circuit) -> String {
        render_text(&compute(circuit, &LayoutConfig::default()).unwrap())
    }

    #[test]
    fn test_box_body_is_odd() {
        assert_eq!(box_body("H"), " H ");
        assert_eq!(box_body("√X"), " √X  ");
    }

    fn lines(rows: &[&str]) -> String {
        let mut out = rows.join("\n");
        out.push('\n');
        out
    }

    #[test]
    fn test_bell_drawing() {
        let mut circuit = Circuit::new("bell", 2);
        circuit.h(0).unwrap().cx(0, 1).unwrap();
        let expected = lines(&[
            "      ┌───┐",
            "q_0: ─┤ H ├───■───",
            "      └───┘   │",
            "            ┌─┴─┐",
            "q_1: ───────┤ X ├─",
            "            └───┘",
        ]);
        assert_eq!(text_of(&circuit), expected);
    }

    #[test]
    fn test_measure_reaches_classical_wire() {
        let mut circuit = Circuit::new("m", 1);
        circuit.measure_all().unwrap();
        let expected = lines(&[
            "         ░ ┌─┐",
            "   q_0: ─░─┤M├─",
            "         ░ └╥┘",
            "            ║",
            "meas: 1/════╩══",
            "            0",
        ]);
        assert_eq!(text_of(&circuit), expected);
    }

    #[test]
    fn test_ghz_drawing_content() {
        let text = text_of(&default_circuit().unwrap());
        assert_eq!(text.matches("┤ H ├").count(), 1);
        assert_eq!(text.matches("┤ X ├").count(), 7);
        assert_eq!(text.matches('■').count(), 7);
        assert_eq!(text.matches("┤M├").count(), 8);
        assert_eq!(text.matches('╩').count(), 8);
        assert_eq!(text.matches('░').count(), 24);
        assert!(text.contains("   q_0: "));
        assert!(text.contains("meas: 8/═"));
    }

    #[test]
    fn test_link_crosses_idle_wire() {
        let mut circuit = Circuit::new("far", 3);
        circuit.cz(0, 2).unwrap();
        let rows: Vec<String> = text_of(&circuit).lines().map(String::from).collect();
        assert_eq!(rows[1], "q_0: ──■──");
        assert_eq!(rows[3], "       │");
        assert_eq!(rows[4], "q_1: ──┼──");
        assert_eq!(rows[7], "q_2: ──■──");
    }
}

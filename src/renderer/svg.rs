//! SVG generation from circuit layouts

use crate::circuit::GateFamily;
use crate::layout::{BoundingBox, Cell, Glyph, LayoutResult, WireKind, WireLayout};
use crate::style::{GateColors, Style};

use super::SvgConfig;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    defs: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            defs: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn class_list(&self, kind: &str, classes: &[&str]) -> String {
        let prefix = self.prefix();
        std::iter::once(format!("{}shape", prefix))
            .chain(std::iter::once(format!("{}{}", prefix, kind)))
            .chain(classes.iter().map(|c| format!("{}{}", prefix, c)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Add the arrowhead used by meter arrows
    pub fn add_arrow_marker(&mut self, color: &str) {
        let prefix = self.prefix();
        self.defs.push(format!(
            r#"<marker id="{prefix}arrow" viewBox="0 0 10 10" refX="9" refY="5" markerWidth="6" markerHeight="6" markerUnits="userSpaceOnUse" orient="auto">
      <path d="M0,0 L10,5 L0,10 Z" fill="{}"/>
    </marker>"#,
            escape_xml(color)
        ));
    }

    fn marker_ref(&self) -> String {
        format!(r#" marker-end="url(#{}arrow)""#, self.prefix())
    }

    /// Add a rectangle element
    pub fn add_rect(&mut self, x: f64, y: f64, w: f64, h: f64, classes: &[&str], styles: &str) {
        self.elements.push(format!(
            r#"{}<rect class="{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
            self.indent_str(),
            self.class_list("rect", classes),
            round(x),
            round(y),
            round(w),
            round(h),
            styles
        ));
    }

    /// Add a circle element
    pub fn add_circle(&mut self, cx: f64, cy: f64, r: f64, classes: &[&str], styles: &str) {
        self.elements.push(format!(
            r#"{}<circle class="{}" cx="{}" cy="{}" r="{}"{}/>"#,
            self.indent_str(),
            self.class_list("circle", classes),
            round(cx),
            round(cy),
            round(r),
            styles
        ));
    }

    /// Add a line element
    pub fn add_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        classes: &[&str],
        styles: &str,
    ) {
        self.elements.push(format!(
            r#"{}<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            self.indent_str(),
            self.class_list("line", classes),
            round(x1),
            round(y1),
            round(x2),
            round(y2),
            styles
        ));
    }

    /// Add a path element
    pub fn add_path(&mut self, d: &str, classes: &[&str], styles: &str) {
        self.elements.push(format!(
            r#"{}<path class="{}" d="{}"{}/>"#,
            self.indent_str(),
            self.class_list("path", classes),
            d,
            styles
        ));
    }

    /// Add a text element, vertically centred on `y`
    pub fn add_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        anchor: TextAnchor,
        classes: &[&str],
        styles: &str,
    ) {
        self.elements.push(format!(
            r#"{}<text class="{}" x="{}" y="{}" text-anchor="{}" dominant-baseline="central"{}>{}</text>"#,
            self.indent_str(),
            self.class_list("text", classes),
            round(x),
            round(y),
            anchor.as_str(),
            styles,
            escape_xml(text)
        ));
    }

    /// Add a register label such as `q₀`, with the index as a subscript
    pub fn add_register_label(
        &mut self,
        register: &str,
        index: Option<usize>,
        x: f64,
        y: f64,
        subscript_size: f64,
        styles: &str,
    ) {
        let subscript = index
            .map(|i| {
                format!(
                    r#"<tspan baseline-shift="sub" font-size="{}">{}</tspan>"#,
                    round(subscript_size),
                    i
                )
            })
            .unwrap_or_default();
        self.elements.push(format!(
            r#"{}<text class="{}" x="{}" y="{}" text-anchor="end" dominant-baseline="central"{}>{}{}</text>"#,
            self.indent_str(),
            self.class_list("text", &["register"]),
            round(x),
            round(y),
            styles,
            escape_xml(register),
            subscript
        ));
    }

    /// Add a group element with optional ID and classes
    pub fn start_group(&mut self, id: Option<&str>, classes: &[&str]) {
        let prefix = self.prefix();
        let id_attr = id
            .map(|i| format!(r#" id="{}{}""#, prefix, i))
            .unwrap_or_default();
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            let list = classes
                .iter()
                .map(|c| format!("{}{}", prefix, c))
                .collect::<Vec<_>>()
                .join(" ");
            format!(r#" class="{}""#, list)
        };

        self.elements
            .push(format!("{}<g{}{}>", self.indent_str(), id_attr, class_attr));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string
    pub fn build(self, viewbox: BoundingBox) -> String {
        let padding = self.config.viewbox_padding;
        let vb_x = viewbox.x - padding;
        let vb_y = viewbox.y - padding;
        let vb_w = viewbox.width + 2.0 * padding;
        let vb_h = viewbox.height + 2.0 * padding;
        let scale = self.config.scale;

        let nl = self.newline();

        let mut svg = String::new();

        // XML declaration for standalone
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        // SVG root element
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}" font-family="{}">"#,
            round(vb_x),
            round(vb_y),
            round(vb_w),
            round(vb_h),
            round(vb_w * scale),
            round(vb_h * scale),
            escape_xml(&self.config.font_family)
        ));
        svg.push_str(nl);

        // Defs section if needed
        if !self.defs.is_empty() {
            svg.push_str("  <defs>");
            svg.push_str(nl);
            for def in &self.defs {
                svg.push_str("    ");
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str("  </defs>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Render a circuit layout to an SVG string
pub fn render_svg(layout: &LayoutResult, style: &Style, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone());

    let has_meters = layout
        .cells
        .iter()
        .any(|c| matches!(c.glyph, Glyph::Meter { .. }));
    if has_meters {
        builder.add_arrow_marker(&style.classical_wire);
    }

    let b = layout.bounds;
    builder.add_rect(
        b.x,
        b.y,
        b.width,
        b.height,
        &["background"],
        &paint(&[("fill", style.background.as_str())]),
    );

    builder.start_group(None, &["wires"]);
    for wire in &layout.wires {
        render_wire(wire, layout, style, &mut builder);
    }
    builder.end_group();

    for column in 0..layout.num_columns() {
        let id = format!("col-{}", column);
        builder.start_group(Some(&id), &["column"]);
        // barriers and links sit under the boxes they connect
        let (under, over): (Vec<&Cell>, Vec<&Cell>) = layout
            .cells_in_column(column)
            .partition(|c| matches!(c.glyph, Glyph::Barrier { .. } | Glyph::Link { .. }));
        for cell in under.into_iter().chain(over) {
            render_cell(cell, layout, style, &mut builder);
        }
        builder.end_group();
    }

    builder.build(layout.bounds)
}

fn render_wire(wire: &WireLayout, layout: &LayoutResult, style: &Style, builder: &mut SvgBuilder) {
    let y = wire.y;
    let (x1, x2) = (layout.wire_start, layout.wire_end);

    match wire.kind {
        WireKind::Quantum => {
            builder.add_line(
                x1,
                y,
                x2,
                y,
                &["qubit"],
                &stroke(&style.wire, 1.0),
            );
        }
        WireKind::Classical { size } => {
            let styles = stroke(&style.classical_wire, 1.0);
            builder.add_line(x1, y - 1.5, x2, y - 1.5, &["clbit"], &styles);
            builder.add_line(x1, y + 1.5, x2, y + 1.5, &["clbit"], &styles);

            // bundle slash with the register size
            let sx = x1 + 8.0;
            builder.add_line(sx - 4.0, y + 6.0, sx + 4.0, y - 6.0, &["bundle"], &styles);
            builder.add_text(
                &size.to_string(),
                sx + 6.0,
                y - 9.0,
                TextAnchor::Start,
                &["bundle-size"],
                &font(style.subfont_size, &style.classical_wire),
            );
        }
    }

    builder.add_register_label(
        &wire.register,
        wire.index,
        layout.label_x,
        y,
        style.subfont_size,
        &font(style.font_size, &style.text),
    );
}

fn render_cell(cell: &Cell, layout: &LayoutResult, style: &Style, builder: &mut SvgBuilder) {
    let cx = layout.columns[cell.column].center_x();
    let (gate_w, gate_h) = layout.gate_size;
    let colors = style.gate(cell.family.unwrap_or(GateFamily::Multi));

    match &cell.glyph {
        Glyph::Gate { wire, label } => {
            let y = layout.wire_y(*wire);
            render_box(cx, y, cell.width, gate_h, colors, builder);
            builder.add_text(
                label,
                cx,
                y,
                TextAnchor::Middle,
                &["gate-label"],
                &font(style.font_size, &colors.text),
            );
        }
        Glyph::Control { wire } => {
            builder.add_circle(
                cx,
                layout.wire_y(*wire),
                gate_h * 0.125,
                &["control"],
                &paint(&[("fill", colors.fill.as_str())]),
            );
        }
        Glyph::Target { wire } => {
            let y = layout.wire_y(*wire);
            let r = gate_h * 0.35;
            builder.add_circle(cx, y, r, &["target"], &paint(&[("fill", colors.fill.as_str())]));
            let plus = stroke(&colors.text, 2.0);
            builder.add_line(cx - r * 0.6, y, cx + r * 0.6, y, &["plus"], &plus);
            builder.add_line(cx, y - r * 0.6, cx, y + r * 0.6, &["plus"], &plus);
        }
        Glyph::SwapCross { wire } => {
            let y = layout.wire_y(*wire);
            let d = gate_h * 0.2;
            let styles = stroke(&colors.fill, 2.0);
            builder.add_line(cx - d, y - d, cx + d, y + d, &["swap"], &styles);
            builder.add_line(cx - d, y + d, cx + d, y - d, &["swap"], &styles);
        }
        Glyph::Link { from, to } => {
            builder.add_line(
                cx,
                layout.wire_y(*from),
                cx,
                layout.wire_y(*to),
                &["link"],
                &stroke(&colors.fill, 2.0),
            );
        }
        Glyph::Barrier { from, to } => {
            let top = layout.wire_y(*from) - gate_h / 2.0;
            let bottom = layout.wire_y(*to) + gate_h / 2.0;
            builder.add_rect(
                cx - cell.width / 4.0,
                top,
                cell.width / 2.0,
                bottom - top,
                &["barrier"],
                &paint(&[("fill", style.barrier.as_str()), ("opacity", "0.5")]),
            );
            builder.add_line(
                cx,
                top,
                cx,
                bottom,
                &["barrier-line"],
                &format!(
                    "{}{}",
                    stroke(&style.wire, 1.0),
                    paint(&[("stroke-dasharray", "4,3")])
                ),
            );
        }
        Glyph::Meter {
            wire,
            creg_wire,
            bit,
        } => {
            let y = layout.wire_y(*wire);
            let creg_y = layout.wire_y(*creg_wire);
            builder.start_group(None, &["meter"]);
            render_box(cx, y, gate_w, gate_h, colors, builder);

            let r = gate_w * 0.3;
            let base = y + gate_h * 0.2;
            let dial = format!(
                "{}{}",
                stroke(&colors.text, 1.5),
                paint(&[("fill", "none")])
            );
            builder.add_path(
                &format!(
                    "M{} {} A{} {} 0 0 1 {} {}",
                    round(cx - r),
                    round(base),
                    round(r),
                    round(r),
                    round(cx + r),
                    round(base)
                ),
                &["dial"],
                &dial,
            );
            builder.add_line(
                cx,
                base,
                cx + r * 0.8,
                y - gate_h * 0.3,
                &["needle"],
                &stroke(&colors.text, 1.5),
            );

            let arrow = format!("{}{}", stroke(&style.classical_wire, 1.5), builder.marker_ref());
            builder.add_line(cx, y + gate_h / 2.0, cx, creg_y - 1.5, &["measure-arrow"], &arrow);
            builder.add_text(
                &bit.to_string(),
                cx,
                creg_y + gate_h * 0.35,
                TextAnchor::Middle,
                &["bit-index"],
                &font(style.subfont_size, &style.subtext),
            );
            builder.end_group();
        }
    }
}

fn render_box(cx: f64, cy: f64, w: f64, h: f64, colors: &GateColors, builder: &mut SvgBuilder) {
    builder.add_rect(
        cx - w / 2.0,
        cy - h / 2.0,
        w,
        h,
        &["gate"],
        &paint(&[("fill", colors.fill.as_str())]),
    );
}

/// Format presentation attributes as ` name="value"` pairs
fn paint(attrs: &[(&str, &str)]) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!(r#" {}="{}""#, k, escape_xml(v)))
        .collect()
}

fn stroke(color: &str, width: f64) -> String {
    let width = round(width).to_string();
    paint(&[("stroke", color), ("stroke-width", width.as_str())])
}

fn font(size: f64, color: &str) -> String {
    let size = round(size).to_string();
    paint(&[("font-size", size.as_str()), ("fill", color)])
}

/// Round to hundredths so float noise does not reach the output
fn round(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{default_circuit, Circuit};
    use crate::layout::{compute, LayoutConfig};

    fn render(circuit: &Circuit, style: &str, config: &SvgConfig) -> String {
        let layout = compute(circuit, &LayoutConfig::default()).unwrap();
        render_svg(&layout, &Style::named(style).unwrap(), config)
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_paint() {
        let result = paint(&[("fill", "#ff0000"), ("opacity", "0.5")]);
        assert_eq!(result, r##" fill="#ff0000" opacity="0.5""##);
        assert_eq!(
            stroke("#000000", 2.0),
            r##" stroke="#000000" stroke-width="2""##
        );
    }

    #[test]
    fn test_round() {
        assert_eq!(round(14.000000000000002), 14.0);
        assert_eq!(round(0.125), 0.13);
    }

    #[test]
    fn test_ghz_svg_structure() {
        let circuit = default_circuit().unwrap();
        let svg = render(&circuit, "iqp-dark", &SvgConfig::default());

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r##"fill="#161616""##));
        assert_eq!(svg.matches(r#"class="qd-column""#).count(), 17);
        assert_eq!(svg.matches(" qd-target").count(), 7);
        assert_eq!(svg.matches(" qd-control").count(), 7);
        assert_eq!(svg.matches(r#"class="qd-meter""#).count(), 8);
        assert_eq!(svg.matches(" qd-barrier-line").count(), 1);
        assert_eq!(svg.matches(" qd-register").count(), 9);
        assert!(svg.contains(">meas</text>"));
        assert!(svg.contains("qd-arrow"));
        // the H box uses the hadamard colour
        assert!(svg.contains(r##"fill="#fa4d56""##));
    }

    #[test]
    fn test_scale_sets_size_not_viewbox() {
        let mut circuit = Circuit::new("one", 1);
        circuit.h(0).unwrap();
        let layout = compute(&circuit, &LayoutConfig::default()).unwrap();
        let style = Style::default();

        let full = render_svg(&layout, &style, &SvgConfig::default());
        let half = render_svg(&layout, &style, &SvgConfig::default().with_scale(0.5));

        let w = round(layout.bounds.width);
        let h = round(layout.bounds.height);
        let viewbox = format!(r#"viewBox="0 0 {} {}""#, w, h);
        assert!(full.contains(&viewbox));
        assert!(half.contains(&viewbox));
        assert!(full.contains(&format!(r#"width="{}""#, w)));
        assert!(half.contains(&format!(r#"width="{}""#, round(w * 0.5))));
        assert!(half.contains(&format!(r#"height="{}""#, round(h * 0.5))));
    }

    #[test]
    fn test_no_marker_without_measurements() {
        let mut circuit = Circuit::new("swap", 2);
        circuit.swap(0, 1).unwrap();
        let svg = render(&circuit, "bw", &SvgConfig::default());
        assert!(!svg.contains("<defs>"));
        assert_eq!(svg.matches(" qd-swap").count(), 4);
    }

    #[test]
    fn test_compact_output() {
        let mut circuit = Circuit::new("x", 1);
        circuit.x(0).unwrap();
        let config = SvgConfig::compact().without_class_prefix();
        let svg = render(&circuit, "iqp", &config);
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains('\n'));
        assert!(svg.contains(r#"class="shape rect gate""#));
    }
}

//! Configuration for the layout engine

/// Configuration options for layout computation
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Minimum gate box size (width, height)
    pub gate_size: (f64, f64),

    /// Vertical distance between neighbouring wires
    pub wire_pitch: f64,

    /// Horizontal space between columns
    pub column_gap: f64,

    /// Width of a column holding only a barrier
    pub barrier_width: f64,

    /// Horizontal padding inside gate boxes, per side
    pub box_padding: f64,

    /// Estimated advance width of one label character
    pub char_width: f64,

    /// Space between register labels and the start of the wires
    pub label_padding: f64,

    /// Outer margin around the drawing
    pub margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gate_size: (40.0, 40.0),
            wire_pitch: 60.0,
            column_gap: 16.0,
            barrier_width: 20.0,
            box_padding: 8.0,
            char_width: 9.0,
            label_padding: 12.0,
            margin: 20.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum gate box size
    pub fn with_gate_size(mut self, width: f64, height: f64) -> Self {
        self.gate_size = (width, height);
        self
    }

    /// Set the distance between wires
    pub fn with_wire_pitch(mut self, pitch: f64) -> Self {
        self.wire_pitch = pitch;
        self
    }

    /// Set the spacing between columns
    pub fn with_column_gap(mut self, gap: f64) -> Self {
        self.column_gap = gap;
        self
    }

    /// Set the outer margin
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Width of a gate box holding `label`
    pub fn box_width(&self, label: &str) -> f64 {
        let text = label.chars().count() as f64 * self.char_width + 2.0 * self.box_padding;
        text.max(self.gate_size.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.gate_size, (40.0, 40.0));
        assert_eq!(config.wire_pitch, 60.0);
        assert_eq!(config.column_gap, 16.0);
        assert_eq!(config.margin, 20.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new()
            .with_gate_size(50.0, 30.0)
            .with_wire_pitch(80.0)
            .with_column_gap(4.0)
            .with_margin(0.0);

        assert_eq!(config.gate_size, (50.0, 30.0));
        assert_eq!(config.wire_pitch, 80.0);
        assert_eq!(config.column_gap, 4.0);
        assert_eq!(config.margin, 0.0);
    }

    #[test]
    fn test_box_width() {
        let config = LayoutConfig::default();
        // short labels use the minimum width
        assert_eq!(config.box_width("H"), 40.0);
        // "Rx(π/2)" is 7 chars: 7 * 9 + 16
        assert_eq!(config.box_width("Rx(π/2)"), 79.0);
    }
}

//! SVG output options

/// Font stack used for labels; the first installed family wins
pub const DEFAULT_FONT_FAMILY: &str = "DejaVu Sans, Liberation Sans, Arial, Helvetica, sans-serif";

/// How the SVG document is written
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Extra space added on every side of the layout bounds
    pub viewbox_padding: f64,

    /// Emit the `<?xml ..?>` declaration
    pub standalone: bool,

    /// One element per line, indented by group depth
    pub pretty_print: bool,

    /// Prepended to every class and id, `qd-` by default
    pub class_prefix: Option<String>,

    /// Factor between viewBox units and the `width`/`height` attributes
    pub scale: f64,

    pub font_family: String,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            viewbox_padding: 0.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("qd-".to_string()),
            scale: 1.0,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewbox_padding(mut self, padding: f64) -> Self {
        self.viewbox_padding = padding;
        self
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Use `prefix` for classes and ids, `None` for bare names
    pub fn with_class_prefix(mut self, prefix: Option<&str>) -> Self {
        self.class_prefix = prefix.map(str::to_string);
        self
    }

    pub fn without_class_prefix(self) -> Self {
        self.with_class_prefix(None)
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Compact single-line output without the XML declaration
    pub fn compact() -> Self {
        Self::default()
            .with_pretty_print(false)
            .with_standalone(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_draw_at_natural_size() {
        let config = SvgConfig::default();
        assert_eq!(config.scale, 1.0);
        assert_eq!(config.viewbox_padding, 0.0);
        assert_eq!(config.class_prefix.as_deref(), Some("qd-"));
        assert!(config.standalone && config.pretty_print);
    }

    #[test]
    fn test_builders() {
        let config = SvgConfig::compact()
            .with_class_prefix(Some("c-"))
            .with_scale(0.5)
            .with_font_family("monospace");

        assert!(!config.standalone);
        assert!(!config.pretty_print);
        assert_eq!(config.class_prefix.as_deref(), Some("c-"));
        assert_eq!(config.scale, 0.5);
        assert_eq!(config.font_family, "monospace");
        assert_eq!(config.without_class_prefix().class_prefix, None);
    }
}

//! qdraw - build quantum circuits and draw them
//!
//! This library provides a circuit builder, an OpenQASM 2 reader, a column
//! layout engine and renderers for SVG, PNG and box-drawing text.
//!
//! # Example
//!
//! ```rust
//! use qdraw::{draw, DrawOptions, OutputFormat};
//! use qdraw::circuit::default_circuit;
//!
//! let circuit = default_circuit().unwrap();
//! let drawing = draw(&circuit, &DrawOptions::new().with_format(OutputFormat::Text)).unwrap();
//! assert!(drawing.as_text().unwrap().contains("┤M├"));
//! ```

pub mod circuit;
pub mod error;
pub mod layout;
pub mod parser;
pub mod renderer;
pub mod style;

pub use circuit::{default_circuit, Circuit, CircuitError};
pub use error::ParseError;
pub use layout::{LayoutConfig, LayoutError, LayoutResult};
pub use parser::parse_circuit;
pub use renderer::{render_svg, render_text, RasterError, SvgConfig};
pub use style::{Style, StyleError};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info};

/// Where the fixed circuit is drawn when no output is given
pub const DEFAULT_OUTPUT: &str = "../readme_figure_1.png";

/// Scale the command line draws with
pub const DEFAULT_SCALE: f64 = 0.5;

/// Style the command line draws with
pub const DEFAULT_CLI_STYLE: &str = "iqp-dark";

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error while reading QASM input
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    #[error("invalid circuit: {0}")]
    Circuit(#[from] CircuitError),

    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("style error: {0}")]
    Style(#[from] StyleError),

    #[error("rasterization failed: {0}")]
    Raster(#[from] RasterError),

    #[error("cannot write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scale must be a positive finite number, got {0}")]
    InvalidScale(f64),
}

impl From<Vec<ParseError>> for RenderError {
    fn from(errors: Vec<ParseError>) -> Self {
        RenderError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Kind of drawing to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Rasterized image
    Png,
    Svg,
    /// Box-drawing characters
    Text,
}

/// Error for a format name that is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown output format '{0}' (expected png, mpl, svg or text)")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" | "mpl" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            "text" | "txt" => Ok(OutputFormat::Text),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Text => "text",
        };
        f.write_str(name)
    }
}

impl OutputFormat {
    /// Infer the format from a file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(OutputFormat::Png),
            "svg" => Some(OutputFormat::Svg),
            "txt" => Some(OutputFormat::Text),
            _ => None,
        }
    }
}

/// Style given by name or already loaded
#[derive(Debug, Clone)]
pub enum StyleChoice {
    Named(String),
    Custom(Style),
}

/// Options for the complete draw pipeline
#[derive(Debug, Clone)]
pub struct DrawOptions {
    /// Output format; inferred from the filename when unset
    pub format: Option<OutputFormat>,
    /// File to write, overwriting any existing one
    pub filename: Option<PathBuf>,
    pub scale: f64,
    pub style: StyleChoice,
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            format: None,
            filename: None,
            scale: 1.0,
            style: StyleChoice::Named(style::DEFAULT_STYLE.to_string()),
            layout: LayoutConfig::default(),
            svg: SvgConfig::default(),
        }
    }
}

impl DrawOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_filename(mut self, path: impl Into<PathBuf>) -> Self {
        self.filename = Some(path.into());
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Use a built-in style by name
    pub fn with_style(mut self, name: impl Into<String>) -> Self {
        self.style = StyleChoice::Named(name.into());
        self
    }

    pub fn with_custom_style(mut self, style: Style) -> Self {
        self.style = StyleChoice::Custom(style);
        self
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Explicit format, else the filename's extension, else PNG for files and text otherwise
    pub fn resolved_format(&self) -> OutputFormat {
        if let Some(format) = self.format {
            return format;
        }
        match &self.filename {
            Some(path) => OutputFormat::from_extension(path).unwrap_or(OutputFormat::Png),
            None => OutputFormat::Text,
        }
    }

    pub fn resolve_style(&self) -> Result<Style, StyleError> {
        match &self.style {
            StyleChoice::Named(name) => Style::named(name),
            StyleChoice::Custom(style) => Ok(style.clone()),
        }
    }
}

/// A finished drawing
#[derive(Debug, Clone, PartialEq)]
pub enum Drawing {
    Svg(String),
    Png(Vec<u8>),
    Text(String),
}

impl Drawing {
    pub fn format(&self) -> OutputFormat {
        match self {
            Drawing::Svg(_) => OutputFormat::Svg,
            Drawing::Png(_) => OutputFormat::Png,
            Drawing::Text(_) => OutputFormat::Text,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Drawing::Svg(s) | Drawing::Text(s) => s.as_bytes(),
            Drawing::Png(bytes) => bytes,
        }
    }

    /// The drawing as text, for SVG and text drawings
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Drawing::Svg(s) | Drawing::Text(s) => Some(s),
            Drawing::Png(_) => None,
        }
    }

    /// Write the drawing to `path`, replacing any existing file
    pub fn write_to(&self, path: &Path) -> Result<(), RenderError> {
        std::fs::write(path, self.as_bytes()).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Draw a circuit, writing the result when options name a file
///
/// # Example
///
/// ```rust
/// use qdraw::{draw, Circuit, DrawOptions, OutputFormat};
///
/// let mut circuit = Circuit::new("bell", 2);
/// circuit.h(0).unwrap().cx(0, 1).unwrap();
///
/// let drawing = draw(&circuit, &DrawOptions::new().with_format(OutputFormat::Svg)).unwrap();
/// assert!(drawing.as_text().unwrap().contains("<svg"));
/// ```
pub fn draw(circuit: &Circuit, options: &DrawOptions) -> Result<Drawing, RenderError> {
    let scale = options.scale;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(RenderError::InvalidScale(scale));
    }

    let style = options.resolve_style()?;
    let format = options.resolved_format();
    debug!(circuit = circuit.name(), %format, style = %style.name, scale, "drawing");

    let result = layout::compute(circuit, &options.layout)?;

    let drawing = match format {
        OutputFormat::Text => Drawing::Text(render_text(&result)),
        OutputFormat::Svg => {
            let config = options.svg.clone().with_scale(scale);
            Drawing::Svg(render_svg(&result, &style, &config))
        }
        OutputFormat::Png => {
            let config = options.svg.clone().with_scale(1.0);
            let svg = render_svg(&result, &style, &config);
            Drawing::Png(renderer::rasterize(&svg, scale)?)
        }
    };

    if let Some(path) = &options.filename {
        drawing.write_to(path)?;
        info!(
            path = %path.display(),
            bytes = drawing.as_bytes().len(),
            "wrote drawing"
        );
    }

    Ok(drawing)
}

/// Parse OpenQASM 2 source and draw the circuit it describes
pub fn draw_qasm(source: &str, name: &str, options: &DrawOptions) -> Result<Drawing, RenderError> {
    let circuit = parse_circuit(source, name)?;
    draw(&circuit, options)
}

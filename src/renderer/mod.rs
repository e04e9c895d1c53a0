//! Renderers turning a circuit layout into output
//!
//! SVG is the primary target; PNG rasterizes the SVG and the text renderer
//! draws the same columns with box-drawing characters.

pub mod config;
pub mod png;
pub mod svg;
pub mod text;

pub use config::SvgConfig;
pub use png::{png_dimensions, rasterize, RasterError};
pub use svg::render_svg;
pub use text::render_text;

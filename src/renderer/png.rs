//! PNG output by rasterizing the SVG rendering

use resvg::{tiny_skia, usvg};
use thiserror::Error;
use tracing::debug;

/// Errors from turning SVG text into PNG bytes
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("invalid SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Rasterize an SVG document, multiplying its size by `scale`
pub fn rasterize(svg: &str, scale: f64) -> Result<Vec<u8>, RasterError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options)?;
    let size = tree.size();
    let width = pixel_len(f64::from(size.width()), scale);
    let height = pixel_len(f64::from(size.height()), scale);
    debug!(width, height, scale, "rasterizing");

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterError::Pixmap { width, height })?;
    let transform = tiny_skia::Transform::from_scale(scale as f32, scale as f32);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| RasterError::Encode(e.to_string()))
}

/// Scaled pixel count, rounded up and never zero
pub fn pixel_len(len: f64, scale: f64) -> u32 {
    (len * scale).ceil().max(1.0) as u32
}

/// Read the width and height from a PNG header
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    const SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
    if bytes.len() < 24 || !bytes.starts_with(SIGNATURE) || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="4" viewBox="0 0 10 4"><rect width="10" height="4" fill="#161616"/></svg>"##;

    #[test]
    fn test_pixel_len() {
        assert_eq!(pixel_len(151.0, 0.5), 76);
        assert_eq!(pixel_len(150.0, 0.5), 75);
        assert_eq!(pixel_len(1.0, 0.01), 1);
    }

    #[test]
    fn test_rasterize_scales_pixels() {
        let png = rasterize(SQUARE, 2.0).unwrap();
        assert_eq!(png_dimensions(&png), Some((20, 8)));

        let png = rasterize(SQUARE, 0.5).unwrap();
        assert_eq!(png_dimensions(&png), Some((5, 2)));
    }

    #[test]
    fn test_invalid_svg() {
        let err = rasterize("<not-svg", 1.0).unwrap_err();
        assert!(matches!(err, RasterError::Svg(_)));
    }

    #[test]
    fn test_png_dimensions_rejects_garbage() {
        assert_eq!(png_dimensions(b"GIF89a"), None);
    }
}

//! Rendering pipeline: scene -> display list -> canvas -> PNG bytes

pub mod font;
pub mod paint;
pub mod raster;

use sha2::{Digest, Sha256};

pub use font::{BitmapFont, GlyphSource, MissingFont};
pub use raster::{rasterize, Canvas};

/// Encoded result of painting one scene.
#[derive(Debug, Clone)]
pub struct RenderedMap {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
    /// Text of every label that could not be drawn
    pub skipped_labels: Vec<String>,
}

impl RenderedMap {
    /// Hex SHA-256 of the encoded PNG
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}

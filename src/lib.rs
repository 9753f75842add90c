//! Mauritius Map Generator
//!
//! Procedurally draws the placeholder Mauritius map used as the logo asset and
//! writes it as a PNG.
//!
//! # Pipeline
//!
//! - **Scene**: fixed drawing parameters (canvas, island polygon, capital
//!   marker, labels), optionally loaded from JSON
//! - **Rendering**: the scene becomes a display list that is rasterized onto
//!   an RGB canvas and encoded as PNG
//! - **Asset**: the PNG is written to disk, creating parent directories
//!
//! Island and marker are mandatory. Labels are best-effort: a label that
//! cannot be drawn is logged and skipped, and the asset is still written.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let asset = mauritius_map::generate("assets/logo/mauritius_map.png")?;
//! println!("Created Mauritius map at {}", asset.path.display());
//! println!("File size: {} bytes", asset.bytes_written);
//! # Ok(())
//! # }
//! ```

use log::info;
use std::path::{Path, PathBuf};

pub mod asset;
pub mod error;
pub mod rendering;
pub mod scene;

pub use error::{Error, Result};
pub use rendering::{BitmapFont, GlyphSource, MissingFont, RenderedMap};
pub use scene::{IslandShape, Label, Marker, Rgb, Scene};

/// Where the logo lives relative to the project root
pub const DEFAULT_OUTPUT_PATH: &str = "assets/logo/mauritius_map.png";

/// Configuration for a generator run
///
/// The defaults reproduce the shipped logo: the built-in Mauritius scene drawn
/// with the built-in bitmap font.
///
/// # Examples
///
/// ```
/// let cfg = mauritius_map::GeneratorConfig::default();
/// assert_eq!(cfg.scene.width, 400);
/// assert_eq!(cfg.scene.height, 300);
/// ```
pub struct GeneratorConfig {
    /// What to draw
    pub scene: Scene,
    /// Glyphs used for label text
    pub glyphs: Box<dyn GlyphSource>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            scene: Scene::mauritius(),
            glyphs: Box::new(BitmapFont::new()),
        }
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("scene", &self.scene)
            .finish_non_exhaustive()
    }
}

/// Summary of a written asset
#[derive(Debug, Clone)]
pub struct GeneratedAsset {
    /// Path the PNG was written to
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Size of the file on disk
    pub bytes_written: u64,
    /// Labels that were skipped because they could not be drawn
    pub skipped_labels: Vec<String>,
    /// Hex SHA-256 of the PNG bytes
    pub digest: String,
    /// The PNG bytes that were written
    pub png_data: Vec<u8>,
}

/// Render the built-in Mauritius map and write it to `output_path`.
pub fn generate(output_path: impl AsRef<Path>) -> Result<GeneratedAsset> {
    generate_with(&GeneratorConfig::default(), output_path)
}

/// Render `config.scene` and write it to `output_path`, overwriting any
/// existing file. Only persistence and encoding errors are returned.
pub fn generate_with(config: &GeneratorConfig, output_path: impl AsRef<Path>) -> Result<GeneratedAsset> {
    let path = output_path.as_ref();
    let rendered = rendering::rasterize(&config.scene, config.glyphs.as_ref())?;
    let bytes_written = asset::write_asset(path, &rendered.png_data)?;
    let digest = rendered.digest();

    info!(
        "Generated {}x{} map at {} ({} bytes)",
        rendered.width,
        rendered.height,
        path.display(),
        bytes_written
    );

    Ok(GeneratedAsset {
        path: path.to_path_buf(),
        width: rendered.width,
        height: rendered.height,
        bytes_written,
        skipped_labels: rendered.skipped_labels,
        digest,
        png_data: rendered.png_data,
    })
}

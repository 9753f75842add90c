//! Scene description: everything that ends up on the map canvas.
//!
//! The built-in scene (`Scene::mauritius`) is the stylized island used for the
//! placeholder logo. Scenes can also be loaded from JSON so the same pipeline
//! can produce variants without recompiling.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Largest accepted canvas edge, in pixels
pub const MAX_CANVAS_SIDE: u32 = 8192;

/// An opaque RGB color, serialized as `[r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(c: Rgb) -> Self {
        image::Rgb([c.0, c.1, c.2])
    }
}

/// Closed polygon approximating the island outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IslandShape {
    pub points: Vec<(i32, i32)>,
    pub fill: Rgb,
    pub outline: Rgb,
}

/// Filled ellipse marking the capital, given by its bounding box (inclusive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub top_left: (i32, i32),
    pub bottom_right: (i32, i32),
    pub fill: Rgb,
}

impl Marker {
    pub fn center(&self) -> (i32, i32) {
        let mid = |a: i32, b: i32| ((a as i64 + b as i64) / 2) as i32;
        (
            mid(self.top_left.0, self.bottom_right.0),
            mid(self.top_left.1, self.bottom_right.1),
        )
    }
}

/// Text drawn with its top-left corner at `position`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub position: (i32, i32),
    pub text: String,
    pub color: Rgb,
}

impl Label {
    pub fn new(x: i32, y: i32, text: &str, color: Rgb) -> Self {
        Self {
            position: (x, y),
            text: text.to_string(),
            color,
        }
    }
}

/// Complete set of drawing parameters for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    pub island: IslandShape,
    pub marker: Marker,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Scene {
    /// The placeholder Mauritius map: light blue sea, green island, red dot
    /// for Port Louis.
    pub fn mauritius() -> Self {
        Self {
            width: 400,
            height: 300,
            background: Rgb(173, 216, 230),
            island: IslandShape {
                points: vec![
                    (120, 80),
                    (180, 60),
                    (220, 80),
                    (240, 120),
                    (235, 170),
                    (200, 190),
                    (150, 200),
                    (100, 170),
                    (95, 120),
                ],
                fill: Rgb(144, 238, 144),
                outline: Rgb(0, 100, 0),
            },
            marker: Marker {
                top_left: (110, 100),
                bottom_right: (125, 115),
                fill: Rgb::RED,
            },
            labels: vec![
                Label::new(130, 105, "Port Louis", Rgb::RED),
                Label::new(100, 220, "MAURITIUS", Rgb::BLACK),
            ],
        }
    }

    /// Reject scenes that cannot produce an image at all.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::ConfigError(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_CANVAS_SIDE || self.height > MAX_CANVAS_SIDE {
            return Err(Error::ConfigError(format!(
                "canvas {}x{} exceeds the {} pixel limit per side",
                self.width, self.height, MAX_CANVAS_SIDE
            )));
        }
        if self.island.points.len() < 3 {
            return Err(Error::ConfigError(format!(
                "island needs at least 3 points, got {}",
                self.island.points.len()
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let scene: Scene = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::mauritius()
    }
}

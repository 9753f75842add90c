/// Rasterizer: executes paint commands on an RGB canvas and encodes PNG

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbImage};
use log::{debug, warn};

use crate::error::Result;
use crate::rendering::font::{Glyph, GlyphSource, GLYPH_HEIGHT, GLYPH_WIDTH, MAX_SCALE};
use crate::rendering::paint::{build_display_list, PaintCommand};
use crate::rendering::RenderedMap;
use crate::scene::{Rgb, Scene};

/// In-memory raster buffer; everything drawn outside its bounds is clipped.
pub struct Canvas {
    img: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            img: RgbImage::from_pixel(width, height, background.into()),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let p = self.img.get_pixel(x, y);
        Rgb(p[0], p[1], p[2])
    }

    pub fn image(&self) -> &RgbImage {
        &self.img
    }

    fn plot(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= self.img.width() as i64 || y >= self.img.height() as i64 {
            return;
        }
        self.img.put_pixel(x as u32, y as u32, color.into());
    }

    /// Clamp the inclusive range `lo..=hi` to `0..len`; `None` if nothing is left.
    fn clamp_span(lo: i64, hi: i64, len: u32) -> Option<(i64, i64)> {
        let lo = lo.max(0);
        let hi = hi.min(len as i64 - 1);
        (lo <= hi).then_some((lo, hi))
    }

    /// Even-odd scanline fill, sampling each row at its pixel centers.
    pub fn fill_polygon(&mut self, points: &[(i32, i32)], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.1).min().unwrap_or(0) as i64;
        let max_y = points.iter().map(|p| p.1).max().unwrap_or(0) as i64;
        let Some((min_y, max_y)) = Self::clamp_span(min_y, max_y, self.img.height()) else {
            return;
        };

        let mut crossings: Vec<f64> = Vec::with_capacity(points.len());
        for y in min_y..=max_y {
            let yc = y as f64 + 0.5;
            crossings.clear();
            for (i, &(x0, y0)) in points.iter().enumerate() {
                let (x1, y1) = points[(i + 1) % points.len()];
                let (fy0, fy1) = (y0 as f64, y1 as f64);
                if (fy0 <= yc && yc < fy1) || (fy1 <= yc && yc < fy0) {
                    let t = (yc - fy0) / (fy1 - fy0);
                    crossings.push(x0 as f64 + t * (x1 as f64 - x0 as f64));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil() as i64;
                let end = (span[1] - 0.5).ceil() as i64 - 1;
                if let Some((start, end)) = Self::clamp_span(start, end, self.img.width()) {
                    for x in start..=end {
                        self.plot(x, y, color);
                    }
                }
            }
        }
    }

    /// Closed outline through all points.
    pub fn stroke_polygon(&mut self, points: &[(i32, i32)], color: Rgb) {
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.line(from, to, color);
        }
    }

    /// Bresenham line, both endpoints included. Segments reaching outside
    /// the canvas are clipped to it first.
    pub fn line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgb) {
        let Some((x0, y0, x1, y1)) = self.clip_segment(from, to) else {
            return;
        };

        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Liang-Barsky clip against the canvas rectangle. Endpoints already on
    /// the canvas are returned unchanged.
    fn clip_segment(&self, from: (i32, i32), to: (i32, i32)) -> Option<(i64, i64, i64, i64)> {
        let (x0, y0) = (from.0 as i64, from.1 as i64);
        let (x1, y1) = (to.0 as i64, to.1 as i64);
        let (w, h) = (self.img.width() as i64, self.img.height() as i64);
        let inside = |x: i64, y: i64| x >= 0 && y >= 0 && x < w && y < h;
        if inside(x0, y0) && inside(x1, y1) {
            return Some((x0, y0, x1, y1));
        }

        let (fx, fy) = (x0 as f64, y0 as f64);
        let (dx, dy) = ((x1 - x0) as f64, (y1 - y0) as f64);
        let (xmax, ymax) = ((w - 1) as f64, (h - 1) as f64);
        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        for (p, q) in [(-dx, fx), (dx, xmax - fx), (-dy, fy), (dy, ymax - fy)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        let at = |t: f64| ((fx + t * dx).round() as i64, (fy + t * dy).round() as i64);
        let (cx0, cy0) = if t0 > 0.0 { at(t0) } else { (x0, y0) };
        let (cx1, cy1) = if t1 < 1.0 { at(t1) } else { (x1, y1) };
        Some((cx0, cy0, cx1, cy1))
    }

    /// Filled ellipse inscribed in the inclusive box `a`..`b`.
    pub fn fill_ellipse(&mut self, a: (i32, i32), b: (i32, i32), color: Rgb) {
        let (x0, x1) = (a.0.min(b.0) as i64, a.0.max(b.0) as i64);
        let (y0, y1) = (a.1.min(b.1) as i64, a.1.max(b.1) as i64);
        let rx = (x1 - x0 + 1) as f64 / 2.0;
        let ry = (y1 - y0 + 1) as f64 / 2.0;
        let cx = x0 as f64 + rx;
        let cy = y0 as f64 + ry;
        let Some((ys, ye)) = Self::clamp_span(y0, y1, self.img.height()) else {
            return;
        };
        let Some((xs, xe)) = Self::clamp_span(x0, x1, self.img.width()) else {
            return;
        };
        for y in ys..=ye {
            for x in xs..=xe {
                let nx = (x as f64 + 0.5 - cx) / rx;
                let ny = (y as f64 + 0.5 - cy) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.plot(x, y, color);
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`).
    ///
    /// All glyphs are resolved before any pixel is written, so a failure
    /// leaves the canvas unchanged.
    pub fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Rgb,
        glyphs: &dyn GlyphSource,
    ) -> Result<()> {
        let resolved = text
            .chars()
            .map(|c| glyphs.glyph(c))
            .collect::<Result<Vec<Glyph>>>()?;
        let scale = glyphs.scale().clamp(1, MAX_SCALE) as i64;
        let advance = glyphs.advance() as i64;
        let (x, y) = (x as i64, y as i64);

        for (i, glyph) in resolved.iter().enumerate() {
            let gx = x + i as i64 * advance;
            for row in 0..GLYPH_HEIGHT {
                for col in 0..GLYPH_WIDTH {
                    if !glyph.is_set(col, row) {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            self.plot(gx + col as i64 * scale + sx, y + row as i64 * scale + sy, color);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn execute(&mut self, cmd: &PaintCommand, glyphs: &dyn GlyphSource) -> Result<()> {
        match cmd {
            PaintCommand::FillPolygon { points, color } => self.fill_polygon(points, *color),
            PaintCommand::StrokePolygon { points, color } => self.stroke_polygon(points, *color),
            PaintCommand::FillEllipse { top_left, bottom_right, color } => {
                self.fill_ellipse(*top_left, *bottom_right, *color)
            }
            PaintCommand::Text { x, y, text, color } => {
                self.draw_text(*x, *y, text, *color, glyphs)?
            }
        }
        Ok(())
    }

    /// Encode as 8-bit RGB PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf).write_image(
            self.img.as_raw(),
            self.img.width(),
            self.img.height(),
            ColorType::Rgb8,
        )?;
        Ok(buf)
    }
}

/// Paint `scene` onto a fresh canvas. Shape commands are mandatory; a text
/// command that fails is logged and reported in `skipped_labels`.
pub fn paint_scene(scene: &Scene, glyphs: &dyn GlyphSource) -> Result<(Canvas, Vec<String>)> {
    scene.validate()?;
    let mut canvas = Canvas::new(scene.width, scene.height, scene.background);
    let mut skipped = Vec::new();

    for cmd in build_display_list(scene) {
        match canvas.execute(&cmd, glyphs) {
            Ok(()) => {}
            Err(e) if cmd.is_best_effort() => {
                if let PaintCommand::Text { text, .. } = &cmd {
                    warn!("Skipping label {:?}: {}", text, e);
                    skipped.push(text.clone());
                }
            }
            Err(e) => return Err(e),
        }
    }
    debug!(
        "Painted {}x{} canvas ({} labels skipped)",
        canvas.width(),
        canvas.height(),
        skipped.len()
    );
    Ok((canvas, skipped))
}

/// Paint and encode in one step.
pub fn rasterize(scene: &Scene, glyphs: &dyn GlyphSource) -> Result<RenderedMap> {
    let (canvas, skipped_labels) = paint_scene(scene, glyphs)?;
    let png_data = canvas.encode_png()?;
    Ok(RenderedMap {
        width: canvas.width(),
        height: canvas.height(),
        png_data,
        skipped_labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::font::{BitmapFont, MissingFont};

    const BG: Rgb = Rgb(1, 2, 3);
    const INK: Rgb = Rgb(200, 100, 50);

    #[test]
    fn new_canvas_is_uniform() {
        let c = Canvas::new(8, 4, BG);
        assert_eq!((c.width(), c.height()), (8, 4));
        assert!(c.image().pixels().all(|p| p.0 == [1, 2, 3]));
    }

    #[test]
    fn polygon_fill_covers_interior_only() {
        let mut c = Canvas::new(20, 20, BG);
        c.fill_polygon(&[(2, 2), (12, 2), (12, 12), (2, 12)], INK);
        assert_eq!(c.pixel(5, 5), INK);
        assert_eq!(c.pixel(2, 2), INK);
        assert_eq!(c.pixel(11, 11), INK);
        assert_eq!(c.pixel(12, 12), BG);
        assert_eq!(c.pixel(15, 5), BG);
        assert_eq!(c.pixel(0, 0), BG);
    }

    #[test]
    fn polygon_is_clipped_to_canvas() {
        let mut c = Canvas::new(10, 10, BG);
        c.fill_polygon(&[(-20, -20), (40, -20), (40, 40), (-20, 40)], INK);
        assert!(c.image().pixels().all(|p| p.0 == [200, 100, 50]));
    }

    #[test]
    fn outline_hits_every_vertex() {
        let mut c = Canvas::new(20, 20, BG);
        let pts = [(1, 1), (15, 3), (9, 17)];
        c.stroke_polygon(&pts, INK);
        for (x, y) in pts {
            assert_eq!(c.pixel(x as u32, y as u32), INK);
        }
        assert_eq!(c.pixel(10, 8), BG);
    }

    #[test]
    fn ellipse_fills_center_not_corners() {
        let mut c = Canvas::new(30, 30, BG);
        c.fill_ellipse((10, 10), (19, 19), INK);
        assert_eq!(c.pixel(14, 14), INK);
        assert_eq!(c.pixel(10, 14), INK);
        assert_eq!(c.pixel(10, 10), BG);
        assert_eq!(c.pixel(19, 19), BG);
        assert_eq!(c.pixel(20, 14), BG);
    }

    #[test]
    fn text_renders_glyph_pixels() {
        let mut c = Canvas::new(20, 10, BG);
        c.draw_text(1, 1, "L", INK, &BitmapFont::new()).unwrap();
        assert_eq!(c.pixel(1, 1), INK);
        assert_eq!(c.pixel(5, 7), INK);
        assert_eq!(c.pixel(5, 1), BG);
    }

    struct HugeScale;

    impl GlyphSource for HugeScale {
        fn glyph(&self, c: char) -> Result<Glyph> {
            BitmapFont::new().glyph(c)
        }

        fn scale(&self) -> u32 {
            u32::MAX
        }
    }

    #[test]
    fn runaway_glyph_scale_is_capped() {
        assert_eq!(HugeScale.advance(), u32::MAX);
        let mut c = Canvas::new(8, 8, BG);
        c.draw_text(i32::MAX, i32::MAX, "LL", INK, &HugeScale).unwrap();
        c.draw_text(0, 0, "L", INK, &HugeScale).unwrap();
        assert_eq!(c.pixel(0, 0), INK);
        assert_eq!(c.pixel(7, 7), INK);
    }

    #[test]
    fn failed_text_leaves_canvas_untouched() {
        let mut c = Canvas::new(40, 10, BG);
        let err = c.draw_text(0, 0, "AB\u{2603}", INK, &BitmapFont::new());
        assert!(err.is_err());
        assert!(c.image().pixels().all(|p| p.0 == [1, 2, 3]));
    }

    #[test]
    fn missing_font_skips_labels_but_keeps_shapes() {
        let scene = Scene::mauritius();
        let (canvas, skipped) = paint_scene(&scene, &MissingFont).unwrap();
        assert_eq!(skipped, vec!["Port Louis".to_string(), "MAURITIUS".to_string()]);
        assert_eq!(canvas.pixel(170, 130), scene.island.fill);
        let (mx, my) = scene.marker.center();
        assert_eq!(canvas.pixel(mx as u32, my as u32), scene.marker.fill);
        assert_eq!(canvas.pixel(0, 0), scene.background);
    }

    #[test]
    fn extreme_line_is_clipped_without_overflow() {
        let mut c = Canvas::new(16, 8, BG);
        c.line((i32::MIN, 3), (i32::MAX, 3), INK);
        assert!((0..16).all(|x| c.pixel(x, 3) == INK));
        assert_eq!(c.pixel(0, 2), BG);

        c.line((i32::MIN, i32::MIN), (-1, -1), INK);
        c.line((i32::MAX, 0), (i32::MAX, 7), INK);
        assert!((0..16).all(|x| c.pixel(x, 0) == BG));
    }

    #[test]
    fn partially_visible_line_keeps_onscreen_endpoint() {
        let mut c = Canvas::new(10, 10, BG);
        c.line((5, 5), (5, 1_000_000), INK);
        assert!((5..10).all(|y| c.pixel(5, y) == INK));
        assert_eq!(c.pixel(5, 4), BG);
    }

    #[test]
    fn huge_shapes_are_clamped_to_canvas() {
        let mut scene = Scene::mauritius();
        scene.island.points = vec![(i32::MIN, 0), (i32::MAX, 0), (0, i32::MAX)];
        scene.marker.top_left = (-20_000, -20_000);
        scene.marker.bottom_right = (20_000, 20_000);

        let started = std::time::Instant::now();
        let (canvas, _) = paint_scene(&scene, &BitmapFont::new()).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
        // the marker box covers the whole canvas, so its ellipse does too
        assert_eq!(canvas.pixel(200, 150), scene.marker.fill);
        assert_eq!(canvas.pixel(0, 0), scene.marker.fill);
    }

    #[test]
    fn encoded_png_has_signature() {
        let png = Canvas::new(4, 4, BG).encode_png().unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    }
}

use anyhow::{Context, Result};
use png::{BitDepth, ColorType};
use std::{fs, path::Path};

use super::font::{compose, glyph, text_width, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);

    pub const fn hex(v: u32) -> Rgb {
        Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// An RGB raster. Drawing outside the bounds is clipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&[background.0, background.1, background.2]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 3) as usize;
        Some(Rgb(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    pub fn set(&mut self, x: i64, y: i64, c: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = ((y as u32 * self.width + x as u32) * 3) as usize;
        self.pixels[i] = c.0;
        self.pixels[i + 1] = c.1;
        self.pixels[i + 2] = c.2;
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, c: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i64);
        let y1 = (y + h).min(self.height as i64);
        for yy in y0..y1 {
            for xx in x0..x1 {
                self.set(xx, yy, c);
            }
        }
    }

    pub fn hline(&mut self, x0: i64, x1: i64, y: i64, c: Rgb) {
        self.fill_rect(x0.min(x1), y, (x1 - x0).abs() + 1, 1, c);
    }

    pub fn vline(&mut self, x: i64, y0: i64, y1: i64, c: Rgb) {
        self.fill_rect(x, y0.min(y1), 1, (y1 - y0).abs() + 1, c);
    }

    /// Fill a circular sector. Angles are degrees, counter-clockwise from
    /// the positive x axis (screen y points down, so "up" is 90°).
    pub fn fill_wedge(&mut self, cx: f64, cy: f64, r: f64, start_deg: f64, sweep_deg: f64, c: Rgb) {
        if sweep_deg <= 0.0 || r <= 0.0 {
            return;
        }
        let full = sweep_deg >= 360.0;
        let x0 = (cx - r).floor() as i64;
        let x1 = (cx + r).ceil() as i64;
        let y0 = (cy - r).floor() as i64;
        let y1 = (cy + r).ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = cy - (y as f64 + 0.5);
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                if !full {
                    let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);
                    if (angle - start_deg).rem_euclid(360.0) >= sweep_deg {
                        continue;
                    }
                }
                self.set(x, y, c);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, c: Rgb) {
        self.fill_wedge(cx, cy, r, 0.0, 360.0, c);
    }

    /// Width `text` occupies at `scale`.
    pub fn measure(text: &str, scale: u32) -> u32 {
        text_width(text, scale)
    }

    /// Horizontal text; `y` is the top edge, `x` the anchor given by `align`.
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, scale: u32, align: Align, c: Rgb) {
        let text = compose(text);
        let w = text_width(&text, scale) as i64;
        let left = match align {
            Align::Left => x,
            Align::Center => x - w / 2,
            Align::Right => x - w,
        };
        let s = scale as i64;
        for (i, ch) in text.chars().enumerate() {
            let origin = left + i as i64 * ADVANCE as i64 * s;
            for (gy, bits) in glyph(ch).iter().enumerate() {
                for gx in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - gx)) != 0 {
                        self.fill_rect(origin + gx as i64 * s, y + gy as i64 * s, s, s, c);
                    }
                }
            }
        }
    }

    /// Text rotated a quarter turn, read bottom to top. `x` is the left
    /// edge of the rotated block and `y` the bottom, where the text starts.
    pub fn draw_text_up(&mut self, x: i64, y: i64, text: &str, scale: u32, c: Rgb) {
        let text = compose(text);
        let s = scale as i64;
        for (i, ch) in text.chars().enumerate() {
            let advance = i as i64 * ADVANCE as i64;
            for (gy, bits) in glyph(ch).iter().enumerate() {
                for gx in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - gx)) != 0 {
                        let along = advance + gx as i64;
                        self.fill_rect(x + gy as i64 * s, y - (along + 1) * s, s, s, c);
                    }
                }
            }
        }
    }

    /// Height of one text line at `scale`.
    pub fn line_height(scale: u32) -> u32 {
        GLYPH_HEIGHT * scale
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(ColorType::Rgb);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().context("png encode header failed")?;
            writer
                .write_image_data(&self.pixels)
                .context("png encode data failed")?;
            writer.finish().context("png finish failed")?;
        }
        Ok(out)
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.encode_png()?;
        fs::write(path, bytes).with_context(|| format!("writing image {:?}", path))
    }
}

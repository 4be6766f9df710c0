//! Raster drawing primitives on top of `image::RgbImage`.

use super::font::{self, ADVANCE, GLYPH_HEIGHT};
use crate::error::VizResult;
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const GRID: Rgb<u8> = Rgb([221, 221, 221]);
pub const SKY_BLUE: Rgb<u8> = Rgb([135, 206, 235]);
pub const GREEN: Rgb<u8> = Rgb([0, 128, 0]);

/// Where text sits relative to its anchor point, along the text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

/// How a piece of text is drawn.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub scale: u32,
    /// Radians, clockwise in screen space. `0.0` reads left to right,
    /// `-FRAC_PI_2` reads bottom to top.
    pub angle: f64,
    pub align: Align,
    pub color: Rgb<u8>,
}

impl TextStyle {
    #[must_use]
    pub fn new(scale: u32, align: Align) -> Self {
        Self {
            scale,
            angle: 0.0,
            align,
            color: BLACK,
        }
    }

    #[must_use]
    pub fn rotated(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }
}

pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: ImageBuffer::from_pixel(width, height, WHITE),
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && x < i64::from(self.width()) && y < i64::from(self.height()) {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Fill the rectangle spanning two corners, in any order.
    pub fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb<u8>) {
        let (max_x, max_y) = (i64::from(self.width()) - 1, i64::from(self.height()) - 1);
        let left = (x0.min(x1).round() as i64).max(0);
        let right = (x0.max(x1).round() as i64).min(max_x);
        let top = (y0.min(y1).round() as i64).max(0);
        let bottom = (y0.max(y1).round() as i64).min(max_y);
        for y in top..=bottom {
            for x in left..=right {
                self.put(x, y, color);
            }
        }
    }

    pub fn stroke_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb<u8>) {
        self.line(x0, y0, x1, y0, color, 1);
        self.line(x1, y0, x1, y1, color, 1);
        self.line(x1, y1, x0, y1, color, 1);
        self.line(x0, y1, x0, y0, color, 1);
    }

    /// Bresenham line with a square brush `thickness` pixels wide.
    pub fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb<u8>, thickness: u32) {
        let (mut x, mut y) = (x0.round() as i64, y0.round() as i64);
        let (x_end, y_end) = (x1.round() as i64, y1.round() as i64);
        let dx = (x_end - x).abs();
        let dy = -(y_end - y).abs();
        let sx = if x < x_end { 1 } else { -1 };
        let sy = if y < y_end { 1 } else { -1 };
        let mut err = dx + dy;
        let half = i64::from(thickness.max(1) - 1) / 2;
        let extent = i64::from(thickness.max(1));

        loop {
            for by in 0..extent {
                for bx in 0..extent {
                    self.put(x - half + bx, y - half + by, color);
                }
            }
            if x == x_end && y == y_end {
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

    pub fn disc(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb<u8>) {
        let r = radius.ceil() as i64;
        let (cx_i, cy_i) = (cx.round() as i64, cy.round() as i64);
        for dy in -r..=r {
            for dx in -r..=r {
                if (dx * dx + dy * dy) as f64 <= radius * radius {
                    self.put(cx_i + dx, cy_i + dy, color);
                }
            }
        }
    }

    /// Pixel length of `text` drawn at `scale`.
    #[must_use]
    pub fn text_width(text: &str, scale: u32) -> f64 {
        let chars = font::transliterate(text).chars().count() as u32;
        f64::from((chars * ADVANCE).saturating_sub(1) * scale)
    }

    /// Draw text at `(x, y)`, vertically centred on the anchor.
    pub fn text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
        let glyphs = font::transliterate(text);
        let (sin, cos) = style.angle.sin_cos();
        let s = f64::from(style.scale);
        let width = Self::text_width(text, style.scale);
        let shift = match style.align {
            Align::Start => 0.0,
            Align::Center => width / 2.0,
            Align::End => width,
        };
        let half_height = f64::from(GLYPH_HEIGHT) * s / 2.0;

        // Origin of the glyph grid (top-left of the first character).
        let ox = x - shift * cos + half_height * sin;
        let oy = y - shift * sin - half_height * cos;
        // Rotated glyph cells leave gaps unless the brush is a bit wider.
        let brush = if style.angle.abs() < f64::EPSILON {
            style.scale
        } else {
            style.scale + 1
        };

        for (index, c) in glyphs.chars().enumerate() {
            let rows = font::glyph(c);
            let base = index as u32 * ADVANCE;
            for row in 0..GLYPH_HEIGHT {
                for col in 0..ADVANCE {
                    if !font::is_set(rows, col, row) {
                        continue;
                    }
                    let u = f64::from(base + col) * s;
                    let v = f64::from(row) * s;
                    let px = ox + u * cos - v * sin;
                    let py = oy + u * sin + v * cos;
                    for by in 0..brush {
                        for bx in 0..brush {
                            self.put(
                                px.round() as i64 + i64::from(bx),
                                py.round() as i64 + i64::from(by),
                                style.color,
                            );
                        }
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbImage) -> VizResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

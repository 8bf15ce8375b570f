//! Software frame buffer: packed `0xAARRGGBB` pixels plus the handful of
//! primitives the visualizer needs.
//!
//! Letters are painted through [`GlyphCanvas`]: the 5×7 font is scaled so
//! the glyph is `size` pixels tall, an outline of `stroke_weight` pixels is
//! laid around the inked cells, and both colours are alpha-blended once per
//! pixel.

use glam::Vec2;
use letter_burst::{GlyphCanvas, GlyphStyle, Rgba};

use crate::font::{is_set, GLYPH_H, GLYPH_W};

pub struct FrameBuffer {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, color: u32) -> Self {
        FrameBuffer { width, height, pixels: vec![color; width * height] }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn pixels(&self) -> &[u32] { &self.pixels }

    pub fn clear(&mut self, color: u32) { self.pixels.fill(color); }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 { return None; }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Source-over blend of `color` onto one pixel.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if color.a == 0 { return; }
        let Some(i) = self.index(x, y) else { return };
        self.pixels[i] = blend(self.pixels[i], color);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        for row in y.max(0)..(y + h).min(self.height as i32) {
            for col in x.max(0)..(x + w).min(self.width as i32) {
                self.pixels[row as usize * self.width + col as usize] = color;
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, r: f32, color: Rgba) {
        let (x0, x1) = ((center.x - r).floor() as i32, (center.x + r).ceil() as i32);
        let (y0, y1) = ((center.y - r).floor() as i32, (center.y + r).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if p.distance_squared(center) <= r * r {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Bresenham line, endpoints included.
    pub fn draw_line(&mut self, a: Vec2, b: Vec2, color: u32) {
        let (mut x, mut y) = (a.x.round() as i32, a.y.round() as i32);
        let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);
        let dx =  (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// Unstyled text, top-left anchored, `scale` pixels per font cell.
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: i32, color: u32) {
        let advance = (GLYPH_W as i32 + 1) * scale;
        for (n, ch) in text.chars().enumerate() {
            let gx = x + n as i32 * advance;
            if gx >= self.width as i32 { break; }
            for row in 0..GLYPH_H as i32 {
                for col in 0..GLYPH_W as i32 {
                    if is_set(ch, col, row) {
                        self.fill_rect(gx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
        }
    }
}

impl GlyphCanvas for FrameBuffer {
    fn draw_glyph(&mut self, glyph: char, center: Vec2, size: f32, style: &GlyphStyle) {
        if size <= 0.0 || (style.fill.a == 0 && style.stroke.a == 0) { return; }

        let cell   = size / GLYPH_H as f32;
        let half   = Vec2::new(GLYPH_W as f32, GLYPH_H as f32) * cell * 0.5;
        let origin = center - half;
        let sw     = style.stroke_weight.max(0.0);

        let x0 = (origin.x - sw).floor() as i32;
        let y0 = (origin.y - sw).floor() as i32;
        let x1 = (center.x + half.x + sw).ceil() as i32;
        let y1 = (center.y + half.y + sw).ceil() as i32;

        // Clip to the buffer before walking pixels.
        let (x0, y0) = (x0.max(0), y0.max(0));
        let (x1, y1) = (x1.min(self.width as i32), y1.min(self.height as i32));

        let inked = |p: Vec2| -> bool {
            let g = (p - origin) / cell;
            is_set(glyph, g.x.floor() as i32, g.y.floor() as i32)
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let color = if inked(p) {
                    style.fill
                } else if sw > 0.0 && STROKE_PROBES.iter().any(|&(dx, dy)| inked(p + Vec2::new(dx, dy) * sw)) {
                    style.stroke
                } else {
                    continue;
                };
                self.blend_pixel(x, y, color);
            }
        }
    }
}

/// Directions sampled to decide whether a pixel lies on the outline.
const STROKE_PROBES: [(f32, f32); 8] = [
    (-1.0, -1.0), (0.0, -1.0), (1.0, -1.0),
    (-1.0,  0.0),              (1.0,  0.0),
    (-1.0,  1.0), (0.0,  1.0), (1.0,  1.0),
];

/// Blend `src` over an opaque ARGB pixel.
pub fn blend(dst: u32, src: Rgba) -> u32 {
    let a   = src.a as u32;
    let inv = 255 - a;
    let mix = |s: u8, shift: u32| ((s as u32 * a + ((dst >> shift) & 0xFF) * inv + 127) / 255) << shift;
    0xFF00_0000 | mix(src.r, 16) | mix(src.g, 8) | mix(src.b, 0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

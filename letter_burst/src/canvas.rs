//! Drawing seam between the particle system and whatever paints pixels.
//!
//! The particle system only knows how to describe a glyph; the window
//! backend (or a test recorder) decides how it lands on screen.

use glam::Vec2;

// ════════════════════════════════════════════════════════════════════════════
// Rgba / GlyphStyle
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    /// Same colour with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Rgba { a, ..self }
    }

    /// Packed `0xAARRGGBB`.
    pub fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Letter fill: a warm red.
pub const LETTER_FILL:   Rgba = Rgba::new(255, 100, 100, 255);
/// Letter outline.
pub const LETTER_STROKE: Rgba = Rgba::new(255, 255, 255, 255);
/// Outline thickness in pixels.
pub const LETTER_STROKE_WEIGHT: f32 = 2.0;

/// How one glyph should be painted.  Alpha on both colours already carries
/// the letter's opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphStyle {
    pub fill:          Rgba,
    pub stroke:        Rgba,
    pub stroke_weight: f32,
}

impl GlyphStyle {
    /// The letter style at a given opacity.
    pub fn letter(alpha: u8) -> Self {
        GlyphStyle {
            fill:          LETTER_FILL.with_alpha(alpha),
            stroke:        LETTER_STROKE.with_alpha(alpha),
            stroke_weight: LETTER_STROKE_WEIGHT,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GlyphCanvas
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can paint a text glyph centred on a point.
pub trait GlyphCanvas {
    /// `size` is the glyph height in pixels.
    fn draw_glyph(&mut self, glyph: char, center: Vec2, size: f32, style: &GlyphStyle);
}

/// One recorded `draw_glyph` call.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphDraw {
    pub glyph:  char,
    pub center: Vec2,
    pub size:   f32,
    pub style:  GlyphStyle,
}

/// Canvas that paints nothing and remembers every call.  Used by the
/// headless demo and by tests.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub draws: Vec<GlyphDraw>,
}

impl RecordingCanvas {
    pub fn clear(&mut self) { self.draws.clear(); }
}

impl GlyphCanvas for RecordingCanvas {
    fn draw_glyph(&mut self, glyph: char, center: Vec2, size: f32, style: &GlyphStyle) {
        self.draws.push(GlyphDraw { glyph, center, size, style: *style });
    }
}

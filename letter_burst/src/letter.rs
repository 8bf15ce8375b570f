//! A single letter particle.

use glam::Vec2;

/// Opacity a letter starts with.
pub const FULL_OPACITY: i32 = 255;

/// Stable handle for a letter inside a [`LetterSystem`](crate::LetterSystem).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LetterId(pub u64);

/// One falling (or still growing) glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct Letter {
    pub id:       LetterId,
    /// Uppercase A–Z.
    pub glyph:    char,
    pub position: Vec2,
    /// Pixels per frame.
    pub velocity: Vec2,
    /// Glyph height in pixels.
    pub size:     f32,
    /// 0–255 while alive; the letter is culled once this reaches 0.
    pub opacity:  i32,
    /// Spawn time in ms.
    pub start_ms: f64,
}

impl Letter {
    /// Euler step: move, then accelerate, then fade.
    pub fn step(&mut self, gravity: f32, fade: i32) {
        self.position += self.velocity;
        self.velocity.y += gravity;
        self.opacity -= fade;
    }

    pub fn is_faded(&self) -> bool { self.opacity <= 0 }

    /// Below `floor_y` (frame height plus margin).
    pub fn is_below(&self, floor_y: f32) -> bool { self.position.y > floor_y }

    /// Opacity clamped into a colour alpha.
    pub fn alpha(&self) -> u8 {
        self.opacity.clamp(0, 255) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn letter(velocity: Vec2) -> Letter {
        Letter {
            id: LetterId(0),
            glyph: 'A',
            position: Vec2::new(100.0, 100.0),
            velocity,
            size: 24.0,
            opacity: FULL_OPACITY,
            start_ms: 0.0,
        }
    }

    #[test]
    fn step_moves_before_accelerating() {
        let mut l = letter(Vec2::new(1.0, 2.0));
        l.step(0.2, 1);
        assert_eq!(l.position, Vec2::new(101.0, 102.0));
        assert!((l.velocity.y - 2.2).abs() < 1e-6);
        assert_eq!(l.velocity.x, 1.0);
        assert_eq!(l.opacity, 254);
    }

    #[test]
    fn alpha_clamps() {
        let mut l = letter(Vec2::ZERO);
        l.opacity = -3;
        assert_eq!(l.alpha(), 0);
        l.opacity = 300;
        assert_eq!(l.alpha(), 255);
    }

    #[test]
    fn faded_at_zero_not_before() {
        let mut l = letter(Vec2::ZERO);
        l.opacity = 1;
        assert!(!l.is_faded());
        l.step(0.0, 1);
        assert!(l.is_faded());
    }

    proptest! {
        #[test]
        fn gravity_accumulates_linearly(v0 in 2.0f32..5.0, n in 0usize..300) {
            let mut l = letter(Vec2::new(0.0, v0));
            let mut last_vy = l.velocity.y;
            for _ in 0..n {
                l.step(0.2, 1);
                prop_assert!(l.velocity.y >= last_vy);
                last_vy = l.velocity.y;
            }
            let expected = v0 + 0.2 * n as f32;
            prop_assert!((l.velocity.y - expected).abs() < 1e-2);
        }

        #[test]
        fn opacity_never_increases(n in 0usize..400) {
            let mut l = letter(Vec2::ZERO);
            let mut last = l.opacity;
            for _ in 0..n {
                l.step(0.2, 1);
                prop_assert!(l.opacity <= last);
                last = l.opacity;
            }
            prop_assert_eq!(l.opacity, FULL_OPACITY - n as i32);
        }
    }
}

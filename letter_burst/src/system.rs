//! The letter particle system.
//!
//! `LetterSystem` owns every live letter plus a single "current" slot: the
//! letter that follows the mouth and grows while it stays open.  Each frame
//! it first reacts to the tracker's [`MouthFrame`] and then advances the
//! physics of every letter, current one included.
//!
//! ```text
//!   Idle ──opened──▶ Growing ──closed──▶ Idle
//!                     │   ▲
//!                     └───┘ still open: snap to mouth, grow
//! ```
//!
//! Growth is driven by wall-clock milliseconds since the mouth opened,
//! whereas gravity and fading advance by a fixed amount per frame.

use glam::Vec2;
use log::{debug, trace};
use rand::Rng;

use mouth_tracker::MouthFrame;

use crate::canvas::{GlyphCanvas, GlyphStyle};
use crate::letter::{Letter, LetterId, FULL_OPACITY};

// ════════════════════════════════════════════════════════════════════════════
// LetterConfig
// ════════════════════════════════════════════════════════════════════════════

/// Frame height of the reference capture.
pub const FRAME_HEIGHT: f32 = 480.0;

/// Physics and spawn constants.
#[derive(Clone, Debug, PartialEq)]
pub struct LetterConfig {
    /// Glyph height at spawn.
    pub base_size:     f32,
    /// Size gained per millisecond the mouth stays open.
    pub growth_per_ms: f64,
    pub spawn_vx:      (f32, f32),
    pub spawn_vy:      (f32, f32),
    pub release_vx:    (f32, f32),
    pub release_vy:    (f32, f32),
    /// Added to `velocity.y` every frame.
    pub gravity:       f32,
    /// Subtracted from opacity every frame.
    pub fade:          i32,
    pub frame_height:  f32,
    /// How far below the frame a letter may fall before it is dropped.
    pub cull_margin:   f32,
}

impl Default for LetterConfig {
    fn default() -> Self {
        LetterConfig {
            base_size:     24.0,
            growth_per_ms: 0.1,
            spawn_vx:      (-2.0, 2.0),
            spawn_vy:      (1.0, 3.0),
            release_vx:    (-3.0, 3.0),
            release_vy:    (2.0, 5.0),
            gravity:       0.2,
            fade:          1,
            frame_height:  FRAME_HEIGHT,
            cull_margin:   100.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameReport
// ════════════════════════════════════════════════════════════════════════════

/// What changed during one [`LetterSystem::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub spawned:  Option<LetterId>,
    pub released: Option<LetterId>,
    /// Letters dropped this frame (faded out or fell off the bottom).
    pub culled:   usize,
}

// ════════════════════════════════════════════════════════════════════════════
// LetterSystem
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct LetterSystem {
    letters: Vec<Letter>,
    current: Option<LetterId>,
    next_id: u64,
    config:  LetterConfig,
}

impl Default for LetterSystem {
    fn default() -> Self { Self::new(LetterConfig::default()) }
}

impl LetterSystem {
    pub fn new(config: LetterConfig) -> Self {
        LetterSystem { letters: Vec::new(), current: None, next_id: 0, config }
    }

    pub fn config(&self) -> &LetterConfig { &self.config }

    pub fn letters(&self) -> &[Letter] { &self.letters }

    pub fn len(&self) -> usize { self.letters.len() }

    pub fn is_empty(&self) -> bool { self.letters.is_empty() }

    pub fn current_id(&self) -> Option<LetterId> { self.current }

    /// The letter currently following the mouth.
    pub fn current(&self) -> Option<&Letter> {
        let id = self.current?;
        self.letters.iter().find(|l| l.id == id)
    }

    pub fn get(&self, id: LetterId) -> Option<&Letter> {
        self.letters.iter().find(|l| l.id == id)
    }

    fn current_mut(&mut self) -> Option<&mut Letter> {
        let id = self.current?;
        self.letters.iter_mut().find(|l| l.id == id)
    }

    // ── per-frame entry point ─────────────────────────────────────────────

    /// React to the mouth, then advance physics for every letter.
    ///
    /// `mouth` is `None` on frames without usable landmarks: the current
    /// letter is neither moved nor grown, but still falls and fades.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        mouth:  Option<&MouthFrame>,
        now_ms: f64,
        rng:    &mut R,
    ) -> FrameReport {
        let mut report = match mouth {
            Some(m) => self.react(m, now_ms, rng),
            None    => FrameReport::default(),
        };
        report.culled = self.step();
        trace!("{} letters live, current={:?}", self.letters.len(), self.current);
        report
    }

    /// Drive the current-letter state machine from one mouth reading.
    pub fn react<R: Rng + ?Sized>(
        &mut self,
        mouth:  &MouthFrame,
        now_ms: f64,
        rng:    &mut R,
    ) -> FrameReport {
        let mut report = FrameReport::default();

        if mouth.opened {
            report.spawned = Some(self.spawn(mouth.midpoint, now_ms, rng));
        } else if mouth.is_open {
            let grown = self.config.base_size
                + (mouth.open_for_ms * self.config.growth_per_ms) as f32;
            if let Some(cur) = self.current_mut() {
                cur.size     = grown;
                cur.position = mouth.midpoint;
            }
        } else {
            if mouth.closed {
                report.released = self.release(rng);
            }
            self.current = None;
        }

        report
    }

    /// Create a letter at `at` and make it current.
    fn spawn<R: Rng + ?Sized>(&mut self, at: Vec2, now_ms: f64, rng: &mut R) -> LetterId {
        let id = LetterId(self.next_id);
        self.next_id += 1;

        let glyph = char::from(b'A' + rng.random_range(0..26u8));
        let velocity = Vec2::new(
            uniform(rng, self.config.spawn_vx),
            uniform(rng, self.config.spawn_vy),
        );

        self.letters.push(Letter {
            id,
            glyph,
            position: at,
            velocity,
            size:     self.config.base_size,
            opacity:  FULL_OPACITY,
            start_ms: now_ms,
        });
        self.current = Some(id);
        debug!("spawned {:?} '{}' at ({:.0}, {:.0})", id, glyph, at.x, at.y);
        id
    }

    /// Give the current letter a fresh launch velocity.
    fn release<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<LetterId> {
        let (rx, ry) = (self.config.release_vx, self.config.release_vy);
        let cur = self.current_mut()?;
        cur.velocity = Vec2::new(uniform(rng, rx), uniform(rng, ry));
        debug!(
            "released {:?} '{}' size {:.0} vel ({:.2}, {:.2})",
            cur.id, cur.glyph, cur.size, cur.velocity.x, cur.velocity.y
        );
        Some(cur.id)
    }

    /// Advance every letter one frame and drop the dead ones.  Returns how
    /// many were dropped.
    pub fn step(&mut self) -> usize {
        let LetterConfig { gravity, fade, frame_height, cull_margin, .. } = self.config;
        let floor_y = frame_height + cull_margin;

        for l in &mut self.letters {
            l.step(gravity, fade);
        }

        let before = self.letters.len();
        self.letters.retain(|l| !(l.is_below(floor_y) || l.is_faded()));

        if let Some(id) = self.current {
            if !self.letters.iter().any(|l| l.id == id) {
                self.current = None;
            }
        }

        before - self.letters.len()
    }

    /// Paint every live letter, oldest first.
    pub fn draw(&self, canvas: &mut dyn GlyphCanvas) {
        for l in &self.letters {
            canvas.draw_glyph(l.glyph, l.position, l.size, &GlyphStyle::letter(l.alpha()));
        }
    }
}

/// Uniform sample from the half-open range `[lo, hi)`.
fn uniform<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    rng.random_range(lo..hi)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use mouth_tracker::{Face, MouthTracker};
    use rand::{rngs::StdRng, SeedableRng};

    const MOUTH: Vec2 = Vec2::new(320.0, 300.0);

    fn rng() -> StdRng { StdRng::seed_from_u64(0x5eed) }

    fn face(gap: f32) -> Face {
        Face::with_lips(MOUTH - Vec2::new(0.0, gap / 2.0), MOUTH + Vec2::new(0.0, gap / 2.0))
    }

    fn mouth(is_open: bool, opened: bool, closed: bool, open_for_ms: f64) -> MouthFrame {
        MouthFrame {
            distance: if is_open { 30.0 } else { 2.0 },
            is_open,
            opened,
            closed,
            midpoint: MOUTH,
            open_for_ms,
        }
    }

    /// A system whose floor is far enough away that only fading culls.
    fn tall() -> LetterSystem {
        LetterSystem::new(LetterConfig { frame_height: 1.0e9, ..LetterConfig::default() })
    }

    #[test]
    fn empty_system_steps_quietly() {
        let mut sys = LetterSystem::default();
        let r = sys.update(None, 0.0, &mut rng());
        assert_eq!(r, FrameReport::default());
        assert!(sys.is_empty());
    }

    #[test]
    fn open_edge_spawns_current_letter() {
        let mut sys = LetterSystem::default();
        let r = sys.react(&mouth(true, true, false, 0.0), 500.0, &mut rng());
        let id = r.spawned.unwrap();
        assert_eq!(sys.current_id(), Some(id));

        let l = sys.current().unwrap();
        assert!(l.glyph.is_ascii_uppercase());
        assert_eq!(l.position, MOUTH);
        assert_eq!(l.size, 24.0);
        assert_eq!(l.opacity, 255);
        assert_eq!(l.start_ms, 500.0);
        assert!((-2.0..2.0).contains(&l.velocity.x));
        assert!((1.0..3.0).contains(&l.velocity.y));
    }

    #[test]
    fn glyphs_cover_the_alphabet_only() {
        let mut sys = tall();
        let mut r = rng();
        for i in 0..200 {
            sys.react(&mouth(true, true, false, 0.0), i as f64, &mut r);
            sys.react(&mouth(false, false, true, 0.0), i as f64, &mut r);
        }
        assert!(sys.letters().iter().all(|l| l.glyph.is_ascii_uppercase()));
        let distinct: std::collections::BTreeSet<char> =
            sys.letters().iter().map(|l| l.glyph).collect();
        assert!(distinct.len() > 20);
    }

    #[test]
    fn held_open_for_one_second_grows_to_124() {
        let mut sys = LetterSystem::default();
        let mut r = rng();
        sys.react(&mouth(true, true, false, 0.0), 0.0, &mut r);
        sys.react(&mouth(true, false, false, 1000.0), 1000.0, &mut r);
        assert!((sys.current().unwrap().size - 124.0).abs() < 1e-3);
    }

    #[test]
    fn growing_letter_follows_mouth() {
        let mut sys = LetterSystem::default();
        let mut r = rng();
        sys.update(Some(&mouth(true, true, false, 0.0)), 0.0, &mut r);
        let mut m = mouth(true, false, false, 16.0);
        m.midpoint = Vec2::new(200.0, 150.0);
        sys.react(&m, 16.0, &mut r);
        assert_eq!(sys.current().unwrap().position, Vec2::new(200.0, 150.0));
    }

    #[test]
    fn close_edge_releases_with_new_velocity() {
        let mut sys = LetterSystem::default();
        let mut r = rng();
        let id = sys.react(&mouth(true, true, false, 0.0), 0.0, &mut r).spawned.unwrap();
        let spawn_vel = sys.get(id).unwrap().velocity;

        let rep = sys.react(&mouth(false, false, true, 0.0), 300.0, &mut r);
        assert_eq!(rep.released, Some(id));
        assert_eq!(sys.current_id(), None);

        let l = sys.get(id).unwrap();
        assert_ne!(l.velocity, spawn_vel);
        assert!((-3.0..3.0).contains(&l.velocity.x));
        assert!((2.0..5.0).contains(&l.velocity.y));
    }

    #[test]
    fn released_letter_keeps_its_size() {
        let mut sys = tall();
        let mut r = rng();
        let id = sys.react(&mouth(true, true, false, 0.0), 0.0, &mut r).spawned.unwrap();
        sys.react(&mouth(true, false, false, 400.0), 400.0, &mut r);
        sys.react(&mouth(false, false, true, 0.0), 420.0, &mut r);
        for _ in 0..10 {
            sys.update(Some(&mouth(false, false, false, 0.0)), 500.0, &mut r);
        }
        assert!((sys.get(id).unwrap().size - 64.0).abs() < 1e-3);
    }

    #[test]
    fn close_without_current_is_harmless() {
        let mut sys = LetterSystem::default();
        let rep = sys.react(&mouth(false, false, true, 0.0), 0.0, &mut rng());
        assert_eq!(rep.released, None);
        assert!(sys.is_empty());
    }

    #[test]
    fn no_mouth_frame_freezes_growth_but_not_physics() {
        let mut sys = tall();
        let mut r = rng();
        sys.update(Some(&mouth(true, true, false, 0.0)), 0.0, &mut r);
        let before = sys.current().unwrap().clone();
        sys.update(None, 5_000.0, &mut r);
        let after = sys.current().unwrap();
        assert_eq!(after.size, before.size);
        assert_eq!(after.position, before.position + before.velocity);
        assert_eq!(after.opacity, before.opacity - 1);
        assert_eq!(sys.current_id(), Some(before.id));
    }

    #[test]
    fn distance_scenario_spawns_once_and_releases_on_frame_five() {
        let mut tracker = MouthTracker::new();
        let mut sys = LetterSystem::default();
        let mut r = rng();

        let mut spawned = Vec::new();
        let mut released = Vec::new();
        for (i, gap) in [5.0, 5.0, 20.0, 20.0, 20.0, 5.0].into_iter().enumerate() {
            let now = i as f64 * 16.0;
            let m = tracker.update(Some(&face(gap)), now);
            let rep = sys.update(m.as_ref(), now, &mut r);
            if rep.spawned.is_some()  { spawned.push(i); }
            if rep.released.is_some() { released.push(i); }
            if (2..5).contains(&i) {
                assert!(sys.current().is_some());
            } else {
                assert!(sys.current().is_none());
            }
        }
        assert_eq!(spawned, [2]);
        assert_eq!(released, [5]);
        assert_eq!(sys.len(), 1);

        // Release velocity plus one frame of gravity.
        let l = &sys.letters()[0];
        assert!((-3.0..3.0).contains(&l.velocity.x));
        assert!(l.velocity.y >= 2.2 - 1e-4 && l.velocity.y < 5.2 + 1e-4);
    }

    #[test]
    fn fades_out_on_frame_255() {
        let mut sys = tall();
        let mut r = rng();
        let id = sys.update(Some(&mouth(true, true, false, 0.0)), 0.0, &mut r).spawned.unwrap();
        sys.update(Some(&mouth(false, false, true, 0.0)), 16.0, &mut r);
        // Two frames so far; 252 more leaves opacity at 1.
        for _ in 0..252 {
            assert_eq!(sys.update(None, 0.0, &mut r).culled, 0);
        }
        assert_eq!(sys.get(id).unwrap().opacity, 1);
        let rep = sys.update(None, 0.0, &mut r);
        assert_eq!(rep.culled, 1);
        assert!(sys.get(id).is_none());
    }

    #[test]
    fn falls_off_the_bottom() {
        let mut sys = LetterSystem::default();
        let mut r = rng();
        let mut m = mouth(true, true, false, 0.0);
        m.midpoint = Vec2::new(320.0, 579.5);
        sys.update(Some(&m), 0.0, &mut r);
        // Spawn vy ≥ 1 takes it past 480 + 100 on the first step.
        assert!(sys.is_empty());
        assert_eq!(sys.current_id(), None);
    }

    #[test]
    fn several_letters_culled_in_one_pass() {
        let mut sys = tall();
        let mut r = rng();
        for i in 0..5 {
            sys.react(&mouth(true, true, false, 0.0), i as f64, &mut r);
            sys.react(&mouth(false, false, true, 0.0), i as f64, &mut r);
        }
        sys.letters[1].opacity = 1;
        sys.letters[2].opacity = 1;
        sys.letters[4].opacity = 1;
        let ids: Vec<LetterId> = sys.letters.iter().map(|l| l.id).collect();

        assert_eq!(sys.step(), 3);
        let left: Vec<LetterId> = sys.letters().iter().map(|l| l.id).collect();
        assert_eq!(left, [ids[0], ids[3]]);
    }

    #[test]
    fn culling_the_current_letter_clears_the_slot() {
        let mut sys = tall();
        let mut r = rng();
        sys.update(Some(&mouth(true, true, false, 0.0)), 0.0, &mut r);
        sys.letters[0].opacity = 1;
        sys.update(Some(&mouth(true, false, false, 16.0)), 16.0, &mut r);
        assert!(sys.is_empty());
        assert_eq!(sys.current_id(), None);
        // Still open: nothing to grow, nothing spawned.
        let rep = sys.update(Some(&mouth(true, false, false, 32.0)), 32.0, &mut r);
        assert_eq!(rep, FrameReport::default());
    }

    #[test]
    fn at_most_one_current_through_flapping() {
        let mut tracker = MouthTracker::new();
        let mut sys = tall();
        let mut r = rng();
        let gaps = [2.0, 30.0, 2.0, 30.0, 30.0, 2.0, 30.0, 2.0, 2.0, 30.0];
        for (i, gap) in gaps.into_iter().enumerate() {
            let m = tracker.update(Some(&face(gap)), i as f64 * 16.0);
            sys.update(m.as_ref(), i as f64 * 16.0, &mut r);
            let open = gap > 15.0;
            assert_eq!(sys.current_id().is_some(), open);
        }
        assert_eq!(sys.len(), 4);
    }

    #[test]
    fn draws_once_per_live_letter() {
        let mut sys = tall();
        let mut r = rng();
        for i in 0..3 {
            sys.update(Some(&mouth(true, true, false, 0.0)), i as f64, &mut r);
            sys.update(Some(&mouth(false, false, true, 0.0)), i as f64, &mut r);
        }
        let mut canvas = RecordingCanvas::default();
        sys.draw(&mut canvas);
        assert_eq!(canvas.draws.len(), 3);
        for (d, l) in canvas.draws.iter().zip(sys.letters()) {
            assert_eq!(d.glyph, l.glyph);
            assert_eq!(d.center, l.position);
            assert_eq!(d.style, GlyphStyle::letter(l.alpha()));
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = || {
            let mut sys = tall();
            let mut r = rng();
            sys.react(&mouth(true, true, false, 0.0), 0.0, &mut r);
            sys.react(&mouth(false, false, true, 0.0), 10.0, &mut r);
            sys.letters()[0].clone()
        };
        assert_eq!(run(), run());
    }
}

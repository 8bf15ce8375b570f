//! # letter_burst
//!
//! Letters that pop out of an opening mouth, swell while it stays open,
//! and tumble away under gravity once it shuts.
//!
//! Feed [`LetterSystem::update`] the [`MouthFrame`](mouth_tracker::MouthFrame)
//! from a [`MouthTracker`](mouth_tracker::MouthTracker) once per frame, then
//! hand it a [`GlyphCanvas`] to paint the survivors.
//!
//! ## Constants
//!
//! | Quantity | Value |
//! |---|---|
//! | Spawn size | 24 px |
//! | Growth | 0.1 px per ms held open |
//! | Spawn velocity | x ∈ [−2, 2), y ∈ [1, 3) px/frame |
//! | Release velocity | x ∈ [−3, 3), y ∈ [2, 5) px/frame |
//! | Gravity | 0.2 px/frame² |
//! | Fade | 1 opacity step per frame, from 255 |
//! | Cull line | frame height + 100 px |
//!
//! Randomness is always injected, so a seeded [`rand::rngs::StdRng`]
//! replays the same letters and trajectories.
//!
//! ```rust
//! use letter_burst::{LetterSystem, RecordingCanvas};
//! use mouth_tracker::{Face, MouthTracker};
//! use glam::Vec2;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng     = StdRng::seed_from_u64(1);
//! let mut tracker = MouthTracker::new();
//! let mut letters = LetterSystem::default();
//!
//! let wide = Face::with_lips(Vec2::new(320.0, 280.0), Vec2::new(320.0, 320.0));
//! let mouth = tracker.update(Some(&wide), 0.0);
//! let report = letters.update(mouth.as_ref(), 0.0, &mut rng);
//! assert!(report.spawned.is_some());
//!
//! let mut canvas = RecordingCanvas::default();
//! letters.draw(&mut canvas);
//! assert_eq!(canvas.draws.len(), 1);
//! ```

pub mod canvas;
pub mod letter;
pub mod system;

pub use canvas::{
    GlyphCanvas, GlyphDraw, GlyphStyle, RecordingCanvas, Rgba,
    LETTER_FILL, LETTER_STROKE, LETTER_STROKE_WEIGHT,
};
pub use letter::{Letter, LetterId, FULL_OPACITY};
pub use system::{FrameReport, LetterConfig, LetterSystem, FRAME_HEIGHT};

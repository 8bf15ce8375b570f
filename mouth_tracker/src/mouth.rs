//! Mouth open/closed classification with edge detection.
//!
//! The tracker is fed once per rendered frame.  It keeps the previous
//! frame's classification so it can report the frame on which the mouth
//! opened or closed, and remembers when the current open interval began.

use glam::Vec2;
use log::debug;

use crate::landmarks::{lip_points, Face};

/// Lip gap (in detector pixels) above which the mouth counts as open.
///
/// Tied to the detector's coordinate scale: recalibrate when the model or
/// capture resolution changes.
pub const MOUTH_OPEN_THRESHOLD: f32 = 15.0;

// ════════════════════════════════════════════════════════════════════════════
// MouthStatus
// ════════════════════════════════════════════════════════════════════════════

/// Persistent mouth state carried between frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MouthStatus {
    pub is_open:       bool,
    /// Classification on the previous usable frame.
    pub was_open:      bool,
    /// Timestamp (ms) at which the current open interval started.
    pub open_start_ms: f64,
}

// ════════════════════════════════════════════════════════════════════════════
// MouthFrame — per-frame report
// ════════════════════════════════════════════════════════════════════════════

/// What the tracker saw on one frame with usable landmarks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouthFrame {
    /// Lip gap in detector pixels.
    pub distance:    f32,
    pub is_open:     bool,
    /// The mouth opened on this frame.
    pub opened:      bool,
    /// The mouth closed on this frame.
    pub closed:      bool,
    /// Point halfway between the upper and lower lip.
    pub midpoint:    Vec2,
    /// Time since the open interval began; 0.0 while closed.
    pub open_for_ms: f64,
}

// ════════════════════════════════════════════════════════════════════════════
// MouthTracker
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct MouthTracker {
    status:    MouthStatus,
    threshold: f32,
}

impl Default for MouthTracker {
    fn default() -> Self { Self::new() }
}

impl MouthTracker {
    pub fn new() -> Self {
        Self::with_threshold(MOUTH_OPEN_THRESHOLD)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        MouthTracker { status: MouthStatus::default(), threshold }
    }

    pub fn status(&self) -> MouthStatus { self.status }

    pub fn threshold(&self) -> f32 { self.threshold }

    /// Advance one frame.
    ///
    /// Returns `None`, leaving the status untouched, when there is no face
    /// or the face lacks the lip keypoints.  A tracking dropout therefore
    /// never produces a spurious close edge.
    pub fn update(&mut self, face: Option<&Face>, now_ms: f64) -> Option<MouthFrame> {
        let (upper, lower) = lip_points(face?)?;
        Some(self.observe(upper, lower, now_ms))
    }

    /// Advance one frame from already-resolved lip points.
    pub fn observe(&mut self, upper: Vec2, lower: Vec2, now_ms: f64) -> MouthFrame {
        let distance = upper.distance(lower);
        let is_open  = distance > self.threshold;

        let opened = is_open && !self.status.was_open;
        let closed = !is_open && self.status.was_open;

        if opened {
            self.status.open_start_ms = now_ms;
            debug!("mouth opened at {:.0} ms (gap {:.1})", now_ms, distance);
        } else if closed {
            debug!(
                "mouth closed at {:.0} ms after {:.0} ms open",
                now_ms, now_ms - self.status.open_start_ms
            );
        }

        self.status.is_open  = is_open;
        self.status.was_open = is_open;

        MouthFrame {
            distance,
            is_open,
            opened,
            closed,
            midpoint: (upper + lower) * 0.5,
            open_for_ms: if is_open { now_ms - self.status.open_start_ms } else { 0.0 },
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

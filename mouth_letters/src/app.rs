//! Top-level per-frame context.
//!
//! `App` owns the `MouthTracker`, the `LetterSystem`, the random source,
//! and the reading end of the detector's latest-value cell.  One call to
//! [`App::frame`] is one tick of the demo: read the newest faces, update
//! the mouth, then update the letters.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;
use log::{info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use letter_burst::{FrameReport, LetterConfig, LetterSystem};
use mouth_tracker::{DetectorOptions, Face, MouthFrame, MouthTracker};

use crate::detector::{spawn_detector, FaceCell, SimFaceDetector};
use crate::error::AppError;
use crate::visualizer::{Visualizer, WIN_H, WIN_W};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Fixed settings for the demo.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub detector:           DetectorOptions,
    pub letters:            LetterConfig,
    /// Pause between simulated detection results.
    pub detection_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            detector:           DetectorOptions::default(),
            letters:            LetterConfig { frame_height: WIN_H as f32, ..LetterConfig::default() },
            detection_interval: Duration::from_millis(33),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// App
// ════════════════════════════════════════════════════════════════════════════

pub struct App {
    faces:      Arc<FaceCell>,
    tracker:    MouthTracker,
    letters:    LetterSystem,
    rng:        StdRng,
    /// Last mouth reading, kept across frames without a face.
    last_mouth: Option<MouthFrame>,
    face_seen:  bool,
    frames:     u64,
}

impl App {
    pub fn new(faces: Arc<FaceCell>, letters: LetterConfig, rng: StdRng) -> Self {
        App {
            faces,
            tracker:    MouthTracker::new(),
            letters:    LetterSystem::new(letters),
            rng,
            last_mouth: None,
            face_seen:  false,
            frames:     0,
        }
    }

    /// One tick.  `now_ms` is wall-clock time since start-up.
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        self.frames += 1;

        let latest = self.faces.latest();
        let face: Option<&Face> = latest.as_deref().and_then(|faces| faces.first());

        match (face.is_some(), self.face_seen) {
            (true, false) => info!("face acquired"),
            (false, true) => warn!("face lost; holding mouth state"),
            _ => {}
        }
        self.face_seen = face.is_some();

        let mouth = self.tracker.update(face, now_ms);
        if mouth.is_some() {
            self.last_mouth = mouth;
        }

        let report = self.letters.update(mouth.as_ref(), now_ms, &mut self.rng);
        trace!("frame {} at {:.0} ms: {:?}", self.frames, now_ms, report);
        report
    }

    pub fn letters(&self) -> &LetterSystem { &self.letters }

    pub fn tracker(&self) -> &MouthTracker { &self.tracker }

    /// Faces from the newest detection result (empty before the first).
    pub fn latest_faces(&self) -> Arc<Vec<Face>> {
        self.faces.latest().unwrap_or_default()
    }

    /// One-line summary for the status bar.
    pub fn status_line(&self) -> String {
        let face = if self.face_seen { "face: tracking" } else { "face: none" };
        let mouth = match self.last_mouth {
            Some(m) if m.is_open => format!("mouth: open {:.0}px", m.distance),
            Some(m)              => format!("mouth: shut {:.0}px", m.distance),
            None                 => "mouth: -".to_string(),
        };
        format!("{}   {}   letters: {}", face, mouth, self.letters.len())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the demo until the window closes or the user quits.
///
/// Starts the simulated detector on its own thread, opens the window, and
/// drives the update/render loop at the window's frame rate.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    // ── Detector ──────────────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel();
    let frame_size = Vec2::new(WIN_W as f32, WIN_H as f32);
    let detector = SimFaceDetector::new(sim_rx, cfg.detection_interval, frame_size);
    let (faces, detector_thread) = spawn_detector(detector, cfg.detector)?;

    // ── Window ────────────────────────────────────────────────────────────
    let mut vis = Visualizer::new(sim_tx)?;

    // ── Per-frame context ─────────────────────────────────────────────────
    let mut app = App::new(faces, cfg.letters, StdRng::from_os_rng());
    let clock = Instant::now();
    info!("running at {}x{}", WIN_W, WIN_H);

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        if !vis.poll_input() { break; }

        let now_ms = clock.elapsed().as_secs_f64() * 1000.0;
        app.frame(now_ms);

        let faces = app.latest_faces();
        vis.render(&faces, app.letters(), &app.status_line())?;
    }

    // Dropping the window drops the input sender, which stops the detector.
    drop(vis);
    if detector_thread.join().is_err() {
        warn!("face detector thread panicked");
    }
    info!("shut down");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const MOUTH: Vec2 = Vec2::new(320.0, 300.0);

    fn face(gap: f32) -> Vec<Face> {
        let half = Vec2::new(0.0, gap / 2.0);
        vec![Face::with_lips(MOUTH - half, MOUTH + half)]
    }

    fn make_app() -> (Arc<FaceCell>, App) {
        let cell = Arc::new(FaceCell::new());
        let app = App::new(Arc::clone(&cell), LetterConfig::default(), StdRng::seed_from_u64(11));
        (cell, app)
    }

    #[test]
    fn no_detection_yet_is_idle() {
        let (_cell, mut app) = make_app();
        assert_eq!(app.frame(0.0), FrameReport::default());
        assert!(app.letters().is_empty());
        assert!(app.latest_faces().is_empty());
        assert_eq!(app.status_line(), "face: none   mouth: -   letters: 0");
    }

    #[test]
    fn open_close_spawns_and_releases() {
        let (cell, mut app) = make_app();
        cell.publish(face(4.0));
        app.frame(0.0);
        cell.publish(face(30.0));
        let r = app.frame(16.0);
        assert!(r.spawned.is_some());
        assert!(app.status_line().contains("mouth: open 30px"));

        cell.publish(face(4.0));
        let r = app.frame(32.0);
        assert!(r.released.is_some());
        assert_eq!(app.letters().len(), 1);
        assert!(app.letters().current().is_none());
    }

    #[test]
    fn stale_detection_is_reused_each_frame() {
        let (cell, mut app) = make_app();
        cell.publish(face(30.0));
        app.frame(0.0);
        // No new detection: the same open face keeps the letter growing.
        app.frame(500.0);
        let size = app.letters().current().unwrap().size;
        assert!((size - 74.0).abs() < 1e-3);
    }

    #[test]
    fn only_first_face_is_consumed() {
        let (cell, mut app) = make_app();
        let mut faces = face(30.0);
        faces.extend(face(2.0));
        cell.publish(faces);
        assert!(app.frame(0.0).spawned.is_some());
    }

    #[test]
    fn empty_result_holds_mouth_state() {
        let (cell, mut app) = make_app();
        cell.publish(face(30.0));
        app.frame(0.0);
        let status = app.tracker().status();

        cell.publish(Vec::new());
        let r = app.frame(16.0);
        assert_eq!(r.released, None);
        assert_eq!(app.tracker().status(), status);
        assert!(app.letters().current().is_some());
        assert!(app.status_line().starts_with("face: none"));

        // Face comes back still open: no new edge, same letter.
        cell.publish(face(30.0));
        assert_eq!(app.frame(32.0), FrameReport::default());
        assert_eq!(app.letters().len(), 1);
    }

    #[test]
    fn default_config_matches_window() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.letters.frame_height, 480.0);
        assert_eq!(cfg.detector, DetectorOptions::default());
    }
}

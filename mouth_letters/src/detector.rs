//! Face detection.  The landmark model is a collaborator behind
//! [`FaceDetector`].
//!
//! Detectors run on their own thread and report every result through a
//! callback.  [`spawn_detector`] wires that callback into a
//! [`LatestCell`], so the frame loop always reads the newest faces and
//! never waits on the model.
//!
//! The bundled [`SimFaceDetector`] stands in for a camera plus landmark
//! model: the window forwards mouse and keyboard input as [`SimInput`]s and
//! the simulator turns them into a synthetic face.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use glam::Vec2;
use log::{debug, info};
use mouth_tracker::{DetectorOptions, Face, Keypoint, LatestCell};

use crate::error::AppError;

/// Callback invoked with each detection result (zero or more faces).
pub type OnResult = Box<dyn FnMut(Vec<Face>) + Send>;

// ════════════════════════════════════════════════════════════════════════════
// FaceDetector trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can produce face landmarks from a video source.
pub trait FaceDetector: Send + 'static {
    /// Run detection until the source ends, calling `on_result` whenever a
    /// result is ready.  Called on a dedicated thread.
    fn detect_start(self: Box<Self>, options: DetectorOptions, on_result: OnResult);
}

/// Apply the detector options every model honours after inference.
pub fn apply_options(mut faces: Vec<Face>, options: &DetectorOptions, frame_width: f32) -> Vec<Face> {
    faces.truncate(options.max_faces);
    if options.flip_horizontal {
        for kp in faces.iter_mut().flat_map(|f| f.keypoints.iter_mut().flatten()) {
            kp.x = frame_width - kp.x;
        }
    }
    faces
}

// ════════════════════════════════════════════════════════════════════════════
// Spawn helper
// ════════════════════════════════════════════════════════════════════════════

/// Latest detection result, shared between the detector and frame loop.
pub type FaceCell = LatestCell<Vec<Face>>;

/// Start `detector` on its own thread.  Results land in the returned cell.
pub fn spawn_detector<D: FaceDetector>(
    detector: D,
    options:  DetectorOptions,
) -> Result<(Arc<FaceCell>, JoinHandle<()>), AppError> {
    let cell = Arc::new(FaceCell::new());
    let sink = Arc::clone(&cell);
    let on_result: OnResult = Box::new(move |faces| sink.publish(faces));

    let handle = thread::Builder::new()
        .name("face-detector".into())
        .spawn(move || Box::new(detector).detect_start(options, on_result))
        .map_err(|e| AppError::Detector(e.to_string()))?;

    info!("face detector started ({:?})", options);
    Ok((cell, handle))
}

// ════════════════════════════════════════════════════════════════════════════
// SimFaceDetector — keyboard/mouse simulation
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer moved; the face follows it.
    Pointer(f32, f32),
    /// Mouth key held (`true`) or released (`false`).
    MouthHeld(bool),
    /// Hide or show the face (simulated tracking dropout).
    ToggleFace,
    Quit,
}

/// Lip gap when the mouth is shut / held open, in pixels.
const GAP_CLOSED: f32 = 4.0;
const GAP_OPEN:   f32 = 36.0;
/// Fraction of the remaining gap closed per detection tick.
const GAP_EASE:   f32 = 0.35;
/// Face oval half-axes.
const FACE_RX:    f32 = 95.0;
const FACE_RY:    f32 = 125.0;
/// Mouth centre below the face centre.
const MOUTH_DROP: f32 = 62.0;
const EYE_DX:     f32 = 36.0;
const EYE_DY:     f32 = -30.0;

/// Synthetic face state driven by [`SimInput`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimFace {
    pub center:  Vec2,
    pub gap:     f32,
    pub held:    bool,
    pub visible: bool,
}

impl SimFace {
    pub fn new(center: Vec2) -> Self {
        SimFace { center, gap: GAP_CLOSED, held: false, visible: true }
    }

    /// Returns `false` when the input asks the simulator to stop.
    pub fn apply(&mut self, input: SimInput) -> bool {
        match input {
            SimInput::Pointer(x, y)   => self.center = Vec2::new(x, y),
            SimInput::MouthHeld(held) => self.held = held,
            SimInput::ToggleFace      => {
                self.visible = !self.visible;
                debug!("simulated face {}", if self.visible { "shown" } else { "hidden" });
            }
            SimInput::Quit            => return false,
        }
        true
    }

    /// Ease the lip gap one tick toward its target.
    pub fn tick(&mut self) {
        let target = if self.held { GAP_OPEN } else { GAP_CLOSED };
        self.gap += (target - self.gap) * GAP_EASE;
    }

    /// Mouth centre in frame coordinates.
    pub fn mouth(&self) -> Vec2 {
        self.center + Vec2::new(0.0, MOUTH_DROP)
    }

    /// Landmarks for the current pose: 12-point oval (0–11), lips (12–17),
    /// eyes (18–19), and with `refine` ten iris points (20–29).
    pub fn landmarks(&self, refine: bool) -> Face {
        let mut pts: Vec<Keypoint> = Vec::with_capacity(30);

        for i in 0..12 {
            let a = i as f32 / 12.0 * std::f32::consts::TAU;
            pts.push((self.center + Vec2::new(a.sin() * FACE_RX, -a.cos() * FACE_RY)).into());
        }

        let m = self.mouth();
        let h = self.gap / 2.0;
        pts.push((m + Vec2::new(0.0, -h - 4.0)).into()); // 12 upper lip, outer
        pts.push((m + Vec2::new(0.0, -h)).into());       // 13 upper lip, centre
        pts.push((m + Vec2::new(0.0,  h)).into());       // 14 lower lip, centre
        pts.push((m + Vec2::new(0.0, -h + 1.0)).into()); // 15 upper lip, inner
        pts.push((m + Vec2::new(0.0,  h - 1.0)).into()); // 16 lower lip, inner
        pts.push((m + Vec2::new(0.0,  h + 4.0)).into()); // 17 lower lip, outer

        let eyes = [
            self.center + Vec2::new(-EYE_DX, EYE_DY),
            self.center + Vec2::new( EYE_DX, EYE_DY),
        ];
        pts.extend(eyes.iter().map(|&e| Keypoint::from(e)));

        if refine {
            for e in eyes {
                pts.push(e.into());
                for d in [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y] {
                    pts.push((e + d * 5.0).into());
                }
            }
        }

        Face::new(pts)
    }

    /// Detection result for this tick: zero or one face.
    pub fn detect(&self, refine: bool) -> Vec<Face> {
        if self.visible { vec![self.landmarks(refine)] } else { Vec::new() }
    }
}

/// Detector driven by [`SimInput`] from the visualizer's window.
pub struct SimFaceDetector {
    pub rx:          Receiver<SimInput>,
    pub interval:    Duration,
    pub frame_width: f32,
    pub face:        SimFace,
}

impl SimFaceDetector {
    pub fn new(rx: Receiver<SimInput>, interval: Duration, frame: Vec2) -> Self {
        SimFaceDetector {
            rx,
            interval,
            frame_width: frame.x,
            face: SimFace::new(frame * 0.5 - Vec2::new(0.0, MOUTH_DROP / 2.0)),
        }
    }
}

impl FaceDetector for SimFaceDetector {
    fn detect_start(self: Box<Self>, options: DetectorOptions, mut on_result: OnResult) {
        let SimFaceDetector { rx, interval, frame_width, mut face } = *self;
        loop {
            loop {
                match rx.try_recv() {
                    Ok(input) => if !face.apply(input) { info!("face detector stopping"); return; },
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => {
                        info!("input closed, face detector stopping");
                        return;
                    }
                }
            }
            face.tick();
            on_result(apply_options(face.detect(options.refine_landmarks), &options, frame_width));
            thread::sleep(interval);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use mouth_tracker::{lip_points, MOUTH_OPEN_THRESHOLD};
    use std::sync::mpsc;

    fn sim() -> SimFace { SimFace::new(Vec2::new(320.0, 200.0)) }

    #[test]
    fn synthetic_face_has_twenty_points() {
        let f = sim().landmarks(false);
        assert_eq!(f.len(), 20);
        assert_eq!(sim().landmarks(true).len(), 30);
    }

    #[test]
    fn lips_sit_on_the_mouth() {
        let s = sim();
        let (up, lo) = lip_points(&s.landmarks(false)).unwrap();
        assert_eq!((up + lo) * 0.5, s.mouth());
        assert!((lo.y - up.y - GAP_CLOSED).abs() < 1e-4);
    }

    #[test]
    fn holding_mouth_opens_past_threshold() {
        let mut s = sim();
        s.apply(SimInput::MouthHeld(true));
        for _ in 0..10 { s.tick(); }
        assert!(s.gap > MOUTH_OPEN_THRESHOLD);
        s.apply(SimInput::MouthHeld(false));
        for _ in 0..10 { s.tick(); }
        assert!(s.gap < MOUTH_OPEN_THRESHOLD);
    }

    #[test]
    fn toggled_face_reports_nothing() {
        let mut s = sim();
        assert_eq!(s.detect(false).len(), 1);
        s.apply(SimInput::ToggleFace);
        assert!(s.detect(false).is_empty());
        s.apply(SimInput::ToggleFace);
        assert_eq!(s.detect(false).len(), 1);
    }

    #[test]
    fn pointer_moves_face() {
        let mut s = sim();
        s.apply(SimInput::Pointer(100.0, 50.0));
        assert_eq!(s.center, Vec2::new(100.0, 50.0));
        assert!(!s.apply(SimInput::Quit));
    }

    #[test]
    fn options_cap_faces_and_mirror() {
        let s = sim();
        let faces = vec![s.landmarks(false), s.landmarks(false)];
        let opts = DetectorOptions { max_faces: 1, refine_landmarks: false, flip_horizontal: true };
        let out = apply_options(faces, &opts, 640.0);
        assert_eq!(out.len(), 1);
        let eye_l = s.landmarks(false).keypoint(18).unwrap();
        assert_eq!(out[0].keypoint(18).unwrap().x, 640.0 - eye_l.x);
    }

    #[test]
    fn spawned_sim_detector_publishes_and_stops() {
        let (tx, rx) = mpsc::channel();
        let det = SimFaceDetector::new(rx, Duration::from_millis(1), Vec2::new(640.0, 480.0));
        let (cell, handle) = spawn_detector(det, DetectorOptions::default()).unwrap();

        while cell.generation() == 0 { thread::yield_now(); }
        assert_eq!(cell.latest().unwrap().len(), 1);

        tx.send(SimInput::ToggleFace).unwrap();
        let seen = cell.generation();
        // Two more publishes guarantee the toggle has been applied.
        while cell.generation() < seen + 2 { thread::yield_now(); }
        assert!(cell.latest().unwrap().is_empty());

        drop(tx);
        handle.join().unwrap();
    }
}

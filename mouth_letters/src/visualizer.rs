//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                                              │
//! │          (face)          letters fall        │
//! │          ( o )  ──▶  A   B                   │
//! │                             C                │
//! │                                              │
//! │ status bar                                   │
//! │ key legend                                   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Each frame the "video" layer (the face the detector sees) is painted
//! first, then the letters, then the optional keypoint overlay and the
//! status text.

use std::sync::mpsc::Sender;

use glam::Vec2;
use letter_burst::{LetterSystem, Rgba};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use mouth_tracker::{lip_points, Face};

use crate::detector::SimInput;
use crate::error::AppError;
use crate::frame::FrameBuffer;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:       usize = 640;
pub const WIN_H:       usize = 480;
const STATUS_Y:        i32   = WIN_H as i32 - 30;
const BG_COLOR:        u32   = 0xFF1A1A2E;
const SKIN_COLOR:      u32   = 0xFFE0B89A;
const EYE_COLOR:       Rgba  = Rgba::new(40, 40, 60, 255);
const MOUTH_COLOR:     u32   = 0xFF5A1020;
const KEYPOINT_COLOR:  Rgba  = Rgba::new(0, 255, 0, 255);
const TEXT_BG:         u32   = 0xFF0F3460;
const TEXT_COLOR:      u32   = 0xFFEEEEEE;
const LEGEND_COLOR:    u32   = 0xFF888888;
const MOUTH_HALF_W:    i32   = 24;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:         Window,
    frame:          FrameBuffer,
    sim_tx:         Sender<SimInput>,
    mouth_held:     bool,
    show_keypoints: bool,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Mouth Letters",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.set_target_fps(60);

        Ok(Visualizer {
            window,
            frame: FrameBuffer::new(WIN_W, WIN_H, BG_COLOR),
            sim_tx,
            mouth_held: false,
            show_keypoints: false,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll mouse and keyboard and forward them to the simulated detector.
    /// Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Q) || one_shot(&self.window, Key::Escape) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }
        if one_shot(&self.window, Key::F) {
            let _ = self.sim_tx.send(SimInput::ToggleFace);
        }
        if one_shot(&self.window, Key::K) {
            self.show_keypoints = !self.show_keypoints;
        }

        let held = self.window.is_key_down(Key::Space);
        if held != self.mouth_held {
            self.mouth_held = held;
            let _ = self.sim_tx.send(SimInput::MouthHeld(held));
        }

        if let Some((x, y)) = self.window.get_mouse_pos(MouseMode::Discard) {
            let _ = self.sim_tx.send(SimInput::Pointer(x, y));
        }

        true
    }

    /// Render one frame.
    pub fn render(&mut self, faces: &[Face], letters: &LetterSystem, status: &str) -> Result<(), AppError> {
        paint_frame(&mut self.frame, faces, letters, status, self.show_keypoints);
        self.window.update_with_buffer(self.frame.pixels(), WIN_W, WIN_H)?;
        Ok(())
    }
}

/// Compose one frame into `fb`.  Kept free of the window so it can be
/// exercised headless.
pub fn paint_frame(
    fb:             &mut FrameBuffer,
    faces:          &[Face],
    letters:        &LetterSystem,
    status:         &str,
    show_keypoints: bool,
) {
    fb.clear(BG_COLOR);

    // ── Video layer ───────────────────────────────────────────────────────
    for face in faces {
        draw_face(fb, face);
    }

    // ── Letters ───────────────────────────────────────────────────────────
    letters.draw(&mut *fb);

    // ── Keypoint overlay ──────────────────────────────────────────────────
    if show_keypoints {
        for face in faces {
            for kp in face.points() {
                fb.fill_circle(kp.xy(), 2.0, KEYPOINT_COLOR);
            }
        }
    }

    // ── Status bar ────────────────────────────────────────────────────────
    fb.fill_rect(0, STATUS_Y, WIN_W as i32, WIN_H as i32 - STATUS_Y, TEXT_BG);
    fb.draw_text(status, 8, STATUS_Y + 4, 1, TEXT_COLOR);
    fb.draw_text(
        "mouse=move  space=open mouth  f=face  k=keypoints  q=quit",
        8, WIN_H as i32 - 12, 1, LEGEND_COLOR,
    );
}

/// Oval outline from the first twelve keypoints, eyes, and an open mouth
/// between the lips.
fn draw_face(fb: &mut FrameBuffer, face: &Face) {
    let oval: Vec<Vec2> = (0..12).filter_map(|i| face.keypoint(i)).map(|k| k.xy()).collect();
    for (i, &a) in oval.iter().enumerate() {
        let b = oval[(i + 1) % oval.len()];
        fb.draw_line(a, b, SKIN_COLOR);
    }

    for eye in [18, 19].into_iter().filter_map(|i| face.keypoint(i)) {
        fb.fill_circle(eye.xy(), 6.0, EYE_COLOR);
    }

    if let Some((up, lo)) = lip_points(face) {
        let mid = (up + lo) * 0.5;
        let top = up.y.min(lo.y).round() as i32;
        let h   = ((lo.y - up.y).abs().round() as i32).max(2);
        fb.fill_rect(mid.x.round() as i32 - MOUTH_HALF_W, top, 2 * MOUTH_HALF_W, h, MOUTH_COLOR);
    }
}

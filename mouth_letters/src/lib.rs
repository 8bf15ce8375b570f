//! # mouth_letters
//!
//! Open your mouth and letters come out.  Face landmarks drive a
//! [`MouthTracker`](mouth_tracker::MouthTracker); its open/close edges
//! drive a [`LetterSystem`](letter_burst::LetterSystem) of growing,
//! falling glyphs, painted into a `minifb` window.
//!
//! ## Mouth → Letter mapping
//!
//! | Mouth | Letter |
//! |---|---|
//! | Opens | A random A–Z appears between the lips |
//! | Stays open | The letter follows the mouth and grows 0.1 px per ms |
//! | Closes | The letter is flung out with a fresh random velocity |
//! | Any time | Every letter falls (gravity 0.2 px/frame²) and fades |
//! | Face lost | Mouth state is held; letters keep falling |
//!
//! ## Detector
//!
//! The landmark model sits behind [`detector::FaceDetector`] and runs on its
//! own thread; the frame loop only ever reads the newest result.  The
//! bundled simulator turns mouse and keyboard input into a synthetic face.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse | Move the face |
//! | `Space` (hold) | Open the mouth |
//! | `F` | Hide/show the face (tracking dropout) |
//! | `K` | Toggle the keypoint overlay |
//! | `Q` / `Escape` | Quit |
//!
//! Logging goes through `log`; set `RUST_LOG=debug` to see every open,
//! close, spawn, and release.

pub mod error;
pub mod font;
pub mod frame;
pub mod detector;
pub mod visualizer;
pub mod app;

pub use error::AppError;

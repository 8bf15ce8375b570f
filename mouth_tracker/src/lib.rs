//! # mouth_tracker
//!
//! Turns a stream of facial landmark sets into mouth open/close edges.
//!
//! The landmark model itself lives outside this crate; it only has to hand
//! over a list of [`Face`]s, each an ordered list of [`Keypoint`]s laid out
//! like the face-mesh topology (upper lip centre at 13, lower lip centre
//! at 14).
//!
//! ## Pieces
//!
//! | Type | Role |
//! |---|---|
//! | [`Face`] / [`Keypoint`] | One detected face, read-only to the tracker |
//! | [`DetectorOptions`] | Fixed options handed to the detector at start-up |
//! | [`MouthTracker`] | Per-frame open/closed classification and edge flags |
//! | [`MouthFrame`] | What the tracker reports for one frame |
//! | [`LatestCell`] | Single-slot handoff from the detector thread to the frame loop |
//!
//! ## Per-frame use
//!
//! ```rust
//! use mouth_tracker::{Face, MouthTracker};
//! use glam::Vec2;
//!
//! let mut tracker = MouthTracker::new();
//! let shut = Face::with_lips(Vec2::new(320.0, 300.0), Vec2::new(320.0, 305.0));
//! let wide = Face::with_lips(Vec2::new(320.0, 290.0), Vec2::new(320.0, 320.0));
//!
//! assert!(!tracker.update(Some(&shut), 0.0).unwrap().opened);
//! assert!(tracker.update(Some(&wide), 16.0).unwrap().opened);
//! assert!(tracker.update(Some(&shut), 32.0).unwrap().closed);
//! ```

pub mod landmarks;
pub mod mouth;
pub mod latest;

pub use landmarks::{
    lip_points, DetectorOptions, Face, Keypoint,
    LOWER_LIP_INDICES, UPPER_LIP_INDICES,
};
pub use mouth::{MouthFrame, MouthStatus, MouthTracker, MOUTH_OPEN_THRESHOLD};
pub use latest::LatestCell;

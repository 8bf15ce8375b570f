//! Landmark data handed over by the face detector.
//!
//! Coordinates are in the detector's pixel space (640 × 480 for the
//! default capture size).  Nothing here validates geometry: a face is just
//! whatever points the model produced, in model order.

use glam::Vec2;

// ════════════════════════════════════════════════════════════════════════════
// Lip keypoint indices
// ════════════════════════════════════════════════════════════════════════════

/// Upper lip centre, tried in order: primary then fallbacks.
pub const UPPER_LIP_INDICES: [usize; 3] = [13, 12, 15];

/// Lower lip centre, tried in order: primary then fallbacks.
pub const LOWER_LIP_INDICES: [usize; 3] = [14, 16, 17];

// ════════════════════════════════════════════════════════════════════════════
// Keypoint / Face
// ════════════════════════════════════════════════════════════════════════════

/// A single landmark.  `z` is relative depth and is 0.0 when the model
/// reports 2D points only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32) -> Self {
        Keypoint { x, y, z: 0.0 }
    }

    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for Keypoint {
    fn from(p: Vec2) -> Self {
        Keypoint::new(p.x, p.y)
    }
}

/// One detected face: keypoints in model order.  A slot is `None` when
/// the model did not report that landmark.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Face {
    pub keypoints: Vec<Option<Keypoint>>,
}

impl Face {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Face { keypoints: keypoints.into_iter().map(Some).collect() }
    }

    /// A minimal face carrying only the lip keypoints; every other slot is
    /// empty.  Fallback indices mirror the primaries.
    pub fn with_lips(upper: Vec2, lower: Vec2) -> Self {
        let len = LOWER_LIP_INDICES.iter().chain(UPPER_LIP_INDICES.iter())
            .max()
            .map_or(0, |&i| i + 1);
        let mut keypoints: Vec<Option<Keypoint>> = vec![None; len];
        for &i in &UPPER_LIP_INDICES { keypoints[i] = Some(upper.into()); }
        for &i in &LOWER_LIP_INDICES { keypoints[i] = Some(lower.into()); }
        Face { keypoints }
    }

    pub fn keypoint(&self, index: usize) -> Option<Keypoint> {
        self.keypoints.get(index).copied().flatten()
    }

    /// Every reported keypoint, skipping empty slots.
    pub fn points(&self) -> impl Iterator<Item = Keypoint> + '_ {
        self.keypoints.iter().flatten().copied()
    }

    pub fn len(&self) -> usize { self.keypoints.len() }

    pub fn is_empty(&self) -> bool { self.keypoints.is_empty() }

    /// First keypoint present among `indices`.
    fn first_of(&self, indices: &[usize]) -> Option<Vec2> {
        indices.iter().find_map(|&i| self.keypoint(i)).map(|k| k.xy())
    }
}

/// Resolve `(upper_lip, lower_lip)` for a face, walking the fallback
/// indices.  `None` when either lip cannot be found.
pub fn lip_points(face: &Face) -> Option<(Vec2, Vec2)> {
    let upper = face.first_of(&UPPER_LIP_INDICES)?;
    let lower = face.first_of(&LOWER_LIP_INDICES)?;
    Some((upper, lower))
}

// ════════════════════════════════════════════════════════════════════════════
// DetectorOptions
// ════════════════════════════════════════════════════════════════════════════

/// Options passed to the detector when detection starts.  Fixed for the
/// lifetime of the program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectorOptions {
    /// Upper bound on faces reported per result.
    pub max_faces:        usize,
    /// Ask the model for the extra iris landmarks.
    pub refine_landmarks: bool,
    /// Mirror x coordinates around the frame width.
    pub flip_horizontal:  bool,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        DetectorOptions {
            max_faces:        1,
            refine_landmarks: false,
            flip_horizontal:  false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

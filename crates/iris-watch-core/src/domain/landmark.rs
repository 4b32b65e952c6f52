//! Landmark types supplied by the face-mesh detector.

use serde::{Deserialize, Serialize};

/// A detector landmark, normalized to frame width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    /// Horizontal position (0.0 = left edge, 1.0 = right edge).
    pub x: f32,
    /// Vertical position (0.0 = top edge, 1.0 = bottom edge).
    pub y: f32,
}

impl LandmarkPoint {
    /// Creates a new landmark point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Which eye a landmark set belongs to, from the subject's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeSide {
    /// Subject's left eye.
    Left,
    /// Subject's right eye.
    Right,
}

impl EyeSide {
    /// Both sides, left first.
    pub const BOTH: [Self; 2] = [Self::Left, Self::Right];
}

impl std::fmt::Display for EyeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// The landmarks of one eye, taken from a single detector output.
///
/// Point counts are fixed by the array types, so a partially filled
/// set cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeLandmarkSet {
    /// Samples around the visible iris ring.
    pub iris: [LandmarkPoint; 5],
    /// Inner and outer eye corners, in detector order.
    pub corners: [LandmarkPoint; 2],
    /// Upper and lower lid samples.
    pub lids: [LandmarkPoint; 2],
}

/// Both eyes of the first face found in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    /// Subject's left eye.
    pub left: EyeLandmarkSet,
    /// Subject's right eye.
    pub right: EyeLandmarkSet,
}

impl FaceLandmarks {
    /// Returns the landmark set for one eye.
    #[must_use]
    pub const fn eye(&self, side: EyeSide) -> &EyeLandmarkSet {
        match side {
            EyeSide::Left => &self.left,
            EyeSide::Right => &self.right,
        }
    }
}

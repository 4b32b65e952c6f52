//! Gaze offset ratios.

use serde::{Deserialize, Serialize};

/// Where the iris sits relative to the eye's geometric center.
///
/// Each ratio is the iris-center displacement divided by half the eye's
/// extent on that axis. 0.0 is centered; values usually fall in -3..3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GazeOffset {
    /// Horizontal displacement ratio (negative = toward the first corner).
    pub horizontal_ratio: f32,
    /// Vertical displacement ratio (negative = toward the upper lid).
    pub vertical_ratio: f32,
}

impl GazeOffset {
    /// A perfectly centered reading.
    pub const CENTERED: Self = Self::new(0.0, 0.0);

    /// Creates a new offset.
    #[must_use]
    pub const fn new(horizontal_ratio: f32, vertical_ratio: f32) -> Self {
        Self {
            horizontal_ratio,
            vertical_ratio,
        }
    }

    /// Mean of two offsets.
    ///
    /// For display only. Focus is decided per eye, never from the average.
    #[must_use]
    pub fn average(a: &Self, b: &Self) -> Self {
        Self::new(
            (a.horizontal_ratio + b.horizontal_ratio) / 2.0,
            (a.vertical_ratio + b.vertical_ratio) / 2.0,
        )
    }
}

impl std::fmt::Display for GazeOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "H: {:.2} V: {:.2}",
            self.horizontal_ratio, self.vertical_ratio
        )
    }
}

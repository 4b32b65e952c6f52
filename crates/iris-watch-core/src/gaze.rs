//! Gaze extraction and center classification.
//!
//! Turns one eye's landmarks into normalized offset ratios, then decides
//! whether that eye is looking at the screen:
//! - horizontal center comes from the two corners, vertical from the lids
//! - the iris center is the mean of the iris ring samples
//! - the "centered" region is a rectangle in ratio space, not a disk

use serde::{Deserialize, Serialize};

use crate::domain::{EyeLandmarkSet, GazeOffset, LandmarkPoint};

/// Maximum absolute horizontal ratio still counted as centered.
pub const CENTER_ANGLE_HORIZONTAL_THRESHOLD: f32 = 0.26;

/// Maximum absolute vertical ratio still counted as centered.
pub const CENTER_ANGLE_VERTICAL_THRESHOLD: f32 = 0.44;

/// Computes the iris offset from the eye's geometric center.
///
/// An axis whose extent is zero (coincident corners or lids) reads as 0.0
/// on that axis, so detector noise never produces NaN or an unfocused
/// verdict on its own.
#[must_use]
pub fn compute_offset(eye: &EyeLandmarkSet) -> GazeOffset {
    let [corner_a, corner_b] = eye.corners;
    let [upper_lid, lower_lid] = eye.lids;

    let center_x = (corner_a.x + corner_b.x) / 2.0;
    let center_y = (upper_lid.y + lower_lid.y) / 2.0;

    let iris = iris_center(&eye.iris);

    let width = (corner_b.x - corner_a.x).abs();
    let height = (lower_lid.y - upper_lid.y).abs();

    GazeOffset::new(
        axis_ratio(iris.x - center_x, width),
        axis_ratio(iris.y - center_y, height),
    )
}

/// Arithmetic mean of the iris ring samples.
#[allow(clippy::cast_precision_loss)]
fn iris_center(points: &[LandmarkPoint]) -> LandmarkPoint {
    let n = points.len() as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0_f32, 0.0_f32), |(sx, sy), p| (sx + p.x, sy + p.y));
    LandmarkPoint::new(sx / n, sy / n)
}

/// Displacement over half the extent, or 0.0 for a degenerate extent.
fn axis_ratio(displacement: f32, extent: f32) -> f32 {
    if extent > 0.0 {
        let ratio = displacement / (extent / 2.0);
        if ratio.is_finite() {
            ratio
        } else {
            0.0
        }
    } else {
        0.0
    }
}

/// Rectangular center-gaze thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterThresholds {
    /// Horizontal ratio limit (exclusive).
    pub horizontal: f32,
    /// Vertical ratio limit (exclusive).
    pub vertical: f32,
}

impl Default for CenterThresholds {
    fn default() -> Self {
        Self {
            horizontal: CENTER_ANGLE_HORIZONTAL_THRESHOLD,
            vertical: CENTER_ANGLE_VERTICAL_THRESHOLD,
        }
    }
}

impl CenterThresholds {
    /// Creates thresholds from explicit limits.
    #[must_use]
    pub const fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// True if both axes are strictly inside their limits.
    #[must_use]
    pub fn is_centered(&self, offset: &GazeOffset) -> bool {
        offset.horizontal_ratio.abs() < self.horizontal
            && offset.vertical_ratio.abs() < self.vertical
    }
}

/// Classifies an offset against the default thresholds.
#[must_use]
pub fn is_centered(offset: &GazeOffset) -> bool {
    CenterThresholds::default().is_centered(offset)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> LandmarkPoint {
        LandmarkPoint::new(x, y)
    }

    /// Eye spanning x 0.25..0.75 and y 0.25..0.75, iris ring around (ix, iy).
    fn eye_with_iris(ix: f32, iy: f32) -> EyeLandmarkSet {
        let r = 0.03125;
        EyeLandmarkSet {
            iris: [
                p(ix, iy),
                p(ix + r, iy),
                p(ix - r, iy),
                p(ix, iy + r),
                p(ix, iy - r),
            ],
            corners: [p(0.25, 0.5), p(0.75, 0.5)],
            lids: [p(0.5, 0.25), p(0.5, 0.75)],
        }
    }

    #[test]
    fn test_centered_iris_gives_zero_offset() {
        let offset = compute_offset(&eye_with_iris(0.5, 0.5));
        assert!(offset.horizontal_ratio.abs() < f32::EPSILON);
        assert!(offset.vertical_ratio.abs() < f32::EPSILON);
        assert!(is_centered(&offset));
    }

    #[test]
    fn test_offset_is_scaled_by_half_extent() {
        // Half width is 0.25, iris moved 0.125 right -> 0.5
        let offset = compute_offset(&eye_with_iris(0.625, 0.5));
        assert!((offset.horizontal_ratio - 0.5).abs() < 1e-6);

        // Half height is 0.25, iris moved 0.0625 up -> -0.25
        let offset = compute_offset(&eye_with_iris(0.5, 0.4375));
        assert!((offset.vertical_ratio + 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_corner_order_does_not_change_magnitude() {
        let mut eye = eye_with_iris(0.625, 0.5);
        eye.corners.swap(0, 1);
        let offset = compute_offset(&eye);
        assert!((offset.horizontal_ratio - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_center_ignores_lid_x() {
        // Lids are sampled off-center horizontally; only corners set center x
        let mut eye = eye_with_iris(0.5, 0.5);
        eye.lids = [p(0.6, 0.25), p(0.6, 0.75)];
        let offset = compute_offset(&eye);
        assert!(offset.horizontal_ratio.abs() < f32::EPSILON);
    }

    #[test]
    fn test_vertical_center_ignores_corner_y() {
        let mut eye = eye_with_iris(0.5, 0.5);
        eye.corners = [p(0.25, 0.4), p(0.75, 0.4)];
        let offset = compute_offset(&eye);
        assert!(offset.vertical_ratio.abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_width_gives_zero_horizontal() {
        let mut eye = eye_with_iris(0.9, 0.5);
        eye.corners = [p(0.5, 0.5), p(0.5, 0.5)];
        let offset = compute_offset(&eye);
        assert_eq!(offset.horizontal_ratio, 0.0);
        assert!(offset.horizontal_ratio.is_finite());
    }

    #[test]
    fn test_zero_height_gives_zero_vertical() {
        let mut eye = eye_with_iris(0.5, 0.1);
        eye.lids = [p(0.5, 0.5), p(0.5, 0.5)];
        let offset = compute_offset(&eye);
        assert_eq!(offset.vertical_ratio, 0.0);
    }

    #[test]
    fn test_fully_degenerate_eye_reads_centered() {
        let eye = EyeLandmarkSet {
            iris: [p(0.3, 0.3); 5],
            corners: [p(0.5, 0.5); 2],
            lids: [p(0.5, 0.5); 2],
        };
        let offset = compute_offset(&eye);
        assert_eq!(offset, GazeOffset::CENTERED);
        assert!(is_centered(&offset));
    }

    #[test]
    fn test_rectangular_classification() {
        assert!(is_centered(&GazeOffset::new(0.25, 0.0)));
        assert!(!is_centered(&GazeOffset::new(0.30, 0.0)));
        assert!(!is_centered(&GazeOffset::new(0.0, 0.50)));
        assert!(is_centered(&GazeOffset::new(-0.25, -0.43)));
        // Each axis inside its limit: still a rectangle, not an ellipse
        assert!(is_centered(&GazeOffset::new(0.259, 0.439)));
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let t = CenterThresholds::new(0.5, 0.5);
        assert!(!t.is_centered(&GazeOffset::new(0.5, 0.0)));
        assert!(!t.is_centered(&GazeOffset::new(0.0, -0.5)));
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = CenterThresholds::new(0.1, 0.1);
        assert!(!strict.is_centered(&GazeOffset::new(0.2, 0.0)));
        assert!(strict.is_centered(&GazeOffset::new(0.05, 0.05)));
    }

    #[test]
    fn test_default_thresholds() {
        let t = CenterThresholds::default();
        assert!((t.horizontal - 0.26).abs() < f32::EPSILON);
        assert!((t.vertical - 0.44).abs() < f32::EPSILON);
    }
}

//! Synthetic landmark builders for testing.

use iris_watch_adapters::mesh::{
    LEFT_EYE_CORNERS, LEFT_EYE_LIDS, LEFT_IRIS, MIN_MESH_POINTS, RIGHT_EYE_CORNERS,
    RIGHT_EYE_LIDS, RIGHT_IRIS,
};
use iris_watch_core::{
    Detection, EyeLandmarkSet, FaceLandmarks, Frame, LandmarkError, LandmarkPoint,
};
use time::macros::datetime;
use time::OffsetDateTime;

/// Fixed start time used by [`FrameScript`].
pub const SCRIPT_START: OffsetDateTime = datetime!(2024-05-01 09:00:00 UTC);

/// Builder for one eye with a chosen gaze offset.
///
/// The iris ring is placed so that the extracted ratios equal the
/// requested gaze (up to float rounding).
#[derive(Debug, Clone, Copy)]
pub struct EyeBuilder {
    center: (f32, f32),
    size: (f32, f32),
    gaze: (f32, f32),
    iris_radius: f32,
}

impl Default for EyeBuilder {
    fn default() -> Self {
        Self {
            center: (0.5, 0.5),
            size: (0.0625, 0.03125),
            gaze: (0.0, 0.0),
            iris_radius: 0.0078125,
        }
    }
}

impl EyeBuilder {
    /// Eye centered at the given normalized position.
    #[must_use]
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            center: (x, y),
            ..Self::default()
        }
    }

    /// Sets the eye width (corner to corner) and height (lid to lid).
    #[must_use]
    pub const fn size(mut self, width: f32, height: f32) -> Self {
        self.size = (width, height);
        self
    }

    /// Sets the gaze offset ratios.
    #[must_use]
    pub const fn gaze(mut self, horizontal: f32, vertical: f32) -> Self {
        self.gaze = (horizontal, vertical);
        self
    }

    /// Builds the landmark set.
    #[must_use]
    pub fn build(&self) -> EyeLandmarkSet {
        let (cx, cy) = self.center;
        let (w, h) = self.size;
        let ix = cx + self.gaze.0 * w / 2.0;
        let iy = cy + self.gaze.1 * h / 2.0;
        let r = self.iris_radius;

        EyeLandmarkSet {
            iris: [
                LandmarkPoint::new(ix, iy),
                LandmarkPoint::new(ix + r, iy),
                LandmarkPoint::new(ix, iy - r),
                LandmarkPoint::new(ix - r, iy),
                LandmarkPoint::new(ix, iy + r),
            ],
            corners: [
                LandmarkPoint::new(cx - w / 2.0, cy),
                LandmarkPoint::new(cx + w / 2.0, cy),
            ],
            lids: [
                LandmarkPoint::new(cx, cy - h / 2.0),
                LandmarkPoint::new(cx, cy + h / 2.0),
            ],
        }
    }
}

/// Builder for a face (both eyes).
#[derive(Debug, Clone, Copy)]
pub struct FaceBuilder {
    left: EyeBuilder,
    right: EyeBuilder,
}

impl FaceBuilder {
    /// Both eyes looking straight ahead.
    #[must_use]
    pub fn centered() -> Self {
        Self::looking(0.0, 0.0)
    }

    /// Both eyes with the same gaze offset.
    #[must_use]
    pub fn looking(horizontal: f32, vertical: f32) -> Self {
        Self {
            left: EyeBuilder::at(0.4375, 0.4375).gaze(horizontal, vertical),
            right: EyeBuilder::at(0.5625, 0.4375).gaze(horizontal, vertical),
        }
    }

    /// Overrides the left eye.
    #[must_use]
    pub const fn left(mut self, eye: EyeBuilder) -> Self {
        self.left = eye;
        self
    }

    /// Overrides the right eye.
    #[must_use]
    pub const fn right(mut self, eye: EyeBuilder) -> Self {
        self.right = eye;
        self
    }

    /// Builds the face.
    #[must_use]
    pub fn build(&self) -> FaceLandmarks {
        FaceLandmarks {
            left: self.left.build(),
            right: self.right.build(),
        }
    }
}

/// Builder for a full face-mesh point list (detector output).
///
/// Points outside the eye contract are filled with the frame center.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    points: Vec<[f32; 3]>,
}

impl MeshBuilder {
    /// Mesh carrying the given face at the contract indices.
    #[must_use]
    pub fn from_face(face: &FaceLandmarks) -> Self {
        let mut points = vec![[0.5, 0.5, 0.0]; MIN_MESH_POINTS];
        let mut place = |indices: &[usize], src: &[LandmarkPoint]| {
            for (&i, p) in indices.iter().zip(src) {
                points[i] = [p.x, p.y, 0.0];
            }
        };
        place(&LEFT_IRIS, &face.left.iris);
        place(&LEFT_EYE_CORNERS, &face.left.corners);
        place(&LEFT_EYE_LIDS, &face.left.lids);
        place(&RIGHT_IRIS, &face.right.iris);
        place(&RIGHT_EYE_CORNERS, &face.right.corners);
        place(&RIGHT_EYE_LIDS, &face.right.lids);
        Self { points }
    }

    /// Drops points from the end (simulates a short, malformed mesh).
    #[must_use]
    pub fn truncated(mut self, len: usize) -> Self {
        self.points.truncate(len);
        self
    }

    /// The raw point list.
    #[must_use]
    pub fn points(&self) -> &[[f32; 3]] {
        &self.points
    }

    /// One replay line: `{"t": .., "landmarks": [...]}`.
    #[must_use]
    pub fn jsonl_line(&self, t: Option<f64>) -> String {
        let mut value = serde_json::json!({ "landmarks": self.points });
        if let Some(t) = t {
            value["t"] = serde_json::json!(t);
        }
        value.to_string()
    }

    /// A replay line for a frame without a face.
    #[must_use]
    pub fn no_face_line(t: Option<f64>) -> String {
        let mut value = serde_json::json!({ "landmarks": null });
        if let Some(t) = t {
            value["t"] = serde_json::json!(t);
        }
        value.to_string()
    }
}

/// Builds a timed frame sequence at a fixed frame rate.
#[derive(Debug, Clone)]
pub struct FrameScript {
    fps: f64,
    detections: Vec<Detection>,
}

impl FrameScript {
    /// Empty script at `fps` frames per second.
    #[must_use]
    pub const fn new(fps: f64) -> Self {
        Self {
            fps,
            detections: Vec::new(),
        }
    }

    /// Appends `count` frames showing `face`.
    #[must_use]
    pub fn faces(mut self, count: usize, face: FaceLandmarks) -> Self {
        self.detections
            .extend(std::iter::repeat(Detection::Face(face)).take(count));
        self
    }

    /// Appends `count` frames without a face.
    #[must_use]
    pub fn no_face(mut self, count: usize) -> Self {
        self.detections
            .extend(std::iter::repeat(Detection::NoFace).take(count));
        self
    }

    /// Appends `count` frames with malformed detector output.
    #[must_use]
    pub fn malformed(mut self, count: usize) -> Self {
        let error = LandmarkError::TooFewPoints {
            expected: MIN_MESH_POINTS,
            actual: 0,
        };
        self.detections
            .extend(std::iter::repeat(Detection::Malformed(error)).take(count));
        self
    }

    /// Builds frames timestamped from [`SCRIPT_START`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn build(self) -> Vec<Frame> {
        let fps = self.fps;
        self.detections
            .into_iter()
            .enumerate()
            .map(|(index, detection)| Frame {
                index,
                timestamp: SCRIPT_START + time::Duration::seconds_f64(index as f64 / fps),
                detection,
            })
            .collect()
    }
}

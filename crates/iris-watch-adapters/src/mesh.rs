//! Face-mesh landmark topology adapter.
//!
//! Maps the detector's fixed 478-point index scheme (with iris refinement)
//! onto per-eye landmark sets. The indices and their roles are a contract
//! with the detector and must not be reordered.

use iris_watch_core::{
    EyeLandmarkProvider, EyeLandmarkSet, EyeSide, FaceLandmarks, LandmarkError, LandmarkPoint,
};

/// Left iris ring.
pub const LEFT_IRIS: [usize; 5] = [468, 469, 470, 471, 472];
/// Right iris ring.
pub const RIGHT_IRIS: [usize; 5] = [473, 474, 475, 476, 477];
/// Left eye corners.
pub const LEFT_EYE_CORNERS: [usize; 2] = [33, 133];
/// Right eye corners.
pub const RIGHT_EYE_CORNERS: [usize; 2] = [362, 263];
/// Left eye upper and lower lid.
pub const LEFT_EYE_LIDS: [usize; 2] = [159, 145];
/// Right eye upper and lower lid.
pub const RIGHT_EYE_LIDS: [usize; 2] = [386, 374];

/// Points a mesh must carry for the iris indices to exist.
pub const MIN_MESH_POINTS: usize = 478;

/// Index layout for one eye.
struct EyeIndices {
    iris: [usize; 5],
    corners: [usize; 2],
    lids: [usize; 2],
}

const fn indices(side: EyeSide) -> EyeIndices {
    match side {
        EyeSide::Left => EyeIndices {
            iris: LEFT_IRIS,
            corners: LEFT_EYE_CORNERS,
            lids: LEFT_EYE_LIDS,
        },
        EyeSide::Right => EyeIndices {
            iris: RIGHT_IRIS,
            corners: RIGHT_EYE_CORNERS,
            lids: RIGHT_EYE_LIDS,
        },
    }
}

/// One face's mesh as produced by the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshLandmarks {
    points: Vec<LandmarkPoint>,
}

impl MeshLandmarks {
    /// Wraps already-decoded points.
    #[must_use]
    pub const fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    /// Decodes raw `[x, y]` or `[x, y, z]` tuples; depth is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LandmarkError::BadShape`] for a tuple with another length.
    pub fn from_components(raw: &[Vec<f32>]) -> Result<Self, LandmarkError> {
        let points = raw
            .iter()
            .enumerate()
            .map(|(index, c)| match c.as_slice() {
                [x, y] | [x, y, _] => Ok(LandmarkPoint::new(*x, *y)),
                _ => Err(LandmarkError::BadShape {
                    index,
                    components: c.len(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(points))
    }

    /// Number of points in the mesh.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the mesh has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn point(&self, side: EyeSide, index: usize) -> Result<LandmarkPoint, LandmarkError> {
        let point = self
            .points
            .get(index)
            .copied()
            .ok_or(LandmarkError::TooFewPoints {
                expected: MIN_MESH_POINTS,
                actual: self.points.len(),
            })?;
        if point.is_finite() {
            Ok(point)
        } else {
            Err(LandmarkError::NonFinite { side, index })
        }
    }

    fn gather<const N: usize>(
        &self,
        side: EyeSide,
        idx: [usize; N],
    ) -> Result<[LandmarkPoint; N], LandmarkError> {
        let mut out = [LandmarkPoint::default(); N];
        for (slot, i) in out.iter_mut().zip(idx) {
            *slot = self.point(side, i)?;
        }
        Ok(out)
    }
}

impl EyeLandmarkProvider for MeshLandmarks {
    fn get_eye_landmarks(&self, side: EyeSide) -> Result<EyeLandmarkSet, LandmarkError> {
        if self.points.len() < MIN_MESH_POINTS {
            return Err(LandmarkError::TooFewPoints {
                expected: MIN_MESH_POINTS,
                actual: self.points.len(),
            });
        }
        let idx = indices(side);
        Ok(EyeLandmarkSet {
            iris: self.gather(side, idx.iris)?,
            corners: self.gather(side, idx.corners)?,
            lids: self.gather(side, idx.lids)?,
        })
    }
}

/// Resolves both eyes from a raw mesh.
///
/// # Errors
///
/// Returns an error if the mesh violates the landmark contract.
pub fn face_from_mesh(raw: &[Vec<f32>]) -> Result<FaceLandmarks, LandmarkError> {
    MeshLandmarks::from_components(raw)?.face_landmarks()
}

//! Landmark source ports.

use time::OffsetDateTime;

use crate::domain::{EyeLandmarkSet, EyeSide, FaceLandmarks, LandmarkError};

/// One detector output.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Position in the stream (0-based).
    pub index: usize,
    /// Capture time.
    pub timestamp: OffsetDateTime,
    /// What the detector reported.
    pub detection: Detection,
}

impl Frame {
    /// The usable face in this frame, if any.
    #[must_use]
    pub fn face(&self) -> Option<&FaceLandmarks> {
        match &self.detection {
            Detection::Face(face) => Some(face),
            Detection::NoFace | Detection::Malformed(_) => None,
        }
    }
}

/// Detector output for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// The first detected face.
    Face(FaceLandmarks),
    /// No face was found.
    NoFace,
    /// The detector output violated the landmark contract.
    Malformed(LandmarkError),
}

impl From<Option<FaceLandmarks>> for Detection {
    fn from(face: Option<FaceLandmarks>) -> Self {
        face.map_or(Self::NoFace, Self::Face)
    }
}

/// Port for a stream of detector outputs.
pub trait LandmarkSource: Send + Sync {
    /// Returns an iterator over frames in capture order.
    ///
    /// # Errors
    ///
    /// Individual items are errors when a record cannot be read at all.
    /// Readable but malformed detector output is [`Detection::Malformed`].
    fn frames(&self) -> Box<dyn Iterator<Item = anyhow::Result<Frame>> + Send + '_>;

    /// Returns the total number of frames, if known.
    fn count_hint(&self) -> Option<usize>;
}

/// Capability that resolves one eye's landmarks from a detector output.
///
/// Keeps the detector's index topology out of the core.
pub trait EyeLandmarkProvider {
    /// Returns the landmark set for one eye.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector output violates the landmark contract.
    fn get_eye_landmarks(&self, side: EyeSide) -> Result<EyeLandmarkSet, LandmarkError>;

    /// Resolves both eyes.
    ///
    /// # Errors
    ///
    /// Returns the first eye's error.
    fn face_landmarks(&self) -> Result<FaceLandmarks, LandmarkError> {
        Ok(FaceLandmarks {
            left: self.get_eye_landmarks(EyeSide::Left)?,
            right: self.get_eye_landmarks(EyeSide::Right)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn malformed_frame() -> Frame {
        Frame {
            index: 4,
            timestamp: datetime!(2024-05-01 09:00:00 UTC),
            detection: Detection::Malformed(LandmarkError::TooFewPoints {
                expected: 478,
                actual: 12,
            }),
        }
    }

    #[test]
    fn test_malformed_frame_clones_with_error() {
        let frame = malformed_frame();
        let copy = frame.clone();
        assert_eq!(copy, frame);
        assert!(copy.face().is_none());
    }

    #[test]
    fn test_malformed_detection_repeats() {
        let detections: Vec<_> = std::iter::repeat(malformed_frame().detection)
            .take(3)
            .collect();
        assert!(detections
            .iter()
            .all(|d| matches!(d, Detection::Malformed(LandmarkError::TooFewPoints { actual: 12, .. }))));
    }

    #[test]
    fn test_option_into_detection() {
        assert_eq!(Detection::from(None), Detection::NoFace);
    }
}

//! Core domain types for gaze tracking.

mod error;
mod landmark;
mod offset;
mod status;

pub use error::{DeliveryError, LandmarkError};
pub use landmark::{EyeLandmarkSet, EyeSide, FaceLandmarks, LandmarkPoint};
pub use offset::GazeOffset;
pub use status::{FocusStatus, FrameResult, StatusEvent};

//! Iris Watch Core - gaze classification and focus tracking
//!
//! This crate turns per-frame eye landmarks into gaze offset ratios, classifies
//! each eye as centered or not, and debounces the result into a focus status
//! with a sustained-inattention alert and throttled status reports.

pub mod domain;
pub mod gaze;
pub mod ports;
pub mod session;
pub mod tracker;

pub use domain::{
    DeliveryError, EyeLandmarkSet, EyeSide, FaceLandmarks, FocusStatus, FrameResult, GazeOffset,
    LandmarkError, LandmarkPoint, StatusEvent,
};
pub use gaze::{
    compute_offset, is_centered, CenterThresholds, CENTER_ANGLE_HORIZONTAL_THRESHOLD,
    CENTER_ANGLE_VERTICAL_THRESHOLD,
};
pub use ports::{
    Detection, EyeLandmarkProvider, Frame, LandmarkSource, MonitorEvent, MonitorSink, NullMonitor,
    StatusSink,
};
pub use session::{deliver, run_session, SessionSummary};
pub use tracker::{FocusState, FocusTracker, TrackerConfig, ALERT_FRAME_THRESHOLD, REPORT_INTERVAL};

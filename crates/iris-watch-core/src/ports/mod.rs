//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the tracking core and external adapters.

mod landmark_source;
mod monitor;
mod status_sink;

pub use landmark_source::{Detection, EyeLandmarkProvider, Frame, LandmarkSource};
pub use monitor::{MonitorEvent, MonitorSink, NullMonitor};
pub use status_sink::StatusSink;

//! Test support utilities for iris-watch.
//!
//! Provides mocks, synthetic landmark builders, and utilities for testing
//! the focus tracking pipeline.
//!
//! # Example
//!
//! ```
//! use iris_watch_test_support::{FaceBuilder, FrameScript, MockLandmarkSource};
//!
//! // Two focused frames followed by one frame without a face
//! let frames = FrameScript::new(30.0)
//!     .faces(2, FaceBuilder::centered().build())
//!     .no_face(1)
//!     .build();
//!
//! let source = MockLandmarkSource::new(frames);
//! ```

mod builders;
mod mocks;

pub use builders::{EyeBuilder, FaceBuilder, FrameScript, MeshBuilder, SCRIPT_START};
pub use mocks::{MockLandmarkSource, MockMonitorSink, MockStatusSink};

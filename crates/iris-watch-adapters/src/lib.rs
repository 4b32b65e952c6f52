//! Iris Watch Adapters - External adapters for iris-watch.
//!
//! This crate provides adapters for:
//! - Face-mesh landmark topology (fixed index contract)
//! - JSON Lines landmark replay (file or stdin)
//! - HTTP collector delivery
//! - Local focus log files
//! - Background, non-blocking delivery

pub mod background;
pub mod focus_log;
pub mod http;
pub mod mesh;
pub mod replay;

pub use background::BackgroundSink;
pub use focus_log::FocusLogSink;
pub use http::HttpStatusSink;
pub use mesh::{face_from_mesh, MeshLandmarks};
pub use replay::{Clock, JsonlLandmarkSource, ReplayInput};

//! Typed errors at the core's boundaries.

use thiserror::Error;

use super::EyeSide;

/// Detector output that violates the landmark contract.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LandmarkError {
    /// The mesh has fewer points than the index contract needs.
    #[error("expected at least {expected} landmarks, got {actual}")]
    TooFewPoints {
        /// Minimum number of points required.
        expected: usize,
        /// Number of points supplied.
        actual: usize,
    },
    /// A point the core reads has a NaN or infinite coordinate.
    #[error("landmark {index} of the {side} eye is not finite")]
    NonFinite {
        /// Eye the point belongs to.
        side: EyeSide,
        /// Detector index of the point.
        index: usize,
    },
    /// A point is missing a coordinate.
    #[error("landmark {index} has {components} components, expected 2 or 3")]
    BadShape {
        /// Detector index of the point.
        index: usize,
        /// Number of components found.
        components: usize,
    },
}

/// Failure to deliver a status event.
///
/// Delivery is best-effort: callers log and discard these.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The collector could not be reached or rejected the request.
    #[error("network delivery failed: {0}")]
    Network(String),
    /// A local log file could not be written.
    #[error("log write failed: {0}")]
    Io(#[from] std::io::Error),
    /// The event could not be encoded.
    #[error("encoding failed: {0}")]
    Encode(String),
    /// The background queue is full or its worker has stopped.
    #[error("delivery queue unavailable: {0}")]
    Queue(String),
}

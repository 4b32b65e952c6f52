//! Monitor port for UI integration.

use crate::domain::{FrameResult, StatusEvent};

/// Events emitted while a session runs.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A frame was classified.
    FrameProcessed {
        /// Index in the stream.
        index: usize,
        /// Classification result.
        result: FrameResult,
    },
    /// A frame's detector output was unusable and counted as unfocused.
    FrameSkipped {
        /// Index in the stream.
        index: usize,
        /// Reason the output was rejected.
        reason: String,
    },
    /// The unfocused run crossed the alert threshold.
    AlertRaised {
        /// Index of the frame that raised the alert.
        index: usize,
        /// Unfocused frames so far.
        unfocused_frames: u32,
    },
    /// A focused frame cleared the alert.
    AlertCleared {
        /// Index of the frame that cleared the alert.
        index: usize,
    },
    /// A status report was produced.
    Reported {
        /// The report.
        event: StatusEvent,
    },
    /// The source is exhausted.
    Finished {
        /// Frames processed.
        frames: usize,
        /// Reports produced.
        reports: usize,
    },
}

/// Port for receiving monitor events.
pub trait MonitorSink: Send + Sync {
    /// Called when a monitor event occurs.
    fn on_event(&self, event: MonitorEvent);
}

/// A monitor that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMonitor;

impl MonitorSink for NullMonitor {
    fn on_event(&self, _event: MonitorEvent) {}
}

//! Output formatting for CLI.

mod json;
mod status_line;

use iris_watch_core::{MonitorEvent, MonitorSink};

pub use json::JsonOutput;
pub use status_line::StatusLine;

/// Forwards every monitor event to several sinks in order.
pub struct MonitorFanout {
    sinks: Vec<Box<dyn MonitorSink>>,
}

impl MonitorFanout {
    /// Creates a fan-out over `sinks`.
    #[must_use]
    pub fn new(sinks: Vec<Box<dyn MonitorSink>>) -> Self {
        Self { sinks }
    }
}

impl MonitorSink for MonitorFanout {
    fn on_event(&self, event: MonitorEvent) {
        for sink in &self.sinks {
            sink.on_event(event.clone());
        }
    }
}

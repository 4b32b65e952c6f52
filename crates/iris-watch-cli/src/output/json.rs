//! JSON Lines output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use iris_watch_core::{FrameResult, MonitorEvent, MonitorSink};
use serde::Serialize;
use tracing::warn;

/// A frame result tagged with its index.
#[derive(Serialize)]
struct FrameLine<'a> {
    frame: usize,
    #[serde(flatten)]
    result: &'a FrameResult,
}

/// Writes status reports (and optionally every frame result) as JSONL.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    frames: bool,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout(frames: bool) -> Self {
        Self::new(Box::new(io::stdout()), frames)
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, frames: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            frames,
        }
    }

    /// Writes one value as a single line.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write<T: Serialize>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }

    /// Flushes the underlying writer.
    #[allow(clippy::significant_drop_tightening)]
    pub fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}

impl MonitorSink for JsonOutput {
    fn on_event(&self, event: MonitorEvent) {
        let written = match event {
            MonitorEvent::Reported { event } => self.write(&event),
            MonitorEvent::FrameProcessed { index, result } if self.frames => self.write(&FrameLine {
                frame: index,
                result: &result,
            }),
            MonitorEvent::Finished { .. } => self.flush(),
            _ => Ok(()),
        };
        if let Err(e) = written {
            warn!("Failed to write output: {e:#}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, PoisonError};

    use iris_watch_core::{FocusStatus, GazeOffset, StatusEvent};
    use time::macros::datetime;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn lines(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    fn frame_result() -> FrameResult {
        FrameResult {
            focused: true,
            left: Some(GazeOffset::new(0.1, 0.0)),
            right: Some(GazeOffset::new(0.0, 0.1)),
            unfocused_frames: 0,
            alert_active: false,
        }
    }

    #[test]
    fn test_reports_written_as_lines() {
        let buffer = SharedBuffer::default();
        let output = JsonOutput::new(Box::new(buffer.clone()), false);

        output.on_event(MonitorEvent::Reported {
            event: StatusEvent {
                timestamp: datetime!(2024-05-01 09:00:05 UTC),
                status: FocusStatus::Focused,
                duration: 5.0,
            },
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["status"], "focused");
        assert_eq!(lines[0]["timestamp"], "2024-05-01T09:00:05Z");
    }

    #[test]
    fn test_frames_hidden_by_default() {
        let buffer = SharedBuffer::default();
        let output = JsonOutput::new(Box::new(buffer.clone()), false);

        output.on_event(MonitorEvent::FrameProcessed {
            index: 0,
            result: frame_result(),
        });

        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn test_frames_tagged_with_index() {
        let buffer = SharedBuffer::default();
        let output = JsonOutput::new(Box::new(buffer.clone()), true);

        output.on_event(MonitorEvent::FrameProcessed {
            index: 7,
            result: frame_result(),
        });

        let lines = buffer.lines();
        assert_eq!(lines[0]["frame"], 7);
        assert_eq!(lines[0]["focused"], true);
        assert_eq!(lines[0]["unfocused_frames"], 0);
    }
}

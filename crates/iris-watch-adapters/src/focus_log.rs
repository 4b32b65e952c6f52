//! Local focus log adapter.
//!
//! Mirrors every delivered event to two files in the log directory:
//! - `focus_log.json`: the session's events as a pretty JSON array
//! - `focus_log.txt`: one `<timestamp> - <status>` line per event
//!
//! The first event of a session starts a fresh array. Later events are
//! spliced in before the closing bracket, so each write costs one entry.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use iris_watch_core::{DeliveryError, StatusEvent, StatusSink};
use time::format_description::well_known::Rfc3339;

/// JSON log file name.
pub const JSON_LOG_FILE: &str = "focus_log.json";
/// Text log file name.
pub const TEXT_LOG_FILE: &str = "focus_log.txt";

const ARRAY_TAIL: [u8; 2] = *b"\n]";
const ARRAY_TAIL_OFFSET: i64 = -2;

/// Focus log sink adapter.
pub struct FocusLogSink {
    dir: PathBuf,
    /// Entries in the JSON array written this session.
    written: Mutex<usize>,
}

impl FocusLogSink {
    /// Creates a sink writing into `dir`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            written: Mutex::new(0),
        }
    }

    /// Directory the log files live in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of events in this session's JSON log.
    #[must_use]
    pub fn len(&self) -> usize {
        *self.written.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether nothing has been logged yet this session.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn append_json(&self, written: &mut usize, event: &StatusEvent) -> Result<(), DeliveryError> {
        let entry =
            serde_json::to_string_pretty(event).map_err(|e| DeliveryError::Encode(e.to_string()))?;
        let entry = entry
            .lines()
            .map(|line| format!("  {line}"))
            .collect::<Vec<_>>()
            .join("\n");

        let path = self.dir.join(JSON_LOG_FILE);
        if *written > 0 {
            let mut file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)?;
            if ends_with_array_tail(&mut file)? {
                file.seek(SeekFrom::End(ARRAY_TAIL_OFFSET))?;
                write!(file, ",\n{entry}\n]")?;
                *written += 1;
                return Ok(());
            }
        }

        // First entry, or the file was changed underneath us.
        let mut file = File::create(&path)?;
        write!(file, "[\n{entry}\n]")?;
        *written = 1;
        Ok(())
    }

    fn append_text(&self, event: &StatusEvent) -> Result<(), DeliveryError> {
        let timestamp = event
            .timestamp
            .format(&Rfc3339)
            .map_err(|e| DeliveryError::Encode(e.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(TEXT_LOG_FILE))?;
        writeln!(file, "{timestamp} - {}", event.status)?;
        Ok(())
    }
}

fn ends_with_array_tail(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() < 2 {
        return Ok(false);
    }
    let mut tail = [0u8; ARRAY_TAIL.len()];
    file.seek(SeekFrom::End(ARRAY_TAIL_OFFSET))?;
    file.read_exact(&mut tail)?;
    Ok(tail == ARRAY_TAIL)
}

impl StatusSink for FocusLogSink {
    fn name(&self) -> &'static str {
        "focus-log"
    }

    #[allow(clippy::significant_drop_tightening)]
    fn send(&self, event: &StatusEvent) -> Result<(), DeliveryError> {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);

        // Both files are attempted even if the first write fails.
        let json = self.append_json(&mut written, event);
        let text = self.append_text(event);
        json.and(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use iris_watch_core::FocusStatus;
    use time::macros::datetime;

    fn event(status: FocusStatus) -> StatusEvent {
        StatusEvent {
            timestamp: datetime!(2024-05-01 09:00:05 UTC),
            status,
            duration: 5.0,
        }
    }

    #[test]
    fn test_missing_directory_fails() {
        let sink = FocusLogSink::new("/nonexistent/iris-watch/logs");
        assert!(sink.send(&event(FocusStatus::Focused)).is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_json_log_stays_a_valid_array() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FocusLogSink::new(dir.path());
        for status in [FocusStatus::Focused, FocusStatus::Unfocused, FocusStatus::Focused] {
            sink.send(&event(status)).unwrap();
        }

        let text = std::fs::read_to_string(dir.path().join(JSON_LOG_FILE)).unwrap();
        let entries: Vec<StatusEvent> = serde_json::from_str(&text).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].status, FocusStatus::Unfocused);
        assert_eq!(sink.len(), 3);
        assert!(text.starts_with("[\n  {\n"));
    }

    #[test]
    fn test_new_session_starts_fresh_array() {
        let dir = tempfile::tempdir().unwrap();
        FocusLogSink::new(dir.path())
            .send(&event(FocusStatus::Focused))
            .unwrap();

        let sink = FocusLogSink::new(dir.path());
        sink.send(&event(FocusStatus::Unfocused)).unwrap();

        let text = std::fs::read_to_string(dir.path().join(JSON_LOG_FILE)).unwrap();
        let entries: Vec<StatusEvent> = serde_json::from_str(&text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, FocusStatus::Unfocused);
    }

    #[test]
    fn test_truncated_json_log_is_restarted() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FocusLogSink::new(dir.path());
        sink.send(&event(FocusStatus::Focused)).unwrap();
        std::fs::write(dir.path().join(JSON_LOG_FILE), "[\n  {").unwrap();

        sink.send(&event(FocusStatus::Unfocused)).unwrap();

        let text = std::fs::read_to_string(dir.path().join(JSON_LOG_FILE)).unwrap();
        let entries: Vec<StatusEvent> = serde_json::from_str(&text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_name() {
        assert_eq!(FocusLogSink::new(".").name(), "focus-log");
    }
}

//! Mock implementations of core port traits.

use std::sync::{Arc, Mutex, PoisonError};

use iris_watch_core::ports::{Frame, LandmarkSource, MonitorEvent, MonitorSink, StatusSink};
use iris_watch_core::{DeliveryError, StatusEvent};

/// Mock implementation of `LandmarkSource` for testing.
///
/// Yields pre-built frames; `Err` entries become unreadable records.
pub struct MockLandmarkSource {
    frames: Vec<Result<Frame, String>>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockLandmarkSource {
    /// Creates a new mock source with the given frames.
    #[must_use]
    pub fn new(frames: Vec<Frame>) -> Self {
        Self::with_records(frames.into_iter().map(Ok).collect())
    }

    /// Creates a mock source that can also yield read errors.
    #[must_use]
    pub fn with_records(frames: Vec<Result<Frame, String>>) -> Self {
        Self {
            frames,
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl LandmarkSource for MockLandmarkSource {
    fn frames(&self) -> Box<dyn Iterator<Item = anyhow::Result<Frame>> + Send + '_> {
        if let Ok(mut c) = self.iteration_count.lock() {
            *c += 1;
        }
        Box::new(
            self.frames
                .iter()
                .cloned()
                .map(|r| r.map_err(anyhow::Error::msg)),
        )
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.frames.len())
    }
}

/// Mock implementation of `StatusSink` for testing.
///
/// Captures events for later assertions. A failing mock still records
/// every attempt but returns an error.
#[derive(Clone)]
pub struct MockStatusSink {
    events: Arc<Mutex<Vec<StatusEvent>>>,
    fail: bool,
}

impl MockStatusSink {
    /// Creates a sink that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Creates a sink whose deliveries always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Returns all events passed to `send`.
    #[must_use]
    pub fn events(&self) -> Vec<StatusEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `send` calls.
    #[must_use]
    pub fn send_count(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for MockStatusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for MockStatusSink {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn send(&self, event: &StatusEvent) -> Result<(), DeliveryError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        if self.fail {
            Err(DeliveryError::Network("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

/// Mock implementation of `MonitorSink` for testing.
///
/// Captures events for later assertions.
pub struct MockMonitorSink {
    events: Arc<Mutex<Vec<MonitorEvent>>>,
}

impl MockMonitorSink {
    /// Creates a new mock monitor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<MonitorEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `FrameProcessed` events.
    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.count(|e| matches!(e, MonitorEvent::FrameProcessed { .. }))
    }

    /// Returns the number of `FrameSkipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|e| matches!(e, MonitorEvent::FrameSkipped { .. }))
    }

    /// Returns the number of `AlertRaised` events.
    #[must_use]
    pub fn alerts_raised(&self) -> usize {
        self.count(|e| matches!(e, MonitorEvent::AlertRaised { .. }))
    }

    /// Returns the number of `AlertCleared` events.
    #[must_use]
    pub fn alerts_cleared(&self) -> usize {
        self.count(|e| matches!(e, MonitorEvent::AlertCleared { .. }))
    }

    /// Returns the indices of frames that raised an alert.
    #[must_use]
    pub fn alert_frames(&self) -> Vec<usize> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                MonitorEvent::AlertRaised { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            MonitorEvent::Finished { frames, reports } => Some((*frames, *reports)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&MonitorEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl Default for MockMonitorSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorSink for MockMonitorSink {
    fn on_event(&self, event: MonitorEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

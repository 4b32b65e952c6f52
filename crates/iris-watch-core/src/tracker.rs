//! Focus state tracking.
//!
//! Folds both eyes' center decisions into one focus boolean per frame,
//! counts consecutive unfocused frames, and throttles status reports to a
//! fixed wall-clock interval.
//!
//! The alert climbs over `alert_frame_threshold` unfocused frames but
//! clears on the first focused frame; there is no cooldown on the way down.

use std::time::Duration;

use time::OffsetDateTime;
use tracing::{debug, trace};

use crate::domain::{FaceLandmarks, FocusStatus, FrameResult, StatusEvent};
use crate::gaze::{compute_offset, CenterThresholds};

/// Unfocused frames tolerated before the alert fires (~1.5 s at 30 fps).
pub const ALERT_FRAME_THRESHOLD: u32 = 45;

/// Minimum spacing between status reports.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Tunables for a [`FocusTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Per-eye center thresholds.
    pub thresholds: CenterThresholds,
    /// Alert fires once the unfocused run exceeds this many frames.
    pub alert_frame_threshold: u32,
    /// Minimum wall-clock spacing between reports.
    pub report_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            thresholds: CenterThresholds::default(),
            alert_frame_threshold: ALERT_FRAME_THRESHOLD,
            report_interval: REPORT_INTERVAL,
        }
    }
}

impl TrackerConfig {
    /// Sets the center thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: CenterThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Sets the alert frame threshold.
    #[must_use]
    pub const fn with_alert_frame_threshold(mut self, frames: u32) -> Self {
        self.alert_frame_threshold = frames;
        self
    }

    /// Sets the report interval.
    #[must_use]
    pub const fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }
}

/// The only state that outlives a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
    /// Length of the current unfocused run; 0 after any focused frame.
    pub consecutive_unfocused_frames: u32,
    /// Focus boolean of the most recent frame.
    pub focused: bool,
    /// When the last report was emitted (or tracking started).
    pub last_report_time: OffsetDateTime,
}

impl FocusState {
    /// Fresh state with zeroed counters.
    #[must_use]
    pub const fn new(started_at: OffsetDateTime) -> Self {
        Self {
            consecutive_unfocused_frames: 0,
            focused: false,
            last_report_time: started_at,
        }
    }

    /// Whether the unfocused run has exceeded `threshold` frames.
    #[must_use]
    pub const fn alert_active(&self, threshold: u32) -> bool {
        self.consecutive_unfocused_frames > threshold
    }
}

/// Debounces per-frame focus decisions into a stable status and alert.
#[derive(Debug, Clone)]
pub struct FocusTracker {
    config: TrackerConfig,
    state: FocusState,
}

impl FocusTracker {
    /// Creates a tracker that starts counting at `started_at`.
    #[must_use]
    pub const fn new(config: TrackerConfig, started_at: OffsetDateTime) -> Self {
        Self {
            config,
            state: FocusState::new(started_at),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &FocusState {
        &self.state
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Whether the sustained-inattention alert is active.
    #[must_use]
    pub const fn alert_active(&self) -> bool {
        self.state.alert_active(self.config.alert_frame_threshold)
    }

    /// Processes one frame.
    ///
    /// `None` means no face was detected, which counts as unfocused.
    /// The frame is focused only if both eyes are independently centered.
    pub fn process_frame(
        &mut self,
        face: Option<&FaceLandmarks>,
        now: OffsetDateTime,
    ) -> FrameResult {
        let (focused, left, right) = match face {
            Some(face) => {
                let left = compute_offset(&face.left);
                let right = compute_offset(&face.right);
                let thresholds = &self.config.thresholds;
                let focused = thresholds.is_centered(&left) && thresholds.is_centered(&right);
                (focused, Some(left), Some(right))
            }
            None => (false, None, None),
        };

        if focused {
            self.state.consecutive_unfocused_frames = 0;
        } else {
            self.state.consecutive_unfocused_frames =
                self.state.consecutive_unfocused_frames.saturating_add(1);
        }
        self.state.focused = focused;

        let alert_active = self.alert_active();

        trace!(
            %now,
            focused,
            unfocused_frames = self.state.consecutive_unfocused_frames,
            alert_active,
            "frame processed"
        );

        FrameResult {
            focused,
            left,
            right,
            unfocused_frames: self.state.consecutive_unfocused_frames,
            alert_active,
        }
    }

    /// Emits a status event if the report interval has elapsed.
    ///
    /// The event carries the focus state of the latest frame, not an
    /// aggregate over the interval.
    pub fn maybe_report(&mut self, now: OffsetDateTime) -> Option<StatusEvent> {
        let elapsed = now - self.state.last_report_time;
        if elapsed < self.config.report_interval {
            return None;
        }

        let event = StatusEvent {
            timestamp: now,
            status: FocusStatus::from_focused(self.state.focused),
            duration: elapsed.as_seconds_f64(),
        };
        self.state.last_report_time = now;

        debug!(status = %event.status, duration = event.duration, "status report due");
        Some(event)
    }
}

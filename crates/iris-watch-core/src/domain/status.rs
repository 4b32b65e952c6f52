//! Per-frame results and status events.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::GazeOffset;

/// Binary attention signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusStatus {
    /// Both eyes are centered on the screen.
    Focused,
    /// Looking away, or no face in view.
    Unfocused,
}

impl FocusStatus {
    /// Converts a focus boolean into a status.
    #[must_use]
    pub const fn from_focused(focused: bool) -> Self {
        if focused {
            Self::Focused
        } else {
            Self::Unfocused
        }
    }

    /// Returns true for [`FocusStatus::Focused`].
    #[must_use]
    pub const fn is_focused(self) -> bool {
        matches!(self, Self::Focused)
    }

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Focused => "focused",
            Self::Unfocused => "unfocused",
        }
    }
}

impl std::fmt::Display for FocusStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status snapshot handed to the reporting collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// When the snapshot was taken (RFC 3339 on the wire).
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Instantaneous focus state at report time.
    pub status: FocusStatus,
    /// Seconds covered by this report (time since the previous one).
    pub duration: f64,
}

impl StatusEvent {
    /// Returns true if the event reports a focused state.
    #[must_use]
    pub const fn focused(&self) -> bool {
        self.status.is_focused()
    }
}

/// Outcome of processing a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    /// Whether both eyes were classified as centered.
    pub focused: bool,
    /// Left eye offset, if a face was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<GazeOffset>,
    /// Right eye offset, if a face was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<GazeOffset>,
    /// Consecutive unfocused frames including this one.
    pub unfocused_frames: u32,
    /// Sustained-inattention alert.
    pub alert_active: bool,
}

impl FrameResult {
    /// Focus status of this frame.
    #[must_use]
    pub const fn status(&self) -> FocusStatus {
        FocusStatus::from_focused(self.focused)
    }

    /// Whether a face was detected in this frame.
    #[must_use]
    pub const fn face_detected(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Average of both eyes' offsets, for display.
    #[must_use]
    pub fn average_offset(&self) -> Option<GazeOffset> {
        match (&self.left, &self.right) {
            (Some(l), Some(r)) => Some(GazeOffset::average(l, r)),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&FocusStatus::Focused).unwrap(),
            "\"focused\""
        );
        assert_eq!(
            serde_json::to_string(&FocusStatus::Unfocused).unwrap(),
            "\"unfocused\""
        );
    }

    #[test]
    fn test_status_event_json_shape() {
        let event = StatusEvent {
            timestamp: datetime!(2024-05-01 12:00:05 UTC),
            status: FocusStatus::Unfocused,
            duration: 5.0,
        };
        let value: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["timestamp"], "2024-05-01T12:00:05Z");
        assert_eq!(value["status"], "unfocused");
        assert_eq!(value["duration"], 5.0);
        assert!(!event.focused());
    }

    #[test]
    fn test_frame_result_without_face() {
        let result = FrameResult {
            focused: false,
            left: None,
            right: None,
            unfocused_frames: 1,
            alert_active: false,
        };
        assert!(!result.face_detected());
        assert!(result.average_offset().is_none());
        assert_eq!(result.status(), FocusStatus::Unfocused);

        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("left"));
    }
}

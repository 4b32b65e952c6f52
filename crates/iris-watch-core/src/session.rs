//! Frame-driven monitoring session.
//!
//! Runs each frame through extraction, classification and hysteresis,
//! then hands due reports to every status sink. Sink failures are logged
//! and dropped; they never reach the tracker.

use tracing::{debug, info, warn};

use crate::domain::StatusEvent;
use crate::ports::{Detection, LandmarkSource, MonitorEvent, MonitorSink, StatusSink};
use crate::tracker::FocusTracker;

/// Counters for a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Frames run through the tracker.
    pub frames: usize,
    /// Frames classified as focused.
    pub focused_frames: usize,
    /// Frames with malformed detector output (counted as unfocused).
    pub malformed: usize,
    /// Records the source could not read (not processed).
    pub unreadable: usize,
    /// Status reports produced.
    pub reports: usize,
    /// Times the sustained-inattention alert was raised.
    pub alerts_raised: usize,
}

/// Delivers an event to every sink independently.
///
/// Returns the number of sinks that accepted it.
pub fn deliver(sinks: &[Box<dyn StatusSink>], event: &StatusEvent) -> usize {
    let mut delivered = 0;
    for sink in sinks {
        match sink.send(event) {
            Ok(()) => delivered += 1,
            Err(e) => debug!("Status sink {} failed: {e}", sink.name()),
        }
    }
    delivered
}

/// Processes every frame from `source` in order.
pub fn run_session(
    source: &dyn LandmarkSource,
    tracker: &mut FocusTracker,
    sinks: &[Box<dyn StatusSink>],
    monitor: &dyn MonitorSink,
) -> SessionSummary {
    let mut summary = SessionSummary::default();
    let mut alerting = tracker.alert_active();

    info!(
        "Starting session ({} frames expected)",
        source
            .count_hint()
            .map_or_else(|| "unknown".to_string(), |n| n.to_string())
    );

    for item in source.frames() {
        let frame = match item {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping unreadable frame record: {e:#}");
                monitor.on_event(MonitorEvent::FrameSkipped {
                    index: summary.frames + summary.unreadable,
                    reason: format!("{e:#}"),
                });
                summary.unreadable += 1;
                continue;
            }
        };

        if let Detection::Malformed(ref e) = frame.detection {
            warn!("Frame {}: malformed landmarks, counting as unfocused: {e}", frame.index);
            monitor.on_event(MonitorEvent::FrameSkipped {
                index: frame.index,
                reason: e.to_string(),
            });
            summary.malformed += 1;
        }

        let result = tracker.process_frame(frame.face(), frame.timestamp);
        summary.frames += 1;
        if result.focused {
            summary.focused_frames += 1;
        }

        if result.alert_active != alerting {
            alerting = result.alert_active;
            if alerting {
                info!(
                    "Frame {}: sustained inattention after {} frames",
                    frame.index, result.unfocused_frames
                );
                summary.alerts_raised += 1;
                monitor.on_event(MonitorEvent::AlertRaised {
                    index: frame.index,
                    unfocused_frames: result.unfocused_frames,
                });
            } else {
                info!("Frame {}: attention recovered", frame.index);
                monitor.on_event(MonitorEvent::AlertCleared { index: frame.index });
            }
        }

        monitor.on_event(MonitorEvent::FrameProcessed {
            index: frame.index,
            result,
        });

        if let Some(event) = tracker.maybe_report(frame.timestamp) {
            let delivered = deliver(sinks, &event);
            debug!(
                "Report {} delivered to {delivered}/{} sinks",
                event.status,
                sinks.len()
            );
            summary.reports += 1;
            monitor.on_event(MonitorEvent::Reported { event });
        }
    }

    monitor.on_event(MonitorEvent::Finished {
        frames: summary.frames,
        reports: summary.reports,
    });

    info!(
        "Session finished: {} frames, {} focused, {} reports, {} alerts",
        summary.frames, summary.focused_frames, summary.reports, summary.alerts_raised
    );

    summary
}

//! Terminal status line using indicatif.

use indicatif::{ProgressBar, ProgressStyle};
use iris_watch_core::{FrameResult, MonitorEvent, MonitorSink};

/// Message shown while the sustained-inattention alert is active.
pub const ALERT_MESSAGE: &str = "LOOK AT SCREEN!";

/// Live focus indicator on stderr.
pub struct StatusLine {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl StatusLine {
    /// Creates a new status line.
    ///
    /// # Arguments
    ///
    /// * `total` - Total number of frames, if known
    /// * `quiet` - If true, suppress all output
    /// * `show_bar` - If true, draw a live bar; otherwise print alert transitions only
    #[must_use]
    pub fn new(total: Option<u64>, quiet: bool, show_bar: bool) -> Self {
        if quiet {
            return Self {
                bar: None,
                quiet: true,
            };
        }

        let bar = if show_bar {
            let (bar, template) = total.map_or_else(
                || {
                    (
                        ProgressBar::new_spinner(),
                        "{spinner:.green} [{elapsed_precise}] {pos} frames {msg}",
                    )
                },
                |t| {
                    (
                        ProgressBar::new(t),
                        "{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}",
                    )
                },
            );

            if let Ok(style) = ProgressStyle::default_bar().template(template) {
                bar.set_style(style.progress_chars("#>-"));
            }

            Some(bar)
        } else {
            None
        };

        Self { bar, quiet }
    }
}

/// Status text for one frame.
fn describe(result: &FrameResult) -> String {
    if result.alert_active {
        return ALERT_MESSAGE.to_string();
    }
    match (result.status().as_str(), result.average_offset()) {
        (status, Some(offset)) => format!("{} {offset}", status.to_uppercase()),
        (status, None) => format!("{} (no face)", status.to_uppercase()),
    }
}

impl MonitorSink for StatusLine {
    fn on_event(&self, event: MonitorEvent) {
        if self.quiet {
            return;
        }

        match event {
            MonitorEvent::FrameProcessed { result, .. } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                    bar.set_message(describe(&result));
                }
            }
            MonitorEvent::AlertRaised {
                index,
                unfocused_frames,
            } => {
                if self.bar.is_none() {
                    eprintln!("{ALERT_MESSAGE} (frame {index}, {unfocused_frames} frames unfocused)");
                }
            }
            MonitorEvent::AlertCleared { index } => {
                if self.bar.is_none() {
                    eprintln!("Focus regained at frame {index}");
                }
            }
            MonitorEvent::FrameSkipped { .. } | MonitorEvent::Reported { .. } => {}
            MonitorEvent::Finished { frames, reports } => {
                if let Some(bar) = &self.bar {
                    bar.finish_with_message(format!("Done: {frames} frames, {reports} reports"));
                }
            }
        }
    }
}

//! Watch command - track focus from a landmark stream.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use iris_watch_adapters::background::DEFAULT_QUEUE_CAPACITY;
use iris_watch_adapters::http::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use iris_watch_adapters::replay::DEFAULT_FPS;
use iris_watch_adapters::{
    BackgroundSink, FocusLogSink, HttpStatusSink, JsonlLandmarkSource, ReplayInput,
};
use iris_watch_core::{
    run_session, CenterThresholds, FocusTracker, LandmarkSource, SessionSummary, StatusSink,
    TrackerConfig, ALERT_FRAME_THRESHOLD, CENTER_ANGLE_HORIZONTAL_THRESHOLD,
    CENTER_ANGLE_VERTICAL_THRESHOLD, REPORT_INTERVAL,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, MonitorFanout, StatusLine};

/// Parse a strictly positive, finite ratio threshold.
fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} must be greater than 0"))
    }
}

/// Parse a strictly positive, finite number (seconds or frames per second).
fn parse_positive(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} must be greater than 0"))
    }
}

/// Shared arguments for a watch session.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct WatchArgs {
    /// JSONL landmark file (`-` or omitted reads stdin)
    pub input: Option<PathBuf>,

    /// Horizontal centering threshold (absolute ratio)
    #[arg(long, value_parser = parse_threshold)]
    pub horizontal_threshold: Option<f32>,

    /// Vertical centering threshold (absolute ratio)
    #[arg(long, value_parser = parse_threshold)]
    pub vertical_threshold: Option<f32>,

    /// Unfocused frames tolerated before alerting
    #[arg(long, value_name = "FRAMES")]
    pub alert_frames: Option<u32>,

    /// Seconds between status reports
    #[arg(long, value_name = "SECS", value_parser = parse_positive)]
    pub report_interval: Option<f64>,

    /// Collector URL for status reports
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Do not deliver status reports to the collector
    #[arg(long)]
    pub no_report: bool,

    /// Directory for focus_log.json and focus_log.txt
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Frame rate for file records without timestamps
    #[arg(long, value_parser = parse_positive)]
    pub fps: Option<f64>,

    /// Emit every frame result as JSONL
    #[arg(long)]
    pub frames: bool,

    /// Show the live status line
    #[arg(long)]
    pub progress: bool,

    /// Suppress status line output
    #[arg(short, long)]
    pub quiet: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

/// Fully resolved settings for a session.
#[derive(Debug, Serialize)]
pub struct Settings {
    /// Center classification.
    pub gaze: GazeSettings,
    /// Alerting.
    pub alert: AlertSettings,
    /// Reporting.
    pub report: ReportSettings,
    /// Input.
    pub input: InputSettings,
}

/// Resolved `[gaze]` settings.
#[derive(Debug, Serialize)]
pub struct GazeSettings {
    pub horizontal_threshold: f64,
    pub vertical_threshold: f64,
}

/// Resolved `[alert]` settings.
#[derive(Debug, Serialize)]
pub struct AlertSettings {
    pub frame_threshold: u32,
}

/// Resolved `[report]` settings.
#[derive(Debug, Serialize)]
pub struct ReportSettings {
    pub enabled: bool,
    pub interval_secs: f64,
    pub endpoint: String,
    pub timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

/// Resolved `[input]` settings.
#[derive(Debug, Serialize)]
pub struct InputSettings {
    pub fps: f64,
}

impl WatchArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    ///
    /// For boolean flags: CLI `--no-report` always wins. Config can enable/disable
    /// only when the CLI flag wasn't explicitly set.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.no_report {
            if let Some(enabled) = config.report.enabled {
                args.no_report = !enabled;
            }
        }

        args.horizontal_threshold = args
            .horizontal_threshold
            .or(config.gaze.horizontal_threshold);
        args.vertical_threshold = args.vertical_threshold.or(config.gaze.vertical_threshold);
        args.alert_frames = args.alert_frames.or(config.alert.frame_threshold);
        args.report_interval = args.report_interval.or(config.report.interval_secs);
        args.fps = args.fps.or(config.input.fps);

        if args.endpoint.is_none() {
            args.endpoint.clone_from(&config.report.endpoint);
        }
        if args.log_dir.is_none() {
            args.log_dir.clone_from(&config.report.log_dir);
        }

        if !args.frames {
            args.frames = config.output.frames.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args.config = Some(config.clone());

        args
    }

    /// Where landmark records are read from.
    fn replay_input(&self) -> ReplayInput {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => ReplayInput::Path(path.clone()),
            _ => ReplayInput::Stdin,
        }
    }

    /// Center thresholds, falling back to the defaults for unusable values.
    fn thresholds(&self) -> CenterThresholds {
        let usable = |t: &f32| t.is_finite() && *t > 0.0;
        CenterThresholds::new(
            self.horizontal_threshold
                .filter(usable)
                .unwrap_or(CENTER_ANGLE_HORIZONTAL_THRESHOLD),
            self.vertical_threshold
                .filter(usable)
                .unwrap_or(CENTER_ANGLE_VERTICAL_THRESHOLD),
        )
    }

    fn alert_frames(&self) -> u32 {
        self.alert_frames.unwrap_or(ALERT_FRAME_THRESHOLD)
    }

    /// Report interval, falling back to the default for unusable values.
    fn report_interval(&self) -> Duration {
        self.report_interval
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .filter(|d| !d.is_zero())
            .unwrap_or(REPORT_INTERVAL)
    }

    fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn report_timeout_ms(&self) -> u64 {
        self.config
            .as_ref()
            .and_then(|c| c.report.timeout_ms)
            .filter(|&ms| ms > 0)
            .unwrap_or_else(|| u64::try_from(DEFAULT_TIMEOUT.as_millis()).unwrap_or(u64::MAX))
    }

    fn report_timeout(&self) -> Duration {
        Duration::from_millis(self.report_timeout_ms())
    }

    fn fps(&self) -> f64 {
        self.fps.unwrap_or(DEFAULT_FPS)
    }

    /// Tracker configuration from merged args.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig::default()
            .with_thresholds(self.thresholds())
            .with_alert_frame_threshold(self.alert_frames())
            .with_report_interval(self.report_interval())
    }

    /// The effective settings after layering.
    pub fn settings(&self) -> Settings {
        let thresholds = self.thresholds();
        Settings {
            gaze: GazeSettings {
                horizontal_threshold: widen(thresholds.horizontal),
                vertical_threshold: widen(thresholds.vertical),
            },
            alert: AlertSettings {
                frame_threshold: self.alert_frames(),
            },
            report: ReportSettings {
                enabled: !self.no_report,
                interval_secs: self.report_interval().as_secs_f64(),
                endpoint: self.endpoint().to_string(),
                timeout_ms: self.report_timeout_ms(),
                log_dir: self.log_dir.clone(),
            },
            input: InputSettings { fps: self.fps() },
        }
    }
}

/// Widens via the shortest decimal form so 0.26 prints as 0.26.
fn widen(value: f32) -> f64 {
    value.to_string().parse().unwrap_or_else(|_| f64::from(value))
}

/// Result of running the watch command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct WatchResult {
    /// Session counters.
    pub summary: SessionSummary,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the watch command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &WatchArgs) -> Result<WatchResult> {
    let input = args.replay_input();
    if let ReplayInput::Path(ref path) = input {
        if !path.is_file() {
            anyhow::bail!("Landmark file not found: {}", path.display());
        }
    }
    info!("Running watch command on {input:?}");

    let started_at = OffsetDateTime::now_utc();
    let source = JsonlLandmarkSource::new(input, args.fps(), started_at);
    let mut tracker = FocusTracker::new(args.tracker_config(), started_at);

    let sinks = build_sinks(args)?;

    let show_status = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let status_line = StatusLine::new(
        source.count_hint().map(|t| t as u64),
        args.quiet,
        show_status,
    );
    let monitor = MonitorFanout::new(vec![
        Box::new(JsonOutput::stdout(args.frames)),
        Box::new(status_line),
    ]);

    let summary = run_session(&source, &mut tracker, &sinks, &monitor);

    // Joins background delivery workers
    drop(sinks);

    if summary.frames == 0 && summary.unreadable > 0 {
        anyhow::bail!(
            "No readable landmark records ({} unreadable)",
            summary.unreadable
        );
    }

    let exit_code = if summary.alerts_raised > 0 {
        ExitCode::AlertRaised
    } else {
        ExitCode::Success
    };

    Ok(WatchResult { summary, exit_code })
}

/// Build status sinks based on merged args (CLI + config).
fn build_sinks(args: &WatchArgs) -> Result<Vec<Box<dyn StatusSink>>> {
    let mut sinks: Vec<Box<dyn StatusSink>> = Vec::new();

    if args.no_report {
        debug!("Collector delivery disabled");
    } else {
        let http = HttpStatusSink::new(args.endpoint(), args.report_timeout())?;
        info!("Reporting to {}", http.endpoint());
        let background = BackgroundSink::spawn(http, DEFAULT_QUEUE_CAPACITY)
            .context("Failed to start delivery worker")?;
        sinks.push(Box::new(background));
    }

    if let Some(ref dir) = args.log_dir {
        let background = BackgroundSink::spawn(focus_log(dir)?, DEFAULT_QUEUE_CAPACITY)
            .context("Failed to start focus log worker")?;
        sinks.push(Box::new(background));
    }

    Ok(sinks)
}

fn focus_log(dir: &Path) -> Result<FocusLogSink> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    debug!("Writing focus log to {}", dir.display());
    Ok(FocusLogSink::new(dir))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use clap::Parser;
    use iris_watch_core::{FocusStatus, StatusEvent};

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        watch: WatchArgs,
    }

    fn parse(args: &[&str]) -> WatchArgs {
        let mut argv = vec!["iris-watch"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().watch
    }

    fn config(toml: &str) -> AppConfig {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = WatchArgs::with_config(parse(&[]), &AppConfig::default());
        let settings = args.settings();

        assert_eq!(settings.gaze.horizontal_threshold, 0.26);
        assert_eq!(settings.gaze.vertical_threshold, 0.44);
        assert_eq!(settings.alert.frame_threshold, 45);
        assert_eq!(settings.report.interval_secs, 5.0);
        assert_eq!(settings.report.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.report.timeout_ms, 2000);
        assert!(settings.report.enabled);
        assert_eq!(settings.input.fps, 30.0);
        assert_eq!(args.replay_input(), ReplayInput::Stdin);
    }

    #[test]
    fn test_dash_reads_stdin() {
        assert_eq!(parse(&["-"]).replay_input(), ReplayInput::Stdin);
        assert_eq!(
            parse(&["frames.jsonl"]).replay_input(),
            ReplayInput::Path(PathBuf::from("frames.jsonl"))
        );
    }

    #[test]
    fn test_config_fills_missing_flags() {
        let cfg = config(
            r"
[gaze]
horizontal_threshold = 0.3

[alert]
frame_threshold = 10

[report]
enabled = false
timeout_ms = 250
",
        );
        let args = WatchArgs::with_config(parse(&[]), &cfg);
        let settings = args.settings();

        assert_eq!(settings.gaze.horizontal_threshold, 0.3);
        assert_eq!(settings.alert.frame_threshold, 10);
        assert!(!settings.report.enabled);
        assert_eq!(settings.report.timeout_ms, 250);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cfg = config(
            r"
[gaze]
vertical_threshold = 0.5

[report]
interval_secs = 10.0
",
        );
        let args = WatchArgs::with_config(
            parse(&["--vertical-threshold", "0.2", "--report-interval", "1.5"]),
            &cfg,
        );

        assert_eq!(args.settings().gaze.vertical_threshold, 0.2);
        assert_eq!(args.tracker_config().report_interval, Duration::from_millis(1500));
    }

    #[test]
    fn test_no_report_flag_beats_config() {
        let cfg = config("[report]\nenabled = true\n");
        let args = WatchArgs::with_config(parse(&["--no-report"]), &cfg);
        assert!(args.no_report);
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        let mut argv = vec!["iris-watch", "--horizontal-threshold", "0"];
        assert!(TestCli::try_parse_from(argv.iter().copied()).is_err());
        argv[2] = "abc";
        assert!(TestCli::try_parse_from(argv.iter().copied()).is_err());
    }

    #[test]
    fn test_invalid_config_interval_falls_back() {
        let cfg = config("[report]\ninterval_secs = -3.0\n");
        let args = WatchArgs::with_config(parse(&[]), &cfg);
        assert_eq!(args.tracker_config().report_interval, REPORT_INTERVAL);
    }

    #[test]
    fn test_build_sinks_respects_flags() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let args = WatchArgs::with_config(
            parse(&["--no-report", "--log-dir", log_dir.to_str().unwrap()]),
            &AppConfig::default(),
        );

        let sinks = build_sinks(&args).unwrap();
        assert_eq!(sinks.len(), 1);
        assert_eq!(sinks[0].name(), "focus-log");
        assert!(log_dir.is_dir());
    }

    #[test]
    fn test_focus_log_written_off_the_frame_loop() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        // A directory where the JSON log should be makes every write fail
        std::fs::create_dir_all(log_dir.join("focus_log.json")).unwrap();
        let args = WatchArgs::with_config(
            parse(&["--no-report", "--log-dir", log_dir.to_str().unwrap()]),
            &AppConfig::default(),
        );

        let sinks = build_sinks(&args).unwrap();
        let event = StatusEvent {
            timestamp: OffsetDateTime::UNIX_EPOCH,
            status: FocusStatus::Focused,
            duration: 5.0,
        };

        // Only the enqueue is seen by the caller
        assert!(sinks[0].send(&event).is_ok());
        drop(sinks);
        assert!(log_dir.join("focus_log.txt").is_file());
    }

    #[test]
    fn test_unusable_config_thresholds_fall_back() {
        let cfg = config(
            r"
[gaze]
horizontal_threshold = 0.0
vertical_threshold = -0.5
",
        );
        let thresholds = WatchArgs::with_config(parse(&[]), &cfg).thresholds();

        assert_eq!(thresholds.horizontal, CENTER_ANGLE_HORIZONTAL_THRESHOLD);
        assert_eq!(thresholds.vertical, CENTER_ANGLE_VERTICAL_THRESHOLD);
    }
}

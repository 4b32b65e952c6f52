//! Configuration file support for iris-watch.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/iris-watch/config.toml` (lowest priority)
//! - Project-local: `.iris-watch.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// File name of the project-local config.
pub const PROJECT_CONFIG_FILE: &str = ".iris-watch.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Center classification settings.
    pub gaze: GazeConfig,
    /// Sustained-inattention alert settings.
    pub alert: AlertConfig,
    /// Status reporting settings.
    pub report: ReportConfig,
    /// Landmark input settings.
    pub input: InputConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// Center classification configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    /// Maximum absolute horizontal ratio still considered centered.
    pub horizontal_threshold: Option<f32>,
    /// Maximum absolute vertical ratio still considered centered.
    pub vertical_threshold: Option<f32>,
}

/// Alert configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Unfocused frames tolerated before alerting.
    pub frame_threshold: Option<u32>,
}

/// Status reporting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Enable/disable delivery to the collector.
    pub enabled: Option<bool>,
    /// Seconds between reports.
    pub interval_secs: Option<f64>,
    /// Collector URL.
    pub endpoint: Option<String>,
    /// Collector request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Directory for the local focus log.
    pub log_dir: Option<PathBuf>,
}

/// Landmark input configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Frame rate used for records without timestamps.
    pub fps: Option<f64>,
}

/// Output configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Emit every frame result as JSONL.
    pub frames: Option<bool>,
    /// Show the status line even when stderr is not a terminal.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/iris-watch/config.toml`
    /// 2. Project-local: `.iris-watch.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(t) = self.gaze.horizontal_threshold {
            if !(t.is_finite() && t > 0.0) {
                return Err(format!("gaze.horizontal_threshold must be > 0, got {t}"));
            }
        }
        if let Some(t) = self.gaze.vertical_threshold {
            if !(t.is_finite() && t > 0.0) {
                return Err(format!("gaze.vertical_threshold must be > 0, got {t}"));
            }
        }

        if let Some(secs) = self.report.interval_secs {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(format!("report.interval_secs must be > 0, got {secs}"));
            }
        }
        if self.report.timeout_ms == Some(0) {
            return Err("report.timeout_ms must be > 0".to_string());
        }
        if let Some(ref url) = self.report.endpoint {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!(
                    "report.endpoint must be an http(s) URL, got '{url}'"
                ));
            }
        }

        if let Some(fps) = self.input.fps {
            if !(fps.is_finite() && fps > 0.0) {
                return Err(format!("input.fps must be > 0, got {fps}"));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // Gaze
        self.gaze.horizontal_threshold = other
            .gaze
            .horizontal_threshold
            .or(self.gaze.horizontal_threshold);
        self.gaze.vertical_threshold = other
            .gaze
            .vertical_threshold
            .or(self.gaze.vertical_threshold);

        // Alert
        self.alert.frame_threshold = other.alert.frame_threshold.or(self.alert.frame_threshold);

        // Report
        self.report.enabled = other.report.enabled.or(self.report.enabled);
        self.report.interval_secs = other.report.interval_secs.or(self.report.interval_secs);
        self.report.endpoint = other.report.endpoint.or_else(|| self.report.endpoint.take());
        self.report.timeout_ms = other.report.timeout_ms.or(self.report.timeout_ms);
        self.report.log_dir = other.report.log_dir.or_else(|| self.report.log_dir.take());

        // Input
        self.input.fps = other.input.fps.or(self.input.fps);

        // Output
        self.output.frames = other.output.frames.or(self.output.frames);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
pub fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("iris-watch").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
pub fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.iris-watch.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

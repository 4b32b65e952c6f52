//! JSON Lines landmark source.
//!
//! Replays detector output recorded (or streamed) as one JSON object per
//! line:
//!
//! ```text
//! {"t": 0.033, "landmarks": [[0.41, 0.38, -0.02], ...]}
//! {"t": 0.066, "landmarks": null}
//! {"faces": [[[0.41, 0.38], ...], [[0.72, 0.40], ...]]}
//! ```
//!
//! `t` is seconds since the start of the session. When absent, file records
//! are timed from the frame index and the configured frame rate, while live
//! stdin records are stamped with the wall clock as they are read. With
//! `faces`, only the first face is used.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use iris_watch_core::{Detection, Frame, LandmarkSource};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::debug;

use crate::mesh::face_from_mesh;

/// Frame rate assumed when records carry no timestamps.
pub const DEFAULT_FPS: f64 = 30.0;

/// Wall-clock source used to stamp live records.
pub type Clock = Arc<dyn Fn() -> OffsetDateTime + Send + Sync>;

/// Where the records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayInput {
    /// A JSONL file.
    Path(PathBuf),
    /// Standard input (e.g. piped from a live detector).
    Stdin,
}

/// One line of replay input.
#[derive(Debug, Deserialize)]
struct FrameRecord {
    /// Seconds since session start.
    t: Option<f64>,
    /// The first face's mesh, or null when no face was found.
    landmarks: Option<Vec<Vec<f32>>>,
    /// All detected faces' meshes.
    faces: Option<Vec<Vec<Vec<f32>>>>,
}

impl FrameRecord {
    fn into_mesh(self) -> Option<Vec<Vec<f32>>> {
        self.landmarks
            .or_else(|| self.faces.and_then(|faces| faces.into_iter().next()))
    }
}

/// JSONL replay source adapter.
pub struct JsonlLandmarkSource {
    input: ReplayInput,
    fps: f64,
    started_at: OffsetDateTime,
    clock: Clock,
}

impl JsonlLandmarkSource {
    /// Creates a source reading `input`.
    ///
    /// # Arguments
    ///
    /// * `input` - File path or stdin
    /// * `fps` - Frame rate used to time records without `t`
    /// * `started_at` - Wall-clock time of frame 0
    #[must_use]
    pub fn new(input: ReplayInput, fps: f64, started_at: OffsetDateTime) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            DEFAULT_FPS
        };
        Self {
            input,
            fps,
            started_at,
            clock: Arc::new(OffsetDateTime::now_utc),
        }
    }

    /// Replaces the wall clock used for live records without `t`.
    #[must_use]
    pub fn with_clock(
        mut self,
        clock: impl Fn() -> OffsetDateTime + Send + Sync + 'static,
    ) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Creates a source reading a file.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>, fps: f64, started_at: OffsetDateTime) -> Self {
        Self::new(ReplayInput::Path(path.as_ref().to_path_buf()), fps, started_at)
    }

    fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        match &self.input {
            ReplayInput::Path(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open landmark file: {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            ReplayInput::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn frame_time(&self, index: usize, t: Option<f64>) -> Result<OffsetDateTime> {
        let secs = match (t, &self.input) {
            (Some(t), _) => t,
            (None, ReplayInput::Stdin) => return Ok((self.clock)()),
            (None, ReplayInput::Path(_)) => index as f64 / self.fps,
        };
        if !(secs.is_finite() && (0.0..1.0e9).contains(&secs)) {
            anyhow::bail!("Invalid frame time: {secs}");
        }
        Ok(self.started_at + time::Duration::seconds_f64(secs))
    }

    fn parse_line(&self, index: usize, line: &str) -> Result<Frame> {
        let record: FrameRecord = serde_json::from_str(line)
            .with_context(|| format!("Invalid landmark record on frame {index}"))?;
        let timestamp = self.frame_time(index, record.t)?;

        let detection = match record.into_mesh() {
            None => Detection::NoFace,
            Some(mesh) => match face_from_mesh(&mesh) {
                Ok(face) => Detection::Face(face),
                Err(e) => Detection::Malformed(e),
            },
        };

        Ok(Frame {
            index,
            timestamp,
            detection,
        })
    }
}

impl LandmarkSource for JsonlLandmarkSource {
    fn frames(&self) -> Box<dyn Iterator<Item = Result<Frame>> + Send + '_> {
        let reader = match self.open() {
            Ok(r) => r,
            Err(e) => return Box::new(std::iter::once(Err(e))),
        };

        let mut index = 0usize;
        Box::new(reader.lines().filter_map(move |line| {
            let line = match line {
                Ok(l) => l,
                Err(e) => return Some(Err(anyhow::Error::new(e).context("Failed to read line"))),
            };
            if line.trim().is_empty() {
                return None;
            }
            let frame = self.parse_line(index, &line);
            index += 1;
            Some(frame)
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        match &self.input {
            ReplayInput::Path(path) => {
                let file = File::open(path).ok()?;
                let count = BufReader::new(file)
                    .lines()
                    .map_while(std::result::Result::ok)
                    .filter(|l| !l.trim().is_empty())
                    .count();
                debug!("Found {count} frame records in {}", path.display());
                Some(count)
            }
            ReplayInput::Stdin => None,
        }
    }
}

// src/replay.rs - Landmark source backed by recorded detector output
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use serde::Deserialize;
use tracing::{debug, warn};
use crate::config::DetectorConfig;
use crate::detector::LandmarkSource;
use crate::landmarks::{DetectionResult, Hand};

/// One line of a recording: frame geometry, an optional backing image and
/// whatever the landmark model reported for that frame.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordedFrame {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub image: Option<PathBuf>,
    #[serde(default)]
    pub hands: Vec<Hand>,
}

pub struct ReplaySource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
    pending: Option<DetectionResult>,
    frames_read: usize,
}

impl ReplaySource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .with_context(|| format!("Cannot open recording {}", path.display()))?;

        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_no: 0,
            pending: None,
            frames_read: 0,
        })
    }

    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    /// Read the next recorded frame and stage its detection for `detect`.
    /// Returns `None` at the end of the recording.
    pub fn next_frame(&mut self) -> Result<Option<RgbaImage>> {
        let Some(record) = self.next_record()? else {
            self.pending = None;
            return Ok(None);
        };

        let frame = self.load_canvas(&record)?;
        self.pending = Some(DetectionResult::new(record.hands));
        self.frames_read += 1;
        Ok(Some(frame))
    }

    fn next_record(&mut self) -> Result<Option<RecordedFrame>> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let line = line.with_context(|| format!("Failed reading {}", self.path.display()))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let record: RecordedFrame = serde_json::from_str(line).with_context(|| {
                format!("Invalid frame record at {}:{}", self.path.display(), self.line_no)
            })?;
            return Ok(Some(record));
        }
        Ok(None)
    }

    fn load_canvas(&self, record: &RecordedFrame) -> Result<RgbaImage> {
        if let Some(image_path) = &record.image {
            let resolved = match self.path.parent() {
                Some(dir) if image_path.is_relative() => dir.join(image_path),
                _ => image_path.clone(),
            };
            match image::open(&resolved) {
                Ok(img) => return Ok(img.to_rgba8()),
                Err(e) => warn!("Could not load frame image {}: {}", resolved.display(), e),
            }
        }

        if record.width == 0 || record.height == 0 {
            anyhow::bail!(
                "Frame at {}:{} has no pixels ({}x{})",
                self.path.display(),
                self.line_no,
                record.width,
                record.height
            );
        }
        Ok(RgbaImage::from_pixel(record.width, record.height, Rgba([0, 0, 0, 255])))
    }
}

impl LandmarkSource for ReplaySource {
    fn detect(&mut self, _frame: &RgbaImage, config: &DetectorConfig) -> Result<DetectionResult> {
        let detection = self
            .pending
            .take()
            .context("No recorded frame staged; call next_frame before detecting")?;
        debug!(
            "Replaying frame {} ({} hand(s), mode {:?})",
            self.frames_read,
            detection.hands.len(),
            config.mode
        );
        Ok(detection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn hand_json(x: f64) -> String {
        let points: Vec<String> = (0..21)
            .map(|_| format!(r#"{{"x":{},"y":0.5,"z":0.0}}"#, x))
            .collect();
        format!(r#"{{"handedness":"Right","score":0.9,"landmarks":[{}]}}"#, points.join(","))
    }

    #[test]
    fn test_replay_frames() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"width":64,"height":48,"hands":[{}]}}"#, hand_json(0.25)).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"width":64,"height":48}}"#).unwrap();

        let mut source = ReplaySource::open(file.path()).unwrap();
        let config = DetectorConfig::default();

        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.dimensions(), (64, 48));
        let detection = source.detect(&frame, &config).unwrap();
        assert_eq!(detection.hands.len(), 1);

        // Detection is consumed; a second call without a new frame fails.
        assert!(source.detect(&frame, &config).is_err());

        let frame = source.next_frame().unwrap().unwrap();
        assert!(source.detect(&frame, &config).unwrap().is_empty());

        assert!(source.next_frame().unwrap().is_none());
        assert_eq!(source.frames_read(), 2);
    }

    #[test]
    fn test_replay_rejects_short_hand() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"width":64,"height":48,"hands":[{{"landmarks":[{{"x":0.1,"y":0.1}}]}}]}}"#
        )
        .unwrap();

        let mut source = ReplaySource::open(file.path()).unwrap();
        let err = source.next_frame().unwrap_err();
        assert!(err.to_string().contains(":1"));
    }

    #[test]
    fn test_missing_recording() {
        assert!(ReplaySource::open("/nonexistent/recording.jsonl").is_err());
    }
}

// src/config.rs
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use crate::error::TrackerError;
use crate::landmarks::{INDEX_TIP, NUM_LANDMARKS, THUMB_TIP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMode {
    /// Every frame is detected from scratch.
    Static,
    /// Detection seeds a tracker that follows hands between frames.
    Tracking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelComplexity {
    Lite,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub mode: DetectionMode,
    pub max_hands: usize,
    pub model_complexity: ModelComplexity,
    pub detection_confidence: f32,
    pub tracking_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            mode: DetectionMode::Tracking,
            max_hands: 2,
            model_complexity: ModelComplexity::Full,
            detection_confidence: 0.5,
            tracking_confidence: 0.5,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.max_hands == 0 {
            return Err(TrackerError::InvalidConfig("max_hands must be at least 1".into()));
        }
        for (name, value) in [
            ("detection_confidence", self.detection_confidence),
            ("tracking_confidence", self.tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TrackerError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub draw_skeleton: bool,
    pub draw_landmarks: bool,
    pub draw_distance: bool,
    pub landmark_radius: f32,
    pub distance_radius: f32,
    pub line_thickness: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            draw_skeleton: true,
            draw_landmarks: true,
            draw_distance: true,
            landmark_radius: 7.0,
            distance_radius: 15.0,
            line_thickness: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detector: DetectorConfig,
    pub render: RenderConfig,
    pub output_directory: PathBuf,
    /// Landmarks measured every frame, thumb tip to index tip by default.
    pub distance_pair: (usize, usize),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            render: RenderConfig::default(),
            output_directory: directories::UserDirs::new()
                .and_then(|dirs| dirs.document_dir().map(|p| p.join("HandTracker")))
                .unwrap_or_else(|| PathBuf::from("./output")),
            distance_pair: (THUMB_TIP, INDEX_TIP),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        self.detector.validate()?;
        let (a, b) = self.distance_pair;
        for index in [a, b] {
            if index >= NUM_LANDMARKS {
                return Err(TrackerError::IndexOutOfRange { index });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detector_defaults() {
        let config = DetectorConfig::default();
        assert_eq!(config.mode, DetectionMode::Tracking);
        assert_eq!(config.max_hands, 2);
        assert_eq!(config.model_complexity, ModelComplexity::Full);
        assert!((config.detection_confidence - 0.5).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_detector_validation() {
        let config = DetectorConfig { max_hands: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(TrackerError::InvalidConfig(_))));

        let config = DetectorConfig { tracking_confidence: 1.5, ..Default::default() };
        assert!(matches!(config.validate(), Err(TrackerError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"detector":{{"max_hands":1,"mode":"Static"}},"distance_pair":[8,12]}}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.detector.max_hands, 1);
        assert_eq!(config.detector.mode, DetectionMode::Static);
        assert!((config.detector.tracking_confidence - 0.5).abs() < 1e-6);
        assert_eq!(config.distance_pair, (8, 12));
        assert!(config.render.draw_skeleton);
    }

    #[test]
    fn test_load_rejects_bad_pair() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"distance_pair":[4,30]}}"#).unwrap();
        assert!(AppConfig::load(file.path()).is_err());
    }
}

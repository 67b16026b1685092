// src/lib.rs
//! Per-frame hand geometry on top of an external landmark model: pixel
//! projection, finger extension and landmark-to-landmark distance.

pub mod config;
pub mod data;
pub mod detector;
pub mod distance;
pub mod error;
pub mod fingers;
pub mod landmarks;
pub mod metrics;
pub mod projector;
pub mod render;
pub mod replay;

pub use config::{AppConfig, DetectionMode, DetectorConfig, ModelComplexity, RenderConfig};
pub use detector::{HandDetector, LandmarkSource};
pub use distance::{find_distance, DistanceResult};
pub use error::TrackerError;
pub use fingers::{fingers_extended, ExtensionVector};
pub use landmarks::{DetectionResult, Finger, Hand, NormalizedLandmark, PixelLandmark, FINGER_TIP_MAP};
pub use projector::project;

// src/detector.rs - Explicitly owned detector handle with per-frame caches
use anyhow::Result;
use image::RgbaImage;
use tracing::{debug, info};
use crate::config::{DetectorConfig, RenderConfig};
use crate::distance::{find_distance, DistanceResult};
use crate::error::TrackerError;
use crate::fingers::{fingers_extended, ExtensionVector};
use crate::landmarks::{DetectionResult, PixelLandmark};
use crate::projector::project_detection;
use crate::render;

/// The external landmark model. Implementations run inference on a frame and
/// report hands in detection order.
pub trait LandmarkSource {
    fn detect(&mut self, frame: &RgbaImage, config: &DetectorConfig) -> Result<DetectionResult>;
}

pub struct HandDetector<S: LandmarkSource> {
    source: S,
    config: DetectorConfig,
    render: RenderConfig,
    results: Option<DetectionResult>,
    lm_list: Vec<PixelLandmark>,
}

impl<S: LandmarkSource> HandDetector<S> {
    pub fn new(source: S, config: DetectorConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        info!(
            "Hand detector ready: mode={:?} max_hands={} complexity={:?} detection={:.2} tracking={:.2}",
            config.mode,
            config.max_hands,
            config.model_complexity,
            config.detection_confidence,
            config.tracking_confidence
        );

        Ok(Self {
            source,
            config,
            render: RenderConfig::default(),
            results: None,
            lm_list: Vec::new(),
        })
    }

    pub fn with_render_config(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Detection result of the current frame, if `find_hands` succeeded.
    pub fn results(&self) -> Option<&DetectionResult> {
        self.results.as_ref()
    }

    /// Projected landmarks of the current frame; empty until `find_position`
    /// finds a hand.
    pub fn landmarks(&self) -> &[PixelLandmark] {
        &self.lm_list
    }

    /// Run the landmark model on a new frame. Both caches are reset first so
    /// nothing from the previous frame survives a failed or empty detection.
    pub fn find_hands(&mut self, frame: &mut RgbaImage, draw: bool) -> Result<usize> {
        self.results = None;
        self.lm_list.clear();

        let mut detection = self.source.detect(frame, &self.config)?;
        self.apply_limits(&mut detection);

        if draw && self.render.draw_skeleton {
            for hand in &detection.hands {
                render::draw_hand_skeleton(frame, hand);
            }
        }

        let count = detection.hands.len();
        debug!("Detected {} hand(s)", count);
        self.results = Some(detection);
        Ok(count)
    }

    fn apply_limits(&self, detection: &mut DetectionResult) {
        let threshold = self.config.detection_confidence as f64;
        let before = detection.hands.len();

        detection.hands.retain(|hand| hand.score >= threshold);
        detection.hands.truncate(self.config.max_hands);

        if detection.hands.len() != before {
            debug!("Dropped {} hand(s) by score/max_hands limits", before - detection.hands.len());
        }
    }

    /// Project the `hand_no`-th detected hand into the frame's pixel space.
    /// An empty list means there is no such hand in this frame.
    pub fn find_position(&mut self, frame: &mut RgbaImage, hand_no: usize, draw: bool) -> Vec<PixelLandmark> {
        self.lm_list = project_detection(self.results.as_ref(), hand_no, frame.width(), frame.height());

        if draw && self.render.draw_landmarks {
            render::draw_landmark_markers(frame, &self.lm_list, self.render.landmark_radius);
        }

        self.lm_list.clone()
    }

    pub fn fingers_up(&self) -> Result<ExtensionVector, TrackerError> {
        fingers_extended(&self.lm_list)
    }

    pub fn find_distance(
        &self,
        p1: usize,
        p2: usize,
        frame: &mut RgbaImage,
        draw: bool,
    ) -> Result<DistanceResult, TrackerError> {
        let result = find_distance(&self.lm_list, p1, p2)?;

        if draw && self.render.draw_distance {
            render::draw_distance(frame, &result, self.render.distance_radius, self.render.line_thickness);
        }

        Ok(result)
    }

    /// One full frame: detect, project the `hand_no`-th hand, classify its
    /// fingers and measure `pair`. `Ok(None)` means no such hand this frame.
    /// Errors only concern this frame; the caches are reset on the next call.
    pub fn analyse_frame(
        &mut self,
        frame: &mut RgbaImage,
        hand_no: usize,
        pair: (usize, usize),
        draw: bool,
    ) -> Result<Option<(ExtensionVector, DistanceResult)>> {
        self.find_hands(frame, draw)?;

        if self.find_position(frame, hand_no, draw).is_empty() {
            return Ok(None);
        }

        let fingers = self.fingers_up()?;
        let distance = self.find_distance(pair.0, pair.1, frame, draw)?;
        Ok(Some((fingers, distance)))
    }
}

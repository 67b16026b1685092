// src/projector.rs - Normalized landmarks to pixel coordinates
use tracing::debug;
use crate::landmarks::{DetectionResult, Hand, PixelLandmark};

/// Project one hand into pixel space.
///
/// Coordinates are truncated toward zero rather than rounded, so a landmark at
/// x = 0.999 on a 640 px frame lands on column 639.
pub fn project(hand: &Hand, width: u32, height: u32) -> Vec<PixelLandmark> {
    let (w, h) = (width as f64, height as f64);

    hand.landmarks()
        .iter()
        .enumerate()
        .map(|(id, lm)| PixelLandmark::new(id, (lm.x * w) as i32, (lm.y * h) as i32))
        .collect()
}

/// Project the `hand_no`-th hand of a detection. Returns an empty list when the
/// frame has no hand at that position; callers treat that as "nothing to query".
pub fn project_detection(
    detection: Option<&DetectionResult>,
    hand_no: usize,
    width: u32,
    height: u32,
) -> Vec<PixelLandmark> {
    match detection.and_then(|d| d.hand(hand_no)) {
        Some(hand) => project(hand, width, height),
        None => {
            debug!("No hand {} in current detection", hand_no);
            Vec::new()
        }
    }
}

// src/fingers.rs - Per-finger extension classification
use crate::error::{Result, TrackerError};
use crate::landmarks::{landmark_at, FingerTipMap, PixelLandmark, FINGER_TIP_MAP};

/// Extended state per finger, thumb first.
pub type ExtensionVector = [bool; 5];

/// Classify every finger of a projected hand using the standard tip map.
pub fn fingers_extended(landmarks: &[PixelLandmark]) -> Result<ExtensionVector> {
    fingers_extended_with(&FINGER_TIP_MAP, landmarks)
}

/// Classify with a caller-supplied tip map, e.g. one with the thumb axis
/// swapped for a mirrored camera.
pub fn fingers_extended_with(map: &FingerTipMap, landmarks: &[PixelLandmark]) -> Result<ExtensionVector> {
    if landmarks.is_empty() {
        return Err(TrackerError::EmptyLandmarkState);
    }

    let mut fingers = [false; 5];
    for (slot, entry) in fingers.iter_mut().zip(map.iter()) {
        let tip = landmark_at(landmarks, entry.tip)?;
        let reference = landmark_at(landmarks, entry.reference)?;
        *slot = entry.axis.is_extended(tip, reference);
    }

    Ok(fingers)
}

pub fn extended_count(fingers: &ExtensionVector) -> usize {
    fingers.iter().filter(|&&up| up).count()
}

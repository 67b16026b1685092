// src/landmarks.rs - Hand landmark model shared by the projector, classifier and distance code
use serde::{Deserialize, Serialize};
use crate::error::{Result, TrackerError};

// Hand landmark indices (21-point hand-pose skeleton)
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const NUM_LANDMARKS: usize = 21;

/// Skeleton edges used when drawing a detected hand.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

/// A landmark in image-relative coordinates, as emitted by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl NormalizedLandmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// One detected hand. Handedness and score are carried for consumers but the
/// geometry in this crate never reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHand")]
pub struct Hand {
    landmarks: Vec<NormalizedLandmark>,
    pub handedness: Option<Handedness>,
    pub score: f64,
}

#[derive(Deserialize)]
struct RawHand {
    landmarks: Vec<NormalizedLandmark>,
    #[serde(default)]
    handedness: Option<Handedness>,
    #[serde(default = "full_score")]
    score: f64,
}

fn full_score() -> f64 {
    1.0
}

impl TryFrom<RawHand> for Hand {
    type Error = TrackerError;

    fn try_from(raw: RawHand) -> Result<Self> {
        let mut hand = Hand::new(raw.landmarks)?;
        hand.handedness = raw.handedness;
        hand.score = raw.score;
        Ok(hand)
    }
}

impl Hand {
    pub fn new(landmarks: Vec<NormalizedLandmark>) -> Result<Self> {
        if landmarks.len() != NUM_LANDMARKS {
            return Err(TrackerError::InvalidLandmarkCount {
                expected: NUM_LANDMARKS,
                actual: landmarks.len(),
            });
        }
        if let Some(index) = landmarks
            .iter()
            .position(|lm| !(lm.x.is_finite() && lm.y.is_finite() && lm.z.is_finite()))
        {
            return Err(TrackerError::NonFiniteLandmark { index });
        }

        Ok(Self {
            landmarks,
            handedness: None,
            score: 1.0,
        })
    }

    pub fn landmarks(&self) -> &[NormalizedLandmark] {
        &self.landmarks
    }
}

/// Everything the detector reported for one frame, in detection order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl DetectionResult {
    pub fn new(hands: Vec<Hand>) -> Self {
        Self { hands }
    }

    pub fn hand(&self, hand_no: usize) -> Option<&Hand> {
        self.hands.get(hand_no)
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}

/// A landmark projected into pixel space for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelLandmark {
    pub id: usize,
    pub x: i32,
    pub y: i32,
}

impl PixelLandmark {
    pub fn new(id: usize, x: i32, y: i32) -> Self {
        Self { id, x, y }
    }
}

/// Look up a landmark by its skeleton index in a projected list.
pub fn landmark_at(landmarks: &[PixelLandmark], index: usize) -> Result<&PixelLandmark> {
    if landmarks.is_empty() {
        return Err(TrackerError::EmptyLandmarkState);
    }
    if index >= NUM_LANDMARKS {
        return Err(TrackerError::IndexOutOfRange { index });
    }

    // Projected lists are ordered by id, so the fast path is a direct index.
    landmarks
        .get(index)
        .filter(|lm| lm.id == index)
        .or_else(|| landmarks.iter().find(|lm| lm.id == index))
        .ok_or(TrackerError::IndexOutOfRange { index })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn tip(self) -> FingerTip {
        FINGER_TIP_MAP[self as usize]
    }
}

/// How a tip is compared against its reference landmark.
///
/// `Horizontal` means extended when the tip lies to the right of the reference
/// (larger x). `Vertical` means extended when the tip lies above it (smaller y,
/// since pixel y grows downward). Both assume an upright, camera-facing right
/// hand; a mirrored or rotated hand inverts the horizontal result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisComparison {
    Horizontal,
    Vertical,
}

impl AxisComparison {
    pub fn is_extended(self, tip: &PixelLandmark, reference: &PixelLandmark) -> bool {
        match self {
            AxisComparison::Horizontal => tip.x > reference.x,
            AxisComparison::Vertical => tip.y < reference.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerTip {
    pub finger: Finger,
    pub tip: usize,
    pub reference: usize,
    pub axis: AxisComparison,
}

pub type FingerTipMap = [FingerTip; 5];

/// Tip landmarks in thumb-to-pinky order. The thumb is compared against the
/// joint right below its tip, the other fingers against the joint two below.
pub const FINGER_TIP_MAP: FingerTipMap = [
    FingerTip { finger: Finger::Thumb, tip: THUMB_TIP, reference: THUMB_IP, axis: AxisComparison::Horizontal },
    FingerTip { finger: Finger::Index, tip: INDEX_TIP, reference: INDEX_PIP, axis: AxisComparison::Vertical },
    FingerTip { finger: Finger::Middle, tip: MIDDLE_TIP, reference: MIDDLE_PIP, axis: AxisComparison::Vertical },
    FingerTip { finger: Finger::Ring, tip: RING_TIP, reference: RING_PIP, axis: AxisComparison::Vertical },
    FingerTip { finger: Finger::Pinky, tip: PINKY_TIP, reference: PINKY_PIP, axis: AxisComparison::Vertical },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finger_tip_map_layout() {
        let tips: Vec<usize> = FINGER_TIP_MAP.iter().map(|f| f.tip).collect();
        assert_eq!(tips, vec![4, 8, 12, 16, 20]);
        assert!(tips.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(FINGER_TIP_MAP[0].reference, FINGER_TIP_MAP[0].tip - 1);
        for entry in &FINGER_TIP_MAP[1..] {
            assert_eq!(entry.reference, entry.tip - 2);
            assert_eq!(entry.axis, AxisComparison::Vertical);
        }
        assert_eq!(Finger::Ring.tip().tip, RING_TIP);
    }

    #[test]
    fn test_hand_requires_21_landmarks() {
        let err = Hand::new(vec![NormalizedLandmark::default(); 20]).unwrap_err();
        assert_eq!(err, TrackerError::InvalidLandmarkCount { expected: 21, actual: 20 });
        assert!(Hand::new(vec![NormalizedLandmark::default(); 21]).is_ok());
    }

    #[test]
    fn test_hand_rejects_non_finite_coordinates() {
        let mut points = vec![NormalizedLandmark::new(0.5, 0.5); 21];
        points[THUMB_TIP] = NormalizedLandmark::new(f64::NAN, f64::NAN);
        assert_eq!(
            Hand::new(points.clone()).unwrap_err(),
            TrackerError::NonFiniteLandmark { index: THUMB_TIP }
        );

        points[THUMB_TIP] = NormalizedLandmark::new(0.5, f64::INFINITY);
        assert!(Hand::new(points.clone()).is_err());

        points[THUMB_TIP] = NormalizedLandmark { x: 0.5, y: 0.5, z: f64::NEG_INFINITY };
        assert!(Hand::new(points.clone()).is_err());

        // Far outside the frame is still a finite, valid detection.
        points[THUMB_TIP] = NormalizedLandmark::new(1e12, -3.0);
        assert!(Hand::new(points).is_ok());
    }

    #[test]
    fn test_hand_deserialize_validates_count() {
        let short = r#"{"landmarks":[{"x":0.1,"y":0.2}]}"#;
        assert!(serde_json::from_str::<Hand>(short).is_err());

        let points: Vec<String> = (0..21).map(|_| r#"{"x":0.5,"y":0.5}"#.to_string()).collect();
        let json = format!(r#"{{"handedness":"Left","landmarks":[{}]}}"#, points.join(","));
        let hand: Hand = serde_json::from_str(&json).unwrap();
        assert_eq!(hand.handedness, Some(Handedness::Left));
        assert_eq!(hand.score, 1.0);
        assert_eq!(hand.landmarks().len(), 21);
    }

    #[test]
    fn test_landmark_lookup() {
        let list: Vec<PixelLandmark> = (0..21).map(|i| PixelLandmark::new(i, i as i32, 0)).collect();
        assert_eq!(landmark_at(&list, 8).unwrap().x, 8);
        assert_eq!(landmark_at(&list, 21), Err(TrackerError::IndexOutOfRange { index: 21 }));
        assert_eq!(landmark_at(&[], 4), Err(TrackerError::EmptyLandmarkState));

        let partial = vec![PixelLandmark::new(4, 1, 1)];
        assert_eq!(landmark_at(&partial, 4).unwrap().id, 4);
        assert_eq!(landmark_at(&partial, 8), Err(TrackerError::IndexOutOfRange { index: 8 }));
    }
}

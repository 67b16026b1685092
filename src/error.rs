// src/error.rs
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    /// Gesture queries were made before a hand was projected for the current frame.
    #[error("no projected landmarks for this frame; call find_position on a frame with a detected hand first")]
    EmptyLandmarkState,

    #[error("landmark index {index} is out of range or missing from the projected list")]
    IndexOutOfRange { index: usize },

    #[error("a hand needs exactly {expected} landmarks, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },

    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark { index: usize },

    #[error("invalid detector configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

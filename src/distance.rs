// src/distance.rs - Distance between two projected landmarks
use nalgebra::Point2;
use serde::Serialize;
use crate::error::Result;
use crate::landmarks::{landmark_at, PixelLandmark};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceResult {
    pub length: f64,
    pub p1: (i32, i32),
    pub p2: (i32, i32),
    pub midpoint: (i32, i32),
}

impl DistanceResult {
    /// Endpoints and midpoint flattened as `[x1, y1, x2, y2, cx, cy]`.
    pub fn line_info(&self) -> [i32; 6] {
        [
            self.p1.0, self.p1.1,
            self.p2.0, self.p2.1,
            self.midpoint.0, self.midpoint.1,
        ]
    }
}

pub fn find_distance(landmarks: &[PixelLandmark], a: usize, b: usize) -> Result<DistanceResult> {
    let first = landmark_at(landmarks, a)?;
    let second = landmark_at(landmarks, b)?;

    let p1 = Point2::new(first.x as f64, first.y as f64);
    let p2 = Point2::new(second.x as f64, second.y as f64);

    Ok(DistanceResult {
        length: nalgebra::distance(&p1, &p2),
        p1: (first.x, first.y),
        p2: (second.x, second.y),
        midpoint: (midpoint(first.x, second.x), midpoint(first.y, second.y)),
    })
}

/// Floor of the average, summed in i64 so saturated projections cannot overflow.
fn midpoint(a: i32, b: i32) -> i32 {
    (a as i64 + b as i64).div_euclid(2) as i32
}

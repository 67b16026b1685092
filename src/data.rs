// src/data.rs
use std::fs::File;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use serde::Serialize;
use tracing::info;
use crate::distance::DistanceResult;
use crate::fingers::{extended_count, ExtensionVector};

/// Derived facts for one processed frame.
#[derive(Debug, Clone, Default)]
pub struct FrameRecord {
    pub frame: usize,
    pub timestamp: f64,
    pub fingers: Option<ExtensionVector>,
    pub distance: Option<DistanceResult>,
}

impl FrameRecord {
    pub fn no_hand(frame: usize, timestamp: f64) -> Self {
        Self {
            frame,
            timestamp,
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow {
    frame: usize,
    timestamp: f64,
    hand_detected: bool,
    thumb: Option<bool>,
    index: Option<bool>,
    middle: Option<bool>,
    ring: Option<bool>,
    pinky: Option<bool>,
    extended_count: Option<usize>,
    pinch_distance: Option<f64>,
    pinch_mid_x: Option<i32>,
    pinch_mid_y: Option<i32>,
}

impl From<&FrameRecord> for CsvRow {
    fn from(record: &FrameRecord) -> Self {
        let finger = |i: usize| record.fingers.map(|f| f[i]);
        Self {
            frame: record.frame,
            timestamp: record.timestamp,
            hand_detected: record.fingers.is_some(),
            thumb: finger(0),
            index: finger(1),
            middle: finger(2),
            ring: finger(3),
            pinky: finger(4),
            extended_count: record.fingers.as_ref().map(extended_count),
            pinch_distance: record.distance.map(|d| d.length),
            pinch_mid_x: record.distance.map(|d| d.midpoint.0),
            pinch_mid_y: record.distance.map(|d| d.midpoint.1),
        }
    }
}

pub struct DataExporter {
    output_dir: PathBuf,
    session_name: String,
    records: Vec<FrameRecord>,
}

impl DataExporter {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name.unwrap_or_else(|| {
            format!("session_{}", Local::now().format("%Y%m%d_%H%M%S"))
        });

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            records: Vec::new(),
        }
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    pub fn add_frame(&mut self, record: FrameRecord) {
        self.records.push(record);
    }

    pub fn frames_with_hand(&self) -> usize {
        self.records.iter().filter(|r| r.fingers.is_some()).count()
    }

    pub fn export_csv(&self) -> Result<PathBuf> {
        let csv_path = self.session_dir().join("hand_data.csv");

        if let Some(parent) = csv_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create {}", parent.display()))?;
        }

        let file = File::create(&csv_path)
            .with_context(|| format!("Cannot create {}", csv_path.display()))?;
        let mut writer = Writer::from_writer(file);

        for record in &self.records {
            writer.serialize(CsvRow::from(record))?;
        }

        writer.flush()?;
        info!(
            "Exported {} frames ({} with a hand) to {}",
            self.records.len(),
            self.frames_with_hand(),
            csv_path.display()
        );
        Ok(csv_path)
    }
}

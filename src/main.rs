// src/main.rs
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hand_tracker::data::{DataExporter, FrameRecord};
use hand_tracker::fingers::extended_count;
use hand_tracker::landmarks::THUMB_TIP;
use hand_tracker::metrics::FrameTimer;
use hand_tracker::replay::ReplaySource;
use hand_tracker::{AppConfig, HandDetector};

#[derive(Parser)]
#[command(name = "hand_tracker", about = "Replay recorded hand landmarks and derive finger and distance facts")]
struct Cli {
    /// JSON-lines recording of landmark detections
    recording: PathBuf,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Detection-order index of the hand to analyse
    #[arg(long, default_value_t = 0)]
    hand: usize,

    /// Save every annotated frame as PNG in the session directory
    #[arg(long)]
    save_frames: bool,

    /// Skip all overlay drawing
    #[arg(long)]
    no_draw: bool,

    /// Write per-frame results to CSV at the end of the run
    #[arg(long)]
    export_csv: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let source = ReplaySource::open(&cli.recording)?;
    let mut detector = HandDetector::new(source, config.detector.clone())?
        .with_render_config(config.render.clone());
    let mut exporter = DataExporter::new(&config.output_directory, None);
    let mut timer = FrameTimer::new();

    let frames_dir = exporter.session_dir().join("frames");
    if cli.save_frames {
        std::fs::create_dir_all(&frames_dir)
            .with_context(|| format!("Cannot create {}", frames_dir.display()))?;
    }

    let draw = !cli.no_draw;
    let (pair_a, pair_b) = config.distance_pair;
    let started = std::time::Instant::now();
    let mut frame_no = 0usize;

    // End of the recording is the exit signal.
    while let Some(mut img) = detector.source_mut().next_frame()? {
        let timestamp = started.elapsed().as_secs_f64();

        let record = match detector.analyse_frame(&mut img, cli.hand, (pair_a, pair_b), draw) {
            Ok(Some((fingers, distance))) => {
                let thumb_tip = detector.landmarks()[THUMB_TIP];
                info!("Frame {}: thumb tip at ({}, {})", frame_no, thumb_tip.x, thumb_tip.y);
                info!(
                    "Frame {}: fingers {:?} ({} up), distance {}-{} = {:.1}px",
                    frame_no,
                    fingers,
                    extended_count(&fingers),
                    pair_a,
                    pair_b,
                    distance.length
                );

                FrameRecord {
                    frame: frame_no,
                    timestamp,
                    fingers: Some(fingers),
                    distance: Some(distance),
                }
            }
            Ok(None) => FrameRecord::no_hand(frame_no, timestamp),
            Err(e) => {
                warn!("Frame {}: skipped: {:#}", frame_no, e);
                FrameRecord::no_hand(frame_no, timestamp)
            }
        };
        exporter.add_frame(record);

        let fps = timer.tick().fps;
        tracing::debug!("Frame {}: {:.0} fps", frame_no, fps);

        if cli.save_frames {
            let path = frames_dir.join(format!("frame_{:05}.png", frame_no));
            img.save(&path)
                .with_context(|| format!("Failed to save {}", path.display()))?;
        }

        frame_no += 1;
    }

    info!(
        "Processed {} frames, average {:.1} fps",
        frame_no,
        timer.metrics().avg_fps
    );

    if cli.export_csv {
        let path = exporter.export_csv()?;
        info!("Hand data written to {}", path.display());
    }

    Ok(())
}

// src/metrics.rs
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const WINDOW: usize = 30;

#[derive(Debug, Clone, Default)]
pub struct PerformanceMetrics {
    pub fps: f32,
    pub avg_fps: f32,
    pub avg_frame_time: f32,
}

/// Frame-to-frame timing for the processing loop.
pub struct FrameTimer {
    previous: Option<Instant>,
    frame_times: VecDeque<f32>,
    metrics: PerformanceMetrics,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            previous: None,
            frame_times: VecDeque::with_capacity(WINDOW),
            metrics: PerformanceMetrics::default(),
        }
    }

    pub fn tick(&mut self) -> &PerformanceMetrics {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> &PerformanceMetrics {
        if let Some(previous) = self.previous.replace(now) {
            let elapsed = now.saturating_duration_since(previous);
            self.record(elapsed);
        }
        &self.metrics
    }

    fn record(&mut self, elapsed: Duration) {
        let secs = elapsed.as_secs_f32();
        if secs <= 0.0 {
            return;
        }

        self.frame_times.push_front(secs);
        if self.frame_times.len() > WINDOW {
            self.frame_times.pop_back();
        }

        self.metrics.fps = 1.0 / secs;
        self.metrics.avg_frame_time = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        self.metrics.avg_fps = 1.0 / self.metrics.avg_frame_time;
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

//! Timing traces and result summaries emitted by the ridge driver and demo.
use crate::edges::canny::{Precision, RidgeOptions, RidgeResult};
use crate::edges::grad::GradientKernel;
use crate::edges::nms::DirectionCode;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Timing entry describing a single stage of the driver.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Elapsed time of the first stage named `label`.
    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

/// Milliseconds since `start`.
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// JSON-facing summary of a ridge detection run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RidgeSummary {
    pub width: usize,
    pub height: usize,
    pub magnitude_threshold: f32,
    pub kernel: GradientKernel,
    pub precision: Precision,
    pub ridge_count: usize,
    /// Retained pixels per direction code.
    pub direction_histogram: [usize; DirectionCode::COUNT],
    pub timing: TimingBreakdown,
}

impl RidgeSummary {
    pub fn new(width: usize, height: usize, options: &RidgeOptions, result: &RidgeResult) -> Self {
        let mut direction_histogram = [0usize; DirectionCode::COUNT];
        for e in &result.elements {
            direction_histogram[e.direction as usize % DirectionCode::COUNT] += 1;
        }
        Self {
            width,
            height,
            magnitude_threshold: options.magnitude_threshold,
            kernel: options.kernel,
            precision: options.precision,
            ridge_count: result.elements.len(),
            direction_histogram,
            timing: result.timing.clone(),
        }
    }
}

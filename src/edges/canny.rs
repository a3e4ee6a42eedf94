//! Canny-style ridge detection on dense images.
//!
//! Computes Sobel or Scharr gradients of a full image, wraps magnitude and
//! both derivatives as rectangular objects and runs [`suppress`] on them.
//! With [`Precision::Integer`] the gradient fields are scaled and rounded to
//! `i32` first, which routes the suppression through its integer path.
use crate::diagnostics::{elapsed_ms, TimingBreakdown};
use crate::edges::grad::{image_gradients, GradientKernel};
use crate::edges::nms::{ridge_pixels, suppress};
use crate::error::NmsError;
use crate::image::ImageF32;
use crate::object::values::round_to_i32;
use crate::object::{DomainObject, GreyBuffer, Object, PixelValue, ValueTable};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Numeric representation of the gradient fields handed to suppression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[default]
    Floating,
    Integer,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RidgeOptions {
    /// Pixels with gradient magnitude at or below this value are never ridges.
    pub magnitude_threshold: f32,
    pub kernel: GradientKernel,
    pub precision: Precision,
    /// Multiplier applied to gradients (and the threshold) before rounding
    /// in [`Precision::Integer`] mode.
    pub integer_scale: f32,
}

impl Default for RidgeOptions {
    fn default() -> Self {
        Self {
            magnitude_threshold: 0.1,
            kernel: GradientKernel::Sobel,
            precision: Precision::Floating,
            integer_scale: 256.0,
        }
    }
}

/// A ridge pixel with its gradient magnitude, for visualization and JSON.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RidgeElement {
    /// X coordinate in pixels
    pub x: u32,
    /// Y coordinate in pixels
    pub y: u32,
    /// Gradient magnitude at (x, y)
    pub magnitude: f32,
    /// Direction code 0..=7
    pub direction: u8,
}

pub struct RidgeResult {
    /// Suppression output: ridge domain with tagged direction bytes.
    pub ridges: Object,
    pub elements: Vec<RidgeElement>,
    pub timing: TimingBreakdown,
}

fn dense_object(image: &ImageF32, data: GreyBuffer) -> Result<Object, NmsError> {
    let table = ValueTable::new(0, 0, image.w, image.h, data)?;
    Ok(Object::Domain2D(DomainObject::from_table(table)))
}

fn float_object(image: &ImageF32) -> Result<Object, NmsError> {
    dense_object(image, GreyBuffer::F32(image.data.clone()))
}

fn scaled_object(image: &ImageF32, scale: f32) -> Result<Object, NmsError> {
    let data = image
        .data
        .iter()
        .map(|&v| round_to_i32(f64::from(v * scale)))
        .collect();
    dense_object(image, GreyBuffer::I32(data))
}

/// Detect gradient ridges of `image`.
pub fn detect_ridges(image: &ImageF32, options: &RidgeOptions) -> Result<RidgeResult, NmsError> {
    let total_start = Instant::now();
    let mut timing = TimingBreakdown::default();

    let gradient_start = Instant::now();
    let grad = image_gradients(image, options.kernel);
    timing.push("gradient", elapsed_ms(gradient_start));

    let pack_start = Instant::now();
    let (mag, gy, gx, threshold) = match options.precision {
        Precision::Floating => (
            float_object(&grad.mag)?,
            float_object(&grad.gy)?,
            float_object(&grad.gx)?,
            PixelValue::F32(options.magnitude_threshold),
        ),
        Precision::Integer => {
            let scale = options.integer_scale;
            (
                scaled_object(&grad.mag, scale)?,
                scaled_object(&grad.gy, scale)?,
                scaled_object(&grad.gx, scale)?,
                PixelValue::F64(f64::from(options.magnitude_threshold * scale)),
            )
        }
    };
    timing.push("pack", elapsed_ms(pack_start));

    let suppress_start = Instant::now();
    let ridges = suppress(Some(&mag), Some(&gy), Some(&gx), threshold)?;
    timing.push("suppress", elapsed_ms(suppress_start));

    let elements: Vec<RidgeElement> = ridge_pixels(&ridges)
        .into_iter()
        .map(|p| RidgeElement {
            x: p.x as u32,
            y: p.y as u32,
            magnitude: grad.mag.get(p.x as usize, p.y as usize),
            direction: p.direction,
        })
        .collect();
    timing.total_ms = elapsed_ms(total_start);
    debug!(
        "detect_ridges: {}x{} {:?}/{:?} -> {} ridge px in {:.3} ms",
        image.w,
        image.h,
        options.kernel,
        options.precision,
        elements.len(),
        timing.total_ms
    );

    Ok(RidgeResult {
        ridges,
        elements,
        timing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_step(w: usize, h: usize, at: usize) -> ImageF32 {
        ImageF32::from_fn(w, h, |x, _| if x >= at { 1.0 } else { 0.0 })
    }

    fn ridge_columns(result: &RidgeResult) -> Vec<u32> {
        let mut cols: Vec<u32> = result.elements.iter().map(|e| e.x).collect();
        cols.sort_unstable();
        cols.dedup();
        cols
    }

    #[test]
    fn blurred_step_yields_single_column() {
        // 0, 0, 0, .5, 1, 1, 1: the gradient peaks on column 3 only.
        let img = ImageF32::from_fn(7, 6, |x, _| match x {
            0..=2 => 0.0,
            3 => 0.5,
            _ => 1.0,
        });
        let result = detect_ridges(&img, &RidgeOptions::default()).unwrap();
        assert_eq!(ridge_columns(&result), vec![3]);
        // Rows outside the image read as zero, which does not matter for a
        // purely horizontal gradient: every row keeps its column 3 pixel.
        assert_eq!(result.elements.len(), 6);
        assert!(result.elements.iter().all(|e| e.direction == 0));
        assert_eq!(result.elements[0].magnitude, 4.0);
        assert!(result.timing.stage_ms("suppress").is_some());
    }

    #[test]
    fn integer_precision_agrees_on_step() {
        let img = ImageF32::from_fn(7, 6, |x, _| match x {
            0..=2 => 0.0,
            3 => 0.5,
            _ => 1.0,
        });
        let floating = detect_ridges(&img, &RidgeOptions::default()).unwrap();
        let options = RidgeOptions {
            precision: Precision::Integer,
            ..RidgeOptions::default()
        };
        let integer = detect_ridges(&img, &options).unwrap();
        assert_eq!(ridge_pixels(&floating.ridges), ridge_pixels(&integer.ridges));
    }

    #[test]
    fn sharp_step_ties_are_not_ridges() {
        // A hard step gives two equal magnitude columns; neither strictly
        // dominates the other along the gradient so neither is kept.
        let result = detect_ridges(&vertical_step(8, 5, 4), &RidgeOptions::default()).unwrap();
        assert!(result.elements.is_empty());
        assert!(result.ridges.is_empty());
    }

    #[test]
    fn high_threshold_suppresses_everything() {
        let options = RidgeOptions {
            magnitude_threshold: 10.0,
            ..RidgeOptions::default()
        };
        let img = ImageF32::from_fn(7, 6, |x, _| if x >= 3 { 1.0 } else { 0.0 });
        let result = detect_ridges(&img, &options).unwrap();
        assert!(result.elements.is_empty());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let o: RidgeOptions =
            serde_json::from_str(r#"{"kernel":"scharr","precision":"integer"}"#).unwrap();
        assert_eq!(o.kernel, GradientKernel::Scharr);
        assert_eq!(o.precision, Precision::Integer);
        assert_eq!(o.magnitude_threshold, 0.1);
    }
}

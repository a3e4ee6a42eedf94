//! Edge processing: image gradients, non‑maximal suppression over sparse
//! objects and a Canny‑style driver tying the two together.
//!
//! - [`grad`]: Sobel/Scharr gradients of dense images with border clamping.
//! - [`nms`]: ridge extraction on interval-domain objects; the core of the crate.
//! - [`canny`]: gradients → suppression for a full image, with timings.

pub mod canny;
pub mod grad;
pub mod nms;

pub use canny::{detect_ridges, Precision, RidgeElement, RidgeOptions, RidgeResult};
pub use grad::{image_gradients, Grad, GradientKernel};
pub use nms::{
    ridge_pixels, suppress, suppress_volume, suppress_with_kind, DirectionCode, RidgePixel,
    SampleKind,
};

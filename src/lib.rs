//! Non-maximal suppression of gradient fields over sparse rasters.
//!
//! Inputs are [`Object`]s: an [`IntervalDomain`] (per-row column runs) paired
//! with a typed [`ValueTable`]. Given gradient magnitude and both partial
//! derivatives, [`suppress`] keeps the pixels whose magnitude is a strict
//! local maximum along the gradient direction and tags each with its
//! quantized direction.

// Core: sparse geometry, objects and suppression.
pub mod edges;
pub mod error;
pub mod object;
pub mod region;

// Tooling around the core.
pub mod config;
pub mod diagnostics;
pub mod image;

// --- High-level re-exports -------------------------------------------------

pub use crate::edges::nms::{
    ridge_pixels, suppress, suppress_volume, suppress_with_kind, DirectionCode, RidgePixel,
    SampleKind, RETAINED_FLAG,
};
pub use crate::error::NmsError;
pub use crate::object::{DomainObject, GreyBuffer, Object, PixelValue, ValueTable, VolumeObject};
pub use crate::region::{intersect_n, IntervalDomain, Run};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use ridge_nms::prelude::*;
///
/// # fn main() -> Result<(), NmsError> {
/// let (w, h) = (4usize, 3usize);
/// let mag = ValueTable::new(0, 0, w, h, GreyBuffer::I32(vec![1; w * h]))?;
/// let obj = Object::Domain2D(DomainObject::from_table(mag));
/// let ridges = suppress(Some(&obj), Some(&obj), Some(&obj), PixelValue::I32(0))?;
/// println!("retained {} px", ridges.domain().map_or(0, |d| d.area()));
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::edges::canny::{detect_ridges, RidgeOptions};
    pub use crate::image::ImageF32;
    pub use crate::{
        suppress, DomainObject, GreyBuffer, NmsError, Object, PixelValue, ValueTable,
    };
}

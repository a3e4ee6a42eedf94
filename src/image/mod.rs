//! Dense grayscale rasters used by the gradient driver and the demo tool.
//!
//! The suppression core works on sparse [`crate::object::Object`]s; these
//! types only feed it (gradients of a full image) and render its output.
pub mod f32;
pub mod io;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::u8::ImageU8;

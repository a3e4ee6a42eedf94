//! Eight-way gradient direction codes.
//!
//! Codes number 45° octants counter-clockwise, as displayed with row indices
//! growing downwards, starting just above the positive x axis. Code 0 covers
//! gradients pointing right and slightly up (`dx > 0`, `dy < 0`):
//!
//! ```text
//!            -dy
//!       \  2 | 1  /
//!        \   |   /
//!      3  \  |  /  0
//!   -dx ---- O ---- +dx
//!      4  /  |  \  7
//!        /   |   \
//!       /  5 | 6  \
//!            +dy        (rows grow downwards)
//! ```
//!
//! Retained pixels store `0x80 | code` in the output raster.
use super::sample::GradientSample;
use serde::Serialize;

/// Tag bit marking a retained pixel in the direction raster.
pub const RETAINED_FLAG: u8 = 0x80;

/// Maps `(dy > 0) << 2 | (dx >= 0) << 1 | (dy² >= dx²)` to a code.
const OCTANT_TABLE: [u8; 8] = [3, 2, 0, 1, 4, 5, 7, 6];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DirectionCode(u8);

impl DirectionCode {
    pub const COUNT: usize = 8;

    pub fn new(code: u8) -> Option<Self> {
        (code < 8).then_some(Self(code))
    }

    /// Octant of the gradient `(dx, dy)`. A zero `dy` counts as the lower
    /// bit-2 half so a purely rightward gradient is code 0.
    #[inline]
    pub fn quantize<T: GradientSample>(dy: T, dx: T) -> Self {
        let bits = (usize::from(dy.is_positive()) << 2)
            | (usize::from(dx.is_non_negative()) << 1)
            | usize::from(T::square_ge(dy, dx));
        Self(OCTANT_TABLE[bits])
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Byte stored for a retained pixel.
    pub fn tagged(self) -> u8 {
        self.0 | RETAINED_FLAG
    }

    /// Decode a raster byte; `None` for background (untagged) bytes.
    pub fn from_tagged(byte: u8) -> Option<Self> {
        if byte & RETAINED_FLAG == 0 {
            return None;
        }
        Self::new(byte & !RETAINED_FLAG)
    }

    /// Unit `(dx, dy)` through the middle of the octant, in row-down image coordinates.
    pub fn unit_vector(self) -> [f64; 2] {
        let angle = -(self.0 as f64 * 45.0 + 22.5).to_radians();
        [angle.cos(), angle.sin()]
    }
}

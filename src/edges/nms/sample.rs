//! Numeric kinds the suppression scan can run in.
//!
//! The scan is written once, generic over [`GradientSample`]. Integer inputs
//! run on `i32` with exact sign tests; as soon as any input is floating point
//! the whole scan runs on `f64`, where comparisons are guarded by
//! `f64::EPSILON` against rounding noise.
use crate::object::{FromGrey, ValueTable};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    Integer,
    Floating,
}

/// Floating if any table stores floating point values, else integer.
pub fn select_sample_kind(tables: &[&ValueTable]) -> SampleKind {
    if tables.iter().any(|t| t.grey_type().is_floating()) {
        SampleKind::Floating
    } else {
        SampleKind::Integer
    }
}

pub trait GradientSample: FromGrey + Default + PartialOrd + Debug + 'static {
    const KIND: SampleKind;

    /// Non-negligible magnitude strictly above `threshold`.
    fn is_candidate(self, threshold: Self) -> bool;

    fn is_positive(self) -> bool;

    fn is_non_negative(self) -> bool;

    /// `a² >= b²` without overflow.
    fn square_ge(a: Self, b: Self) -> bool;

    /// Whether `((x.0 - x.1) * gx - (y.0 - y.1) * gy) / gm` is strictly
    /// positive (beyond the kind's epsilon).
    fn rises(gm: Self, x: (Self, Self), y: (Self, Self), gx: Self, gy: Self) -> bool;
}

impl GradientSample for i32 {
    const KIND: SampleKind = SampleKind::Integer;

    #[inline]
    fn is_candidate(self, threshold: Self) -> bool {
        self != 0 && self > threshold
    }

    #[inline]
    fn is_positive(self) -> bool {
        self > 0
    }

    #[inline]
    fn is_non_negative(self) -> bool {
        self >= 0
    }

    #[inline]
    fn square_ge(a: Self, b: Self) -> bool {
        let (a, b) = (a as i64, b as i64);
        a * a >= b * b
    }

    #[inline]
    fn rises(gm: Self, x: (Self, Self), y: (Self, Self), gx: Self, gy: Self) -> bool {
        let dx = x.0 as i128 - x.1 as i128;
        let dy = y.0 as i128 - y.1 as i128;
        let num = dx * gx as i128 - dy * gy as i128;
        // Sign of num / gm, without truncating towards zero.
        if gm > 0 {
            num > 0
        } else {
            num < 0
        }
    }
}

impl GradientSample for f64 {
    const KIND: SampleKind = SampleKind::Floating;

    #[inline]
    fn is_candidate(self, threshold: Self) -> bool {
        self * self > f64::EPSILON && self > threshold
    }

    #[inline]
    fn is_positive(self) -> bool {
        self > 0.0
    }

    #[inline]
    fn is_non_negative(self) -> bool {
        self >= 0.0
    }

    #[inline]
    fn square_ge(a: Self, b: Self) -> bool {
        a * a >= b * b
    }

    #[inline]
    fn rises(gm: Self, x: (Self, Self), y: (Self, Self), gx: Self, gy: Self) -> bool {
        diff_of_products(x.0 - x.1, gx, y.0 - y.1, gy) / gm > f64::EPSILON
    }
}

/// `a * b - c * d` with the rounding error of `c * d` fed back in (Kahan),
/// so the sign is right even when both products exceed 2^53.
#[inline]
fn diff_of_products(a: f64, b: f64, c: f64, d: f64) -> f64 {
    let w = c * d;
    let e = (-c).mul_add(d, w);
    let f = a.mul_add(b, -w);
    f + e
}

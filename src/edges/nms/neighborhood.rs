//! Rolling three-row magnitude cache plus single-row derivative caches.
//!
//! Row `r` of the source lives in ring slot `r mod 3`. Rows are only ever
//! added in increasing order via [`Neighborhood::advance_to`], which clears
//! every slot it skips over, so a missing row always reads as zero magnitude.
use super::sample::GradientSample;
use crate::error::{try_filled_vec, NmsError};

pub struct Neighborhood<T> {
    origin_col: i32,
    width: usize,
    magnitude: [Vec<T>; 3],
    grad_y: Vec<T>,
    grad_x: Vec<T>,
    newest: Option<i32>,
    derivative_row: Option<i32>,
}

/// The 3×3 stencil rows and derivatives for one row being scanned.
pub struct Window<'a, T> {
    pub row: i32,
    pub origin_col: i32,
    /// Magnitude rows `row - 1`, `row`, `row + 1`.
    pub magnitude: [&'a [T]; 3],
    pub grad_y: &'a [T],
    pub grad_x: &'a [T],
}

impl<'a, T: GradientSample> Window<'a, T> {
    /// Magnitude at row offset `dr` and column offset `dc` from buffer column `x`.
    #[inline]
    pub fn at(&self, x: usize, dr: i8, dc: i8) -> T {
        let row = self.magnitude[(dr + 1) as usize];
        row[(x as isize + dc as isize) as usize]
    }
}

#[inline]
fn slot(row: i32) -> usize {
    row.rem_euclid(3) as usize
}

impl<T: GradientSample> Neighborhood<T> {
    /// Buffers spanning columns `origin_col .. origin_col + width`.
    pub fn new(origin_col: i32, width: usize) -> Result<Self, NmsError> {
        let zero = T::default();
        Ok(Self {
            origin_col,
            width,
            magnitude: [
                try_filled_vec(width, zero)?,
                try_filled_vec(width, zero)?,
                try_filled_vec(width, zero)?,
            ],
            grad_y: try_filled_vec(width, zero)?,
            grad_x: try_filled_vec(width, zero)?,
            newest: None,
            derivative_row: None,
        })
    }

    /// Make `row` the newest ring row, zero-filling it and every row skipped
    /// since the previous newest row.
    pub fn advance_to(&mut self, row: i32) {
        let from = match self.newest {
            Some(newest) => {
                assert!(row > newest, "ring rows must advance: {row} <= {newest}");
                (newest + 1).max(row - 2)
            }
            None => row,
        };
        for r in from..=row {
            self.magnitude[slot(r)].fill(T::default());
        }
        self.newest = Some(row);
    }

    fn span(&self, start: i32, len: usize) -> std::ops::Range<usize> {
        let offset = start - self.origin_col;
        assert!(
            offset >= 0 && offset as usize + len <= self.width,
            "span {start}+{len} outside buffer"
        );
        offset as usize..offset as usize + len
    }

    /// Magnitude samples of `row`, which must be the newest ring row, at
    /// columns `start .. start + len`.
    pub fn magnitude_span_mut(&mut self, row: i32, start: i32, len: usize) -> &mut [T] {
        assert_eq!(self.newest, Some(row), "magnitude rows load at the ring head");
        let range = self.span(start, len);
        &mut self.magnitude[slot(row)][range]
    }

    /// Clear the derivative caches and bind them to `row`.
    pub fn begin_derivatives(&mut self, row: i32) {
        self.grad_y.fill(T::default());
        self.grad_x.fill(T::default());
        self.derivative_row = Some(row);
    }

    pub fn grad_y_span_mut(&mut self, start: i32, len: usize) -> &mut [T] {
        let range = self.span(start, len);
        &mut self.grad_y[range]
    }

    pub fn grad_x_span_mut(&mut self, start: i32, len: usize) -> &mut [T] {
        let range = self.span(start, len);
        &mut self.grad_x[range]
    }

    /// Stencil for `row`; requires `row + 1` to be the newest ring row and
    /// the derivatives to be loaded for `row`.
    pub fn window(&self, row: i32) -> Window<'_, T> {
        assert_eq!(self.newest, Some(row + 1), "next row must be loaded");
        assert_eq!(self.derivative_row, Some(row), "derivatives not loaded");
        Window {
            row,
            origin_col: self.origin_col,
            magnitude: [
                self.magnitude[slot(row - 1)].as_slice(),
                self.magnitude[slot(row)].as_slice(),
                self.magnitude[slot(row + 1)].as_slice(),
            ],
            grad_y: &self.grad_y,
            grad_x: &self.grad_x,
        }
    }
}

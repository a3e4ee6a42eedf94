//! Typed rectangular value tables and scalar pixel values.
use crate::error::NmsError;
use serde::{Deserialize, Serialize};

/// Storage kind of a value table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreyType {
    U8,
    I16,
    I32,
    F32,
    F64,
}

impl GreyType {
    pub fn is_floating(self) -> bool {
        matches!(self, GreyType::F32 | GreyType::F64)
    }
}

/// A single typed scalar, e.g. a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PixelValue {
    U8(u8),
    I16(i16),
    I32(i32),
    F32(f32),
    F64(f64),
}

impl PixelValue {
    pub fn grey_type(self) -> GreyType {
        match self {
            PixelValue::U8(_) => GreyType::U8,
            PixelValue::I16(_) => GreyType::I16,
            PixelValue::I32(_) => GreyType::I32,
            PixelValue::F32(_) => GreyType::F32,
            PixelValue::F64(_) => GreyType::F64,
        }
    }

    /// Nearest integer, saturating at the `i32` range.
    pub fn to_i32(self) -> i32 {
        match self {
            PixelValue::U8(v) => v as i32,
            PixelValue::I16(v) => v as i32,
            PixelValue::I32(v) => v,
            PixelValue::F32(v) => round_to_i32(v as f64),
            PixelValue::F64(v) => round_to_i32(v),
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            PixelValue::U8(v) => v as f64,
            PixelValue::I16(v) => v as f64,
            PixelValue::I32(v) => v as f64,
            PixelValue::F32(v) => v as f64,
            PixelValue::F64(v) => v,
        }
    }
}

#[inline]
pub(crate) fn round_to_i32(v: f64) -> i32 {
    // `as` saturates and maps NaN to 0.
    v.round() as i32
}

/// Conversion from stored grey values into a working sample kind.
pub trait FromGrey: Copy {
    fn from_int(v: i32) -> Self;
    fn from_float(v: f64) -> Self;

    fn from_pixel(v: PixelValue) -> Self {
        match v {
            PixelValue::F32(_) | PixelValue::F64(_) => Self::from_float(v.to_f64()),
            _ => Self::from_int(v.to_i32()),
        }
    }
}

impl FromGrey for i32 {
    #[inline]
    fn from_int(v: i32) -> Self {
        v
    }
    #[inline]
    fn from_float(v: f64) -> Self {
        round_to_i32(v)
    }
}

impl FromGrey for f64 {
    #[inline]
    fn from_int(v: i32) -> Self {
        v as f64
    }
    #[inline]
    fn from_float(v: f64) -> Self {
        v
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GreyBuffer {
    U8(Vec<u8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl GreyBuffer {
    pub fn grey_type(&self) -> GreyType {
        match self {
            GreyBuffer::U8(_) => GreyType::U8,
            GreyBuffer::I16(_) => GreyType::I16,
            GreyBuffer::I32(_) => GreyType::I32,
            GreyBuffer::F32(_) => GreyType::F32,
            GreyBuffer::F64(_) => GreyType::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            GreyBuffer::U8(b) => b.len(),
            GreyBuffer::I16(b) => b.len(),
            GreyBuffer::I32(b) => b.len(),
            GreyBuffer::F32(b) => b.len(),
            GreyBuffer::F64(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, idx: usize) -> PixelValue {
        match self {
            GreyBuffer::U8(b) => PixelValue::U8(b[idx]),
            GreyBuffer::I16(b) => PixelValue::I16(b[idx]),
            GreyBuffer::I32(b) => PixelValue::I32(b[idx]),
            GreyBuffer::F32(b) => PixelValue::F32(b[idx]),
            GreyBuffer::F64(b) => PixelValue::F64(b[idx]),
        }
    }

    fn convert_into<T: FromGrey>(&self, from: usize, dst: &mut [T]) {
        let to = from + dst.len();
        match self {
            GreyBuffer::U8(b) => convert_slice(&b[from..to], dst, |v| T::from_int(v as i32)),
            GreyBuffer::I16(b) => convert_slice(&b[from..to], dst, |v| T::from_int(v as i32)),
            GreyBuffer::I32(b) => convert_slice(&b[from..to], dst, T::from_int),
            GreyBuffer::F32(b) => convert_slice(&b[from..to], dst, |v| T::from_float(v as f64)),
            GreyBuffer::F64(b) => convert_slice(&b[from..to], dst, T::from_float),
        }
    }
}

#[inline]
fn convert_slice<S: Copy, T>(src: &[S], dst: &mut [T], f: impl Fn(S) -> T) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = f(s);
    }
}

/// Dense row-major raster anchored at `(origin_row, origin_col)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueTable {
    origin_row: i32,
    origin_col: i32,
    width: usize,
    height: usize,
    data: GreyBuffer,
}

impl ValueTable {
    /// Wrap `data` as a `height × width` raster; fails if the buffer length does not match.
    pub fn new(
        origin_row: i32,
        origin_col: i32,
        width: usize,
        height: usize,
        data: GreyBuffer,
    ) -> Result<Self, NmsError> {
        if data.len() != width * height {
            return Err(NmsError::ValueTableBounds {
                row: origin_row + height as i32,
                col: origin_col + width as i32,
            });
        }
        Ok(Self {
            origin_row,
            origin_col,
            width,
            height,
            data,
        })
    }

    /// Zero-filled `u8` raster.
    pub fn zeroed_u8(
        origin_row: i32,
        origin_col: i32,
        width: usize,
        height: usize,
    ) -> Result<Self, NmsError> {
        let data = crate::error::try_filled_vec(width * height, 0u8)?;
        Self::new(origin_row, origin_col, width, height, GreyBuffer::U8(data))
    }

    pub fn origin_row(&self) -> i32 {
        self.origin_row
    }

    pub fn origin_col(&self) -> i32 {
        self.origin_col
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn grey_type(&self) -> GreyType {
        self.data.grey_type()
    }

    pub fn data(&self) -> &GreyBuffer {
        &self.data
    }

    fn index(&self, row: i32, col: i32, len: usize) -> Result<usize, NmsError> {
        let r = row - self.origin_row;
        let c = col - self.origin_col;
        if r < 0 || c < 0 || r as usize >= self.height || c as usize + len > self.width {
            return Err(NmsError::ValueTableBounds { row, col });
        }
        Ok(r as usize * self.width + c as usize)
    }

    pub fn get(&self, row: i32, col: i32) -> Option<PixelValue> {
        self.index(row, col, 1).ok().map(|i| self.data.get(i))
    }

    /// Convert `dst.len()` samples of `row`, starting at column `start`, into `dst`.
    pub fn read_run<T: FromGrey>(&self, row: i32, start: i32, dst: &mut [T]) -> Result<(), NmsError> {
        let idx = self.index(row, start, dst.len())?;
        self.data.convert_into(idx, dst);
        Ok(())
    }

    /// Mutable `u8` samples of `row` starting at column `start`.
    pub fn u8_run_mut(&mut self, row: i32, start: i32, len: usize) -> Result<&mut [u8], NmsError> {
        let idx = self.index(row, start, len)?;
        match &mut self.data {
            GreyBuffer::U8(b) => Ok(&mut b[idx..idx + len]),
            _ => Err(NmsError::UnsupportedObjectType),
        }
    }
}

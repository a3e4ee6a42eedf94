//! Domain objects: a sparse domain paired with a value table.
pub mod values;

pub use values::{FromGrey, GreyBuffer, GreyType, PixelValue, ValueTable};

use crate::region::IntervalDomain;

/// A 2D domain with optional values. Either part may be missing, which the
/// suppression entry point reports as a distinct error.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainObject {
    pub domain: Option<IntervalDomain>,
    pub values: Option<ValueTable>,
}

impl DomainObject {
    pub fn new(domain: IntervalDomain, values: ValueTable) -> Self {
        Self {
            domain: Some(domain),
            values: Some(values),
        }
    }

    /// Rectangular object covering the whole value table.
    pub fn from_table(values: ValueTable) -> Self {
        let domain = IntervalDomain::rect(
            values.origin_row(),
            values.origin_col(),
            values.height(),
            values.width(),
        );
        Self::new(domain, values)
    }

    /// Value at `(row, col)` when the pixel belongs to the domain.
    pub fn value_at(&self, row: i32, col: i32) -> Option<PixelValue> {
        let domain = self.domain.as_ref()?;
        if !domain.contains(row, col) {
            return None;
        }
        self.values.as_ref()?.get(row, col)
    }
}

/// A stack of 2D planes starting at `first_plane`.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeObject {
    pub first_plane: i32,
    pub planes: Vec<DomainObject>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Empty,
    Domain2D(DomainObject),
    Volume(VolumeObject),
}

impl Object {
    /// True for [`Object::Empty`] and for objects whose domain covers no pixel.
    pub fn is_empty(&self) -> bool {
        match self {
            Object::Empty => true,
            Object::Domain2D(obj) => obj.domain.as_ref().map_or(true, |d| d.is_empty()),
            Object::Volume(vol) => vol
                .planes
                .iter()
                .all(|p| p.domain.as_ref().map_or(true, |d| d.is_empty())),
        }
    }

    pub fn domain(&self) -> Option<&IntervalDomain> {
        match self {
            Object::Domain2D(obj) => obj.domain.as_ref(),
            _ => None,
        }
    }

    pub fn values(&self) -> Option<&ValueTable> {
        match self {
            Object::Domain2D(obj) => obj.values.as_ref(),
            _ => None,
        }
    }

    pub fn value_at(&self, row: i32, col: i32) -> Option<PixelValue> {
        match self {
            Object::Domain2D(obj) => obj.value_at(row, col),
            _ => None,
        }
    }
}

impl From<DomainObject> for Object {
    fn from(obj: DomainObject) -> Self {
        Object::Domain2D(obj)
    }
}

//! Non-maximal suppression over sparse gradient fields.
//!
//! Given a gradient magnitude object and its two partial derivatives, builds
//! a new object whose domain holds only the pixels that are local maxima of
//! magnitude along their own gradient direction, with `u8` values encoding
//! the direction (`0x80 | code`, see [`direction`]).
//!
//! The three input domains are first intersected; the scan then streams the
//! combined domain row by row, keeping only three magnitude rows in memory.
//!
//! Pipeline: [`sync::Synchronizer`] → [`neighborhood::Neighborhood`] →
//! [`scanner::scan_run`] → [`RegionBuilder`](crate::region::RegionBuilder).

pub mod direction;
pub mod neighborhood;
pub mod sample;
pub mod scanner;
pub mod sync;

pub use direction::{DirectionCode, RETAINED_FLAG};
pub use sample::{select_sample_kind, GradientSample, SampleKind};
pub use sync::ScanStats;

use crate::error::NmsError;
use crate::object::{DomainObject, Object, PixelValue, ValueTable};
use crate::region::{intersect_n, IntervalDomain, RegionBuilder};
use log::debug;
use serde::Serialize;
use sync::{GreyStream, Synchronizer};

/// A retained pixel and its direction code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RidgePixel {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
    pub direction: u8,
}

/// Suppress non-maximal pixels of `magnitude` given its vertical (`grad_y`)
/// and horizontal (`grad_x`) derivatives.
///
/// Pixels whose magnitude is not above `min_gradient` are never retained.
/// The numeric path is integer unless any input stores floating point values.
/// An empty intersection of the three domains yields [`Object::Empty`].
pub fn suppress(
    magnitude: Option<&Object>,
    grad_y: Option<&Object>,
    grad_x: Option<&Object>,
    min_gradient: PixelValue,
) -> Result<Object, NmsError> {
    suppress_impl(magnitude, grad_y, grad_x, min_gradient, None)
}

/// As [`suppress`], but with the numeric path forced to `kind`.
pub fn suppress_with_kind(
    magnitude: Option<&Object>,
    grad_y: Option<&Object>,
    grad_x: Option<&Object>,
    min_gradient: PixelValue,
    kind: SampleKind,
) -> Result<Object, NmsError> {
    suppress_impl(magnitude, grad_y, grad_x, min_gradient, Some(kind))
}

/// Dispatch on the kind of `magnitude`: 2D objects go through [`suppress`]
/// (`grad_z` is ignored), empty objects give an empty result and volumes
/// are rejected with [`NmsError::UnsupportedObjectType`].
pub fn suppress_volume(
    magnitude: Option<&Object>,
    grad_z: Option<&Object>,
    grad_y: Option<&Object>,
    grad_x: Option<&Object>,
    min_gradient: PixelValue,
) -> Result<Object, NmsError> {
    match magnitude.ok_or(NmsError::NullInput)? {
        Object::Empty => Ok(Object::Empty),
        Object::Domain2D(_) => suppress(magnitude, grad_y, grad_x, min_gradient),
        Object::Volume(_) => {
            for partner in [grad_z, grad_y, grad_x] {
                match partner.ok_or(NmsError::NullInput)? {
                    Object::Volume(_) | Object::Empty => {}
                    Object::Domain2D(_) => return Err(NmsError::UnsupportedObjectType),
                }
            }
            Err(NmsError::UnsupportedObjectType)
        }
    }
}

fn as_plane(obj: &Object) -> Result<Option<&DomainObject>, NmsError> {
    match obj {
        Object::Empty => Ok(None),
        Object::Domain2D(plane) => Ok(Some(plane)),
        Object::Volume(_) => Err(NmsError::UnsupportedObjectType),
    }
}

fn suppress_impl(
    magnitude: Option<&Object>,
    grad_y: Option<&Object>,
    grad_x: Option<&Object>,
    min_gradient: PixelValue,
    kind: Option<SampleKind>,
) -> Result<Object, NmsError> {
    let inputs = [
        magnitude.ok_or(NmsError::NullInput)?,
        grad_y.ok_or(NmsError::NullInput)?,
        grad_x.ok_or(NmsError::NullInput)?,
    ];
    if matches!(inputs[0], Object::Empty) {
        return Ok(Object::Empty);
    }
    let mut planes = Vec::with_capacity(3);
    for obj in inputs {
        planes.push(as_plane(obj)?);
    }
    let present = || planes.iter().flatten();
    if present().any(|p| p.domain.is_none()) {
        return Err(NmsError::MissingDomain);
    }
    if present().any(|p| p.values.is_none()) {
        return Err(NmsError::MissingValues);
    }
    let [Some(m), Some(y), Some(x)] = [planes[0], planes[1], planes[2]] else {
        debug!("suppress: empty partner object, nothing to do");
        return Ok(Object::Empty);
    };
    let (Some(m_dom), Some(y_dom), Some(x_dom)) = (&m.domain, &y.domain, &x.domain) else {
        return Err(NmsError::MissingDomain);
    };
    let (Some(m_val), Some(y_val), Some(x_val)) = (&m.values, &y.values, &x.values) else {
        return Err(NmsError::MissingValues);
    };

    let combined = intersect_n(&[m_dom, y_dom, x_dom])?;
    if combined.is_empty() {
        debug!("suppress: input domains do not intersect");
        return Ok(Object::Empty);
    }

    let kind = kind.unwrap_or_else(|| select_sample_kind(&[m_val, y_val, x_val]));
    debug!(
        "suppress: {} rows x {} cols, {} px, {:?} path",
        combined.height(),
        combined.width(),
        combined.area(),
        kind
    );
    let fields = Fields {
        combined: &combined,
        magnitude: m_val,
        grad_y: y_val,
        grad_x: x_val,
    };
    match kind {
        SampleKind::Integer => suppress_plane::<i32>(&fields, min_gradient),
        SampleKind::Floating => suppress_plane::<f64>(&fields, min_gradient),
    }
}

struct Fields<'a> {
    combined: &'a IntervalDomain,
    magnitude: &'a ValueTable,
    grad_y: &'a ValueTable,
    grad_x: &'a ValueTable,
}

fn suppress_plane<T: GradientSample>(
    fields: &Fields<'_>,
    min_gradient: PixelValue,
) -> Result<Object, NmsError> {
    let combined = fields.combined;
    let threshold = T::from_pixel(min_gradient);
    let mut codes = ValueTable::zeroed_u8(
        combined.first_row(),
        combined.first_col(),
        combined.width(),
        combined.height(),
    )?;
    let mut builder = RegionBuilder::for_domain(combined)?;
    let sync = Synchronizer::new(
        combined,
        GreyStream::new(combined, fields.magnitude),
        GreyStream::new(combined, fields.grad_y),
        GreyStream::new(combined, fields.grad_x),
        threshold,
    )?;
    let stats = sync.run(&mut codes, &mut builder)?;
    debug!(
        "suppress: scanned {} rows / {} runs, kept {} px in {} runs ({} pool blocks)",
        stats.rows,
        stats.runs,
        stats.retained,
        builder.run_count(),
        builder.pool().block_count()
    );
    let ridges = builder.finish()?;
    Ok(Object::Domain2D(DomainObject::new(ridges, codes)))
}

/// Retained pixels of a suppression result in raster order.
pub fn ridge_pixels(result: &Object) -> Vec<RidgePixel> {
    let (Some(domain), Some(values)) = (result.domain(), result.values()) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(domain.area());
    for (row, run) in domain.runs() {
        for col in run.start..=run.end() {
            let code = values
                .get(row, col)
                .and_then(|v| match v {
                    PixelValue::U8(b) => DirectionCode::from_tagged(b),
                    _ => None,
                });
            if let Some(code) = code {
                out.push(RidgePixel {
                    x: col,
                    y: row,
                    direction: code.value(),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::GreyBuffer;

    fn object(width: usize, height: usize, data: Vec<i32>) -> Object {
        let table = ValueTable::new(0, 0, width, height, GreyBuffer::I32(data)).unwrap();
        Object::Domain2D(DomainObject::from_table(table))
    }

    fn flat(width: usize, height: usize, value: i32) -> Object {
        object(width, height, vec![value; width * height])
    }

    #[test]
    fn null_inputs_are_rejected() {
        let o = flat(3, 3, 1);
        let t = PixelValue::I32(0);
        assert_eq!(suppress(None, Some(&o), Some(&o), t), Err(NmsError::NullInput));
        assert_eq!(suppress(Some(&o), None, Some(&o), t), Err(NmsError::NullInput));
        assert_eq!(suppress(Some(&o), Some(&o), None, t), Err(NmsError::NullInput));
    }

    #[test]
    fn missing_parts_are_distinct_errors() {
        let o = flat(3, 3, 1);
        let Object::Domain2D(full) = &o else { unreachable!() };
        let no_domain = Object::Domain2D(DomainObject {
            domain: None,
            values: full.values.clone(),
        });
        let no_values = Object::Domain2D(DomainObject {
            domain: full.domain.clone(),
            values: None,
        });
        let t = PixelValue::I32(0);
        assert_eq!(
            suppress(Some(&o), Some(&no_domain), Some(&o), t),
            Err(NmsError::MissingDomain)
        );
        assert_eq!(
            suppress(Some(&o), Some(&o), Some(&no_values), t),
            Err(NmsError::MissingValues)
        );
    }

    #[test]
    fn missing_parts_win_over_empty_partners() {
        let o = flat(3, 3, 1);
        let Object::Domain2D(full) = &o else { unreachable!() };
        let no_domain = Object::Domain2D(DomainObject {
            domain: None,
            values: full.values.clone(),
        });
        let no_values = Object::Domain2D(DomainObject {
            domain: full.domain.clone(),
            values: None,
        });
        let t = PixelValue::I32(0);
        assert_eq!(
            suppress(Some(&no_domain), Some(&Object::Empty), Some(&o), t),
            Err(NmsError::MissingDomain)
        );
        assert_eq!(
            suppress(Some(&o), Some(&no_values), Some(&Object::Empty), t),
            Err(NmsError::MissingValues)
        );
        assert_eq!(
            suppress(Some(&o), Some(&Object::Empty), Some(&o), t),
            Ok(Object::Empty)
        );
    }

    #[test]
    fn volumes_are_unsupported() {
        let vol = Object::Volume(crate::object::VolumeObject {
            first_plane: 0,
            planes: Vec::new(),
        });
        let o = flat(3, 3, 1);
        let t = PixelValue::I32(0);
        assert_eq!(
            suppress(Some(&vol), Some(&vol), Some(&vol), t),
            Err(NmsError::UnsupportedObjectType)
        );
        assert_eq!(
            suppress(Some(&o), Some(&vol), Some(&o), t),
            Err(NmsError::UnsupportedObjectType)
        );
        assert_eq!(
            suppress_volume(Some(&vol), Some(&vol), Some(&vol), Some(&vol), t),
            Err(NmsError::UnsupportedObjectType)
        );
        assert_eq!(
            suppress_volume(Some(&vol), None, Some(&vol), Some(&vol), t),
            Err(NmsError::NullInput)
        );
    }

    #[test]
    fn volume_entry_delegates_planes() {
        let o = flat(3, 3, 1);
        let t = PixelValue::I32(0);
        let via_volume = suppress_volume(Some(&o), None, Some(&o), Some(&o), t).unwrap();
        assert_eq!(via_volume, suppress(Some(&o), Some(&o), Some(&o), t).unwrap());
        assert_eq!(
            suppress_volume(Some(&Object::Empty), None, None, None, t),
            Ok(Object::Empty)
        );
    }

    #[test]
    fn empty_magnitude_gives_empty_result() {
        let o = flat(3, 3, 1);
        let r = suppress(Some(&Object::Empty), Some(&o), Some(&o), PixelValue::U8(0)).unwrap();
        assert_eq!(r, Object::Empty);
    }

    #[test]
    fn peak_is_listed_by_ridge_pixels() {
        #[rustfmt::skip]
        let mag = object(3, 3, vec![
            10, 10, 10,
            10, 50, 10,
            10, 10, 10,
        ]);
        let gy = flat(3, 3, 0);
        let gx = flat(3, 3, 1);
        let r = suppress(Some(&mag), Some(&gy), Some(&gx), PixelValue::I32(5)).unwrap();
        assert_eq!(
            ridge_pixels(&r),
            vec![RidgePixel {
                x: 1,
                y: 1,
                direction: 0
            }]
        );
        assert_eq!(r.value_at(1, 1), Some(PixelValue::U8(128)));
    }
}

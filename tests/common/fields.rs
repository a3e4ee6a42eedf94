//! Builders for small sparse gradient fields.
use ridge_nms::{DomainObject, GreyBuffer, IntervalDomain, Object, ValueTable};

/// Dense `width × height` i32 object at the origin, values from `f(x, y)`.
pub fn dense_i32(width: usize, height: usize, f: impl Fn(usize, usize) -> i32) -> Object {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            data.push(f(x, y));
        }
    }
    let table = ValueTable::new(0, 0, width, height, GreyBuffer::I32(data)).unwrap();
    Object::Domain2D(DomainObject::from_table(table))
}

pub fn constant_i32(width: usize, height: usize, value: i32) -> Object {
    dense_i32(width, height, |_, _| value)
}

/// Same values as `obj`, restricted to `domain`.
pub fn with_domain(obj: &Object, domain: IntervalDomain) -> Object {
    let values = obj.values().cloned().unwrap();
    Object::Domain2D(DomainObject::new(domain, values))
}

/// Re-store an i32 object as f64 samples.
pub fn as_f64(obj: &Object) -> Object {
    let table = obj.values().unwrap();
    let GreyBuffer::I32(data) = table.data() else {
        panic!("expected i32 samples");
    };
    let values = ValueTable::new(
        table.origin_row(),
        table.origin_col(),
        table.width(),
        table.height(),
        GreyBuffer::F64(data.iter().map(|&v| v as f64).collect()),
    )
    .unwrap();
    Object::Domain2D(DomainObject::new(obj.domain().cloned().unwrap(), values))
}

/// Small deterministic generator for property-style tests.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform in `lo..=hi`.
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        lo + (self.next_u32() % (hi - lo + 1) as u32) as i32
    }
}

/// Random magnitude and derivative fields of the given size.
pub fn random_fields(seed: u64, width: usize, height: usize) -> [Object; 3] {
    let mut rng = Lcg::new(seed);
    let mut field = |lo, hi| {
        let mut data = Vec::with_capacity(width * height);
        for _ in 0..width * height {
            data.push(rng.range(lo, hi));
        }
        data
    };
    let mag = field(0, 100);
    let gy = field(-20, 20);
    let gx = field(-20, 20);
    [mag, gy, gx].map(|data| {
        let table = ValueTable::new(0, 0, width, height, GreyBuffer::I32(data)).unwrap();
        Object::Domain2D(DomainObject::from_table(table))
    })
}

/// Random sparse domain inside `width × height`: each row gets up to three runs.
pub fn random_domain(seed: u64, width: usize, height: usize) -> IntervalDomain {
    let mut rng = Lcg::new(seed ^ 0x5eed);
    let mut rows = Vec::with_capacity(height);
    for _ in 0..height {
        let mut runs = Vec::new();
        let mut col = rng.range(0, 3);
        for _ in 0..rng.range(0, 3) {
            let len = rng.range(1, 8);
            if col + len > width as i32 {
                break;
            }
            runs.push(ridge_nms::Run::new(col, len as u32));
            col += len + rng.range(1, 4);
        }
        rows.push(runs);
    }
    IntervalDomain::from_rows(0, rows).unwrap()
}

//! Error type shared by the region, object and suppression modules.

/// Failure outcomes of building regions and running non-maximal suppression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NmsError {
    /// A required input object was not supplied.
    NullInput,
    /// An input object has no domain.
    MissingDomain,
    /// An input object has no value table.
    MissingValues,
    /// The object kind (or a mix of kinds) is not handled by this path.
    UnsupportedObjectType,
    /// A scratch buffer or run-pool block could not be allocated.
    AllocationFailure,
    /// A domain description violates the run ordering rules.
    InvalidDomainType,
    /// A domain pixel lies outside the value table it is read from.
    ValueTableBounds { row: i32, col: i32 },
}

impl std::fmt::Display for NmsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NmsError::NullInput => write!(f, "input object is missing"),
            NmsError::MissingDomain => write!(f, "input object has no domain"),
            NmsError::MissingValues => write!(f, "input object has no values"),
            NmsError::UnsupportedObjectType => write!(f, "unsupported object type"),
            NmsError::AllocationFailure => write!(f, "memory allocation failed"),
            NmsError::InvalidDomainType => {
                write!(f, "domain runs are unordered, overlapping or touching")
            }
            NmsError::ValueTableBounds { row, col } => write!(
                f,
                "pixel (row {row}, col {col}) is outside the value table"
            ),
        }
    }
}

impl std::error::Error for NmsError {}

/// Empty vector with room for `capacity` items, reporting exhaustion instead of aborting.
pub(crate) fn try_vec_with_capacity<T>(capacity: usize) -> Result<Vec<T>, NmsError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| NmsError::AllocationFailure)?;
    Ok(buf)
}

/// Allocate `len` copies of `value`, reporting exhaustion instead of aborting.
pub(crate) fn try_filled_vec<T: Clone>(len: usize, value: T) -> Result<Vec<T>, NmsError> {
    let mut buf = try_vec_with_capacity(len)?;
    buf.resize(len, value);
    Ok(buf)
}

//! Sparse 2D regions described row by row as disjoint column runs.
//!
//! An [`IntervalDomain`] covers a bounding box `first_row..=last_row ×
//! first_col..=last_col` and stores, for every row in that box, a sorted list
//! of non-touching [`Run`]s. Rows without runs are legal.
//!
//! - [`scan`]: raster-order interval cursor used to stream a domain.
//! - [`pool`]: append-only run pool with stable handles.
//! - [`builder`]: accumulates runs emitted in scan order into a new domain.

pub mod builder;
pub mod pool;
pub mod scan;

pub use builder::RegionBuilder;
pub use pool::{IntervalPool, RunHandle, RunRecord};
pub use scan::{IntervalStep, Intervals};

use crate::error::{try_filled_vec, try_vec_with_capacity, NmsError};
use serde::Serialize;

/// A contiguous span of columns within one row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Run {
    /// First column of the run
    pub start: i32,
    /// Number of columns, always > 0 inside a domain
    pub len: u32,
}

impl Run {
    pub fn new(start: i32, len: u32) -> Self {
        Self { start, len }
    }

    /// Last column covered by the run (inclusive).
    #[inline]
    pub fn end(&self) -> i32 {
        self.start + self.len as i32 - 1
    }

    #[inline]
    pub fn contains(&self, col: i32) -> bool {
        col >= self.start && col <= self.end()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntervalDomain {
    first_row: i32,
    last_row: i32,
    first_col: i32,
    last_col: i32,
    rows: Vec<Vec<Run>>,
}

impl IntervalDomain {
    /// The canonical empty domain.
    pub fn empty() -> Self {
        Self {
            first_row: 0,
            last_row: -1,
            first_col: 0,
            last_col: -1,
            rows: Vec::new(),
        }
    }

    /// A shell with a fixed extent and no runs yet.
    pub fn with_extent(
        first_row: i32,
        last_row: i32,
        first_col: i32,
        last_col: i32,
    ) -> Result<Self, NmsError> {
        let height = (last_row - first_row + 1).max(0) as usize;
        Ok(Self {
            first_row,
            last_row,
            first_col,
            last_col,
            rows: try_filled_vec(height, Vec::new())?,
        })
    }

    /// Full rectangle of `height` rows and `width` columns with its top-left corner at `(row, col)`.
    pub fn rect(row: i32, col: i32, height: usize, width: usize) -> Self {
        if height == 0 || width == 0 {
            return Self::empty();
        }
        Self {
            first_row: row,
            last_row: row + height as i32 - 1,
            first_col: col,
            last_col: col + width as i32 - 1,
            rows: vec![vec![Run::new(col, width as u32)]; height],
        }
    }

    /// Build a domain from explicit per-row runs starting at `first_row`.
    ///
    /// Runs in each row must be sorted, non-empty and separated by at least
    /// one column; otherwise [`NmsError::InvalidDomainType`] is returned.
    pub fn from_rows(first_row: i32, rows: Vec<Vec<Run>>) -> Result<Self, NmsError> {
        for line in &rows {
            validate_line(line)?;
        }
        let mut domain = Self {
            first_row,
            last_row: first_row + rows.len() as i32 - 1,
            first_col: 0,
            last_col: -1,
            rows,
        };
        domain.standardize();
        Ok(domain)
    }

    pub fn first_row(&self) -> i32 {
        self.first_row
    }

    pub fn last_row(&self) -> i32 {
        self.last_row
    }

    pub fn first_col(&self) -> i32 {
        self.first_col
    }

    pub fn last_col(&self) -> i32 {
        self.last_col
    }

    /// Number of rows in the bounding box.
    pub fn height(&self) -> usize {
        (self.last_row - self.first_row + 1).max(0) as usize
    }

    /// Number of columns in the bounding box.
    pub fn width(&self) -> usize {
        (self.last_col - self.first_col + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|line| line.is_empty())
    }

    /// Number of pixels covered by the runs.
    pub fn area(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|line| line.iter())
            .map(|run| run.len as usize)
            .sum()
    }

    pub fn run_count(&self) -> usize {
        self.rows.iter().map(|line| line.len()).sum()
    }

    /// Runs of `row`, empty when the row is outside the bounding box.
    pub fn row_runs(&self, row: i32) -> &[Run] {
        if row < self.first_row || row > self.last_row {
            return &[];
        }
        &self.rows[(row - self.first_row) as usize]
    }

    pub fn contains(&self, row: i32, col: i32) -> bool {
        self.row_runs(row).iter().any(|run| run.contains(col))
    }

    /// Raster-order cursor over all runs.
    pub fn intervals(&self) -> Intervals<'_> {
        Intervals::new(self)
    }

    /// Iterate `(row, run)` pairs in raster order.
    pub fn runs(&self) -> impl Iterator<Item = (i32, Run)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(i, line)| {
            let row = self.first_row + i as i32;
            line.iter().map(move |&run| (row, run))
        })
    }

    /// Append a run to `row`; the run must lie right of the row's last run.
    pub(crate) fn push_run(&mut self, row: i32, run: Run) -> Result<(), NmsError> {
        if row < self.first_row || row > self.last_row || run.len == 0 {
            return Err(NmsError::InvalidDomainType);
        }
        let line = &mut self.rows[(row - self.first_row) as usize];
        if let Some(last) = line.last() {
            if run.start <= last.end() {
                return Err(NmsError::InvalidDomainType);
            }
        }
        line.push(run);
        Ok(())
    }

    /// Canonicalize: merge touching runs, drop empty border rows and shrink
    /// the column extent to the runs actually present.
    pub fn standardize(&mut self) {
        for line in &mut self.rows {
            merge_touching(line);
        }
        let Some(top) = self.rows.iter().position(|line| !line.is_empty()) else {
            *self = Self::empty();
            return;
        };
        let bottom = self
            .rows
            .iter()
            .rposition(|line| !line.is_empty())
            .unwrap_or(top);
        self.rows.truncate(bottom + 1);
        self.rows.drain(..top);
        self.first_row += top as i32;
        self.last_row = self.first_row + self.rows.len() as i32 - 1;

        let mut first_col = i32::MAX;
        let mut last_col = i32::MIN;
        for line in &self.rows {
            if let (Some(first), Some(last)) = (line.first(), line.last()) {
                first_col = first_col.min(first.start);
                last_col = last_col.max(last.end());
            }
        }
        self.first_col = first_col;
        self.last_col = last_col;
    }
}

fn validate_line(line: &[Run]) -> Result<(), NmsError> {
    if line.iter().any(|run| run.len == 0) {
        return Err(NmsError::InvalidDomainType);
    }
    for pair in line.windows(2) {
        if pair[1].start <= pair[0].end() + 1 {
            return Err(NmsError::InvalidDomainType);
        }
    }
    Ok(())
}

/// Merge in place; `kept` is the length of the merged prefix.
fn merge_touching(line: &mut Vec<Run>) {
    if line.len() < 2 {
        return;
    }
    line.sort_unstable_by_key(|run| run.start);
    let mut kept = 1;
    for i in 1..line.len() {
        let run = line[i];
        let prev = &mut line[kept - 1];
        if run.start <= prev.end() + 1 {
            let end = prev.end().max(run.end());
            prev.len = (end - prev.start + 1) as u32;
        } else {
            line[kept] = run;
            kept += 1;
        }
    }
    line.truncate(kept);
}

/// Intersect any number of domains. Zero domains, or no common pixel, give
/// the canonical empty domain.
pub fn intersect_n(domains: &[&IntervalDomain]) -> Result<IntervalDomain, NmsError> {
    let Some((first, rest)) = domains.split_first() else {
        return Ok(IntervalDomain::empty());
    };
    if domains.iter().any(|d| d.is_empty()) {
        return Ok(IntervalDomain::empty());
    }
    let first_row = domains.iter().map(|d| d.first_row).max().unwrap_or(0);
    let last_row = domains.iter().map(|d| d.last_row).min().unwrap_or(-1);
    if first_row > last_row {
        return Ok(IntervalDomain::empty());
    }

    let mut rows = try_vec_with_capacity((last_row - first_row + 1) as usize)?;
    for row in first_row..=last_row {
        let runs = first.row_runs(row);
        let mut acc = try_vec_with_capacity(runs.len())?;
        acc.extend_from_slice(runs);
        for other in rest {
            if acc.is_empty() {
                break;
            }
            acc = intersect_line(&acc, other.row_runs(row))?;
        }
        rows.push(acc);
    }
    let mut out = IntervalDomain {
        first_row,
        last_row,
        first_col: 0,
        last_col: -1,
        rows,
    };
    out.standardize();
    Ok(out)
}

/// Two-pointer intersection of two sorted run lists.
fn intersect_line(a: &[Run], b: &[Run]) -> Result<Vec<Run>, NmsError> {
    // Each step emits at most one run and consumes one input run.
    let mut out = try_vec_with_capacity(a.len() + b.len())?;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let start = a[i].start.max(b[j].start);
        let end = a[i].end().min(b[j].end());
        if start <= end {
            out.push(Run::new(start, (end - start + 1) as u32));
        }
        if a[i].end() < b[j].end() {
            i += 1;
        } else {
            j += 1;
        }
    }
    Ok(out)
}

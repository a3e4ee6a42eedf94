//! Raster-order interval cursor over an [`IntervalDomain`].
use super::{IntervalDomain, Run};

/// One interval visited by the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalStep {
    pub row: i32,
    pub run: Run,
    /// Rows advanced since the previous interval (0 within a row). The first
    /// interval reports the distance from the row above the bounding box.
    pub line_gap: u32,
}

/// Walks the runs of a domain row by row, left to right.
pub struct Intervals<'a> {
    domain: &'a IntervalDomain,
    line: usize,
    index: usize,
    last_row: Option<i32>,
}

impl<'a> Intervals<'a> {
    pub(super) fn new(domain: &'a IntervalDomain) -> Self {
        Self {
            domain,
            line: 0,
            index: 0,
            last_row: None,
        }
    }
}

impl<'a> Iterator for Intervals<'a> {
    type Item = IntervalStep;

    fn next(&mut self) -> Option<Self::Item> {
        while self.line < self.domain.rows.len() {
            let runs = &self.domain.rows[self.line];
            if self.index < runs.len() {
                let row = self.domain.first_row + self.line as i32;
                let run = runs[self.index];
                self.index += 1;
                let previous = self.last_row.unwrap_or(self.domain.first_row - 1);
                self.last_row = Some(row);
                return Some(IntervalStep {
                    row,
                    run,
                    line_gap: (row - previous) as u32,
                });
            }
            self.line += 1;
            self.index = 0;
        }
        None
    }
}

//! Row-keyed merge-join of the driver domain with the three value streams.
//!
//! The driver walks the rows of the combined domain. Each value stream is an
//! independent interval cursor over its own domain and value table; before a
//! row is used, every stream is advanced past earlier rows and the runs it
//! holds for that row are copied into the [`Neighborhood`] buffers.
//!
//! Scanning lags loading by one row: row `r` is scanned once row `r + 1` is
//! in the ring (loaded, or known to be absent and zero-filled).
use super::neighborhood::Neighborhood;
use super::sample::GradientSample;
use super::scanner::scan_run;
use crate::error::NmsError;
use crate::object::ValueTable;
use crate::region::{IntervalDomain, Intervals, RegionBuilder, Run};
use std::iter::Peekable;

/// Interval cursor over one input field.
pub struct GreyStream<'a> {
    intervals: Peekable<Intervals<'a>>,
    values: &'a ValueTable,
}

impl<'a> GreyStream<'a> {
    pub fn new(domain: &'a IntervalDomain, values: &'a ValueTable) -> Self {
        Self {
            intervals: domain.intervals().peekable(),
            values,
        }
    }

    /// Next run of `row`, discarding any runs of earlier rows.
    fn next_in_row(&mut self, row: i32) -> Option<Run> {
        while let Some(step) = self.intervals.peek() {
            if step.row < row {
                self.intervals.next();
            } else if step.row == row {
                return self.intervals.next().map(|s| s.run);
            } else {
                return None;
            }
        }
        None
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub rows: usize,
    pub runs: usize,
    pub retained: usize,
}

pub struct Synchronizer<'a, T> {
    driver: &'a IntervalDomain,
    magnitude: GreyStream<'a>,
    grad_y: GreyStream<'a>,
    grad_x: GreyStream<'a>,
    ring: Neighborhood<T>,
    threshold: T,
    stats: ScanStats,
}

impl<'a, T: GradientSample> Synchronizer<'a, T> {
    pub fn new(
        driver: &'a IntervalDomain,
        magnitude: GreyStream<'a>,
        grad_y: GreyStream<'a>,
        grad_x: GreyStream<'a>,
        threshold: T,
    ) -> Result<Self, NmsError> {
        let ring = Neighborhood::new(driver.first_col(), driver.width())?;
        Ok(Self {
            driver,
            magnitude,
            grad_y,
            grad_x,
            ring,
            threshold,
            stats: ScanStats::default(),
        })
    }

    /// Scan every driver row, writing direction bytes into `codes` (a table
    /// covering the driver's bounding box) and ridge runs into `builder`.
    pub fn run(
        mut self,
        codes: &mut ValueTable,
        builder: &mut RegionBuilder,
    ) -> Result<ScanStats, NmsError> {
        let driver = self.driver;
        let mut pending: Option<i32> = None;
        // Only the first interval of each row advances the ring.
        for step in driver.intervals().filter(|step| step.line_gap > 0) {
            let row = step.row;
            if step.line_gap > 1 {
                if let Some(p) = pending.take() {
                    self.ring.advance_to(p + 1);
                    self.scan_row(p, driver.row_runs(p), codes, builder)?;
                }
            }
            self.ring.advance_to(row);
            self.load_magnitude(row)?;
            if let Some(p) = pending.take() {
                self.scan_row(p, driver.row_runs(p), codes, builder)?;
            }
            pending = Some(row);
        }
        if let Some(p) = pending {
            self.ring.advance_to(p + 1);
            self.scan_row(p, driver.row_runs(p), codes, builder)?;
        }
        Ok(self.stats)
    }

    fn load_magnitude(&mut self, row: i32) -> Result<(), NmsError> {
        while let Some(run) = self.magnitude.next_in_row(row) {
            let dst = self.ring.magnitude_span_mut(row, run.start, run.len as usize);
            self.magnitude.values.read_run(row, run.start, dst)?;
        }
        Ok(())
    }

    fn load_derivatives(&mut self, row: i32) -> Result<(), NmsError> {
        self.ring.begin_derivatives(row);
        while let Some(run) = self.grad_y.next_in_row(row) {
            let dst = self.ring.grad_y_span_mut(run.start, run.len as usize);
            self.grad_y.values.read_run(row, run.start, dst)?;
        }
        while let Some(run) = self.grad_x.next_in_row(row) {
            let dst = self.ring.grad_x_span_mut(run.start, run.len as usize);
            self.grad_x.values.read_run(row, run.start, dst)?;
        }
        Ok(())
    }

    fn scan_row(
        &mut self,
        row: i32,
        runs: &[Run],
        codes: &mut ValueTable,
        builder: &mut RegionBuilder,
    ) -> Result<(), NmsError> {
        self.load_derivatives(row)?;
        let window = self.ring.window(row);
        for &run in runs {
            let bytes = codes.u8_run_mut(row, run.start, run.len as usize)?;
            self.stats.retained += scan_run(&window, run, self.threshold, bytes, builder)?;
            self.stats.runs += 1;
        }
        self.stats.rows += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::GreyBuffer;

    fn table(width: usize, height: usize, f: impl Fn(usize, usize) -> i32) -> ValueTable {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        ValueTable::new(0, 0, width, height, GreyBuffer::I32(data)).unwrap()
    }

    #[test]
    fn streams_with_wider_domains_are_joined_by_row() {
        // Driver covers rows 1..=3 only; value streams cover the full 5x5 table.
        let full = IntervalDomain::rect(0, 0, 5, 5);
        let driver = IntervalDomain::rect(1, 0, 3, 5);
        let mag = table(5, 5, |_, y| if y == 2 { 50 } else { 10 });
        let gy = table(5, 5, |_, _| 1);
        let gx = table(5, 5, |_, _| 0);
        let sync = Synchronizer::new(
            &driver,
            GreyStream::new(&full, &mag),
            GreyStream::new(&full, &gy),
            GreyStream::new(&full, &gx),
            0i32,
        )
        .unwrap();
        let mut codes = ValueTable::zeroed_u8(1, 0, 5, 3).unwrap();
        let mut builder = RegionBuilder::for_domain(&driver).unwrap();
        let stats = sync.run(&mut codes, &mut builder).unwrap();
        assert_eq!(stats, ScanStats { rows: 3, runs: 3, retained: 3 });
        let ridges = builder.finish().unwrap();
        assert_eq!(ridges.row_runs(2), &[Run::new(1, 3)]);
        assert_eq!(ridges.area(), 3);
    }

    #[test]
    fn gap_rows_read_as_zero() {
        // Rows 0 and 2 only: row 1 is absent, so each row sees zero neighbours
        // above and below and every interior pixel with a vertical gradient is a ridge.
        let driver =
            IntervalDomain::from_rows(0, vec![vec![Run::new(0, 4)], vec![], vec![Run::new(0, 4)]])
                .unwrap();
        let mag = table(4, 3, |_, _| 7);
        let gy = table(4, 3, |_, _| 2);
        let gx = table(4, 3, |_, _| 0);
        let sync = Synchronizer::new(
            &driver,
            GreyStream::new(&driver, &mag),
            GreyStream::new(&driver, &gy),
            GreyStream::new(&driver, &gx),
            0i32,
        )
        .unwrap();
        let mut codes = ValueTable::zeroed_u8(0, 0, 4, 3).unwrap();
        let mut builder = RegionBuilder::for_domain(&driver).unwrap();
        let stats = sync.run(&mut codes, &mut builder).unwrap();
        assert_eq!(stats.rows, 2);
        assert_eq!(stats.retained, 4);
        let ridges = builder.finish().unwrap();
        assert_eq!(ridges.row_runs(0), &[Run::new(1, 2)]);
        assert!(ridges.row_runs(1).is_empty());
        assert_eq!(ridges.row_runs(2), &[Run::new(1, 2)]);
    }

    #[test]
    fn rows_with_several_runs_are_scanned_once() {
        let driver = IntervalDomain::from_rows(
            0,
            vec![
                vec![Run::new(0, 2), Run::new(3, 2)],
                vec![Run::new(0, 2), Run::new(3, 2)],
                vec![],
                vec![],
                vec![Run::new(1, 3)],
            ],
        )
        .unwrap();
        let mag = table(5, 5, |_, _| 7);
        let gy = table(5, 5, |_, _| 2);
        let gx = table(5, 5, |_, _| 0);
        let sync = Synchronizer::new(
            &driver,
            GreyStream::new(&driver, &mag),
            GreyStream::new(&driver, &gy),
            GreyStream::new(&driver, &gx),
            0i32,
        )
        .unwrap();
        let mut codes = ValueTable::zeroed_u8(0, 0, 5, 5).unwrap();
        let mut builder = RegionBuilder::for_domain(&driver).unwrap();
        let stats = sync.run(&mut codes, &mut builder).unwrap();
        assert_eq!(stats.rows, 3);
        assert_eq!(stats.runs, 5);
    }
}

//! Incremental construction of a domain from runs emitted in scan order.
use super::{IntervalDomain, IntervalPool, Run, RunHandle};
use crate::error::NmsError;

/// Collects runs into a pre-sized domain shell.
///
/// Runs go through an [`IntervalPool`] as they are found; [`RegionBuilder::finish`]
/// moves them into the shell and standardizes it.
#[derive(Debug)]
pub struct RegionBuilder {
    shell: IntervalDomain,
    pool: IntervalPool,
    last: Option<(i32, i32)>,
}

impl RegionBuilder {
    pub fn new(shell: IntervalDomain, pool: IntervalPool) -> Self {
        Self {
            shell,
            pool,
            last: None,
        }
    }

    /// Builder whose shell and pool are sized for the extent of `domain`.
    pub fn for_domain(domain: &IntervalDomain) -> Result<Self, NmsError> {
        let pool = IntervalPool::for_extent(domain.height(), domain.width())?;
        let shell = IntervalDomain::with_extent(
            domain.first_row(),
            domain.last_row(),
            domain.first_col(),
            domain.last_col(),
        )?;
        Ok(Self::new(shell, pool))
    }

    /// Record a run. Runs must arrive row-ascending and, within a row,
    /// strictly right of the previous run.
    pub fn append(&mut self, row: i32, start: i32, len: u32) -> Result<RunHandle, NmsError> {
        if len == 0
            || row < self.shell.first_row()
            || row > self.shell.last_row()
            || start < self.shell.first_col()
            || start + len as i32 - 1 > self.shell.last_col()
        {
            return Err(NmsError::InvalidDomainType);
        }
        if let Some((last_row, last_end)) = self.last {
            if row < last_row || (row == last_row && start <= last_end) {
                return Err(NmsError::InvalidDomainType);
            }
        }
        self.last = Some((row, start + len as i32 - 1));
        self.pool.append(row, start, len)
    }

    pub fn run_count(&self) -> usize {
        self.pool.len()
    }

    pub fn pool(&self) -> &IntervalPool {
        &self.pool
    }

    /// Move the pooled runs into the shell and standardize it.
    pub fn finish(self) -> Result<IntervalDomain, NmsError> {
        let Self {
            mut shell, pool, ..
        } = self;
        for record in pool.iter() {
            shell.push_run(record.row, Run::new(record.start, record.len))?;
        }
        shell.standardize();
        Ok(shell)
    }
}

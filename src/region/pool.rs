//! Append-only pool of run records.
//!
//! Records live in fixed-capacity blocks; a full block is never grown in
//! place, a new one is allocated instead, so every [`RunHandle`] stays valid
//! for the lifetime of the pool.
use crate::error::NmsError;

/// Records per block used when no estimate is available.
pub const DEFAULT_BLOCK_LEN: usize = 1024;

/// A `(row, start, len)` run as emitted by the scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunRecord {
    pub row: i32,
    pub start: i32,
    pub len: u32,
}

/// Stable position of a record inside the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunHandle {
    block: u32,
    slot: u32,
}

#[derive(Debug)]
pub struct IntervalPool {
    block_len: usize,
    blocks: Vec<Vec<RunRecord>>,
    len: usize,
}

impl IntervalPool {
    pub fn new() -> Self {
        Self::with_block_len(DEFAULT_BLOCK_LEN)
    }

    pub fn with_block_len(block_len: usize) -> Self {
        Self {
            block_len: block_len.max(1),
            blocks: Vec::new(),
            len: 0,
        }
    }

    /// Expected number of output runs for a bounding box: a small share of
    /// the area, one run per column of width, plus a fixed margin.
    pub fn estimate(height: usize, width: usize) -> usize {
        height.saturating_mul(width) / 64 + width + DEFAULT_BLOCK_LEN
    }

    /// Pool whose block size follows [`IntervalPool::estimate`], with the first block allocated.
    pub fn for_extent(height: usize, width: usize) -> Result<Self, NmsError> {
        let estimate = Self::estimate(height, width);
        let mut pool = Self::with_block_len(estimate);
        pool.reserve(estimate)?;
        Ok(pool)
    }

    /// Make room for at least `additional` more records without further allocation.
    pub fn reserve(&mut self, additional: usize) -> Result<(), NmsError> {
        let spare = self
            .blocks
            .last()
            .map_or(0, |b| b.capacity() - b.len());
        if spare < additional {
            self.push_block(additional.max(self.block_len))?;
        }
        Ok(())
    }

    pub fn append(&mut self, row: i32, start: i32, len: u32) -> Result<RunHandle, NmsError> {
        let full = self
            .blocks
            .last()
            .map_or(true, |b| b.len() == b.capacity());
        if full {
            self.push_block(self.block_len)?;
        }
        let block_index = self.blocks.len() - 1;
        let block = &mut self.blocks[block_index];
        let slot = block.len();
        block.push(RunRecord { row, start, len });
        self.len += 1;
        Ok(RunHandle {
            block: block_index as u32,
            slot: slot as u32,
        })
    }

    pub fn get(&self, handle: RunHandle) -> Option<&RunRecord> {
        self.blocks
            .get(handle.block as usize)
            .and_then(|b| b.get(handle.slot as usize))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Records in append order.
    pub fn iter(&self) -> impl Iterator<Item = &RunRecord> + '_ {
        self.blocks.iter().flat_map(|b| b.iter())
    }

    fn push_block(&mut self, capacity: usize) -> Result<(), NmsError> {
        let mut block = Vec::new();
        block
            .try_reserve_exact(capacity)
            .map_err(|_| NmsError::AllocationFailure)?;
        self.blocks.push(block);
        Ok(())
    }
}

impl Default for IntervalPool {
    fn default() -> Self {
        Self::new()
    }
}

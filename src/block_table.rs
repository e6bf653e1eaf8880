// Fixed-length table of blocks and the contiguous-run search over it.

use crate::error::{FsError, Result};
use crate::fs_structs::{Block, BlockInfo};
use tracing::debug;

/// Checks that `block_size` blocks fill `system_size` bytes exactly and
/// returns how many blocks that is.
pub fn check_geometry(system_size: usize, block_size: usize) -> Result<usize> {
    if system_size == 0 || block_size == 0 {
        return Err(FsError::InvalidSize(format!(
            "system size ({}) and block size ({}) must be positive",
            system_size, block_size
        )));
    }
    if block_size > system_size {
        return Err(FsError::InvalidSize(format!(
            "not enough memory for a block of {} bytes (system size {})",
            block_size, system_size
        )));
    }
    if system_size % block_size != 0 {
        return Err(FsError::InvalidSize(format!(
            "system size {} must be divisible by block size {}",
            system_size, block_size
        )));
    }
    Ok(system_size / block_size)
}

/// The simulated device: `len()` equal-capacity blocks addressed by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTable {
    block_capacity: usize,
    blocks: Vec<Block>,
}

impl BlockTable {
    pub fn new(block_capacity: usize, length: usize) -> Result<Self> {
        if block_capacity == 0 {
            return Err(FsError::InvalidSize(
                "block capacity must be positive".to_string(),
            ));
        }
        if length == 0 {
            return Err(FsError::InvalidSize(
                "table must hold at least one block".to_string(),
            ));
        }

        Ok(BlockTable {
            block_capacity,
            blocks: vec![Block::new(block_capacity); length],
        })
    }

    /// Builds a table that divides `system_size` bytes into `block_size` blocks.
    pub fn from_system_size(system_size: usize, block_size: usize) -> Result<Self> {
        let length = check_geometry(system_size, block_size)?;
        Self::new(block_size, length)
    }

    pub fn block_capacity(&self) -> usize {
        self.block_capacity
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Out-of-range indices are never free.
    pub fn is_free(&self, index: usize) -> bool {
        self.blocks.get(index).is_some_and(Block::is_free)
    }

    /// Number of blocks a file of `size` bytes spans.
    pub fn blocks_needed(&self, size: usize) -> usize {
        size.div_ceil(self.block_capacity)
    }

    /// First-fit search: the lowest start index of `blocks_needed` consecutive
    /// free blocks. Free blocks on either side of an occupied one never join.
    pub fn find_free_run(&self, blocks_needed: usize) -> Option<usize> {
        if blocks_needed == 0 {
            return None;
        }

        let mut run = 0;
        for (i, block) in self.blocks.iter().enumerate() {
            if block.occupied {
                run = 0;
                continue;
            }
            run += 1;
            if run == blocks_needed {
                let start = i + 1 - blocks_needed;
                debug!(blocks_needed, start, "found free run");
                return Some(start);
            }
        }

        debug!(blocks_needed, "no free run long enough");
        None
    }

    /// Fills `[start, start + span)` with `total_bytes`: every block but the
    /// last at full capacity, the last with the remainder. Returns the span.
    pub fn occupy_range(&mut self, start: usize, total_bytes: usize) -> Result<usize> {
        if total_bytes == 0 {
            return Err(FsError::InvalidInput(
                "cannot occupy a range with zero bytes".to_string(),
            ));
        }
        let span = self.blocks_needed(total_bytes);
        self.check_range(start, span)?;

        // Validate the whole range before touching any block
        if let Some(offset) = self.blocks[start..start + span]
            .iter()
            .position(|block| block.occupied)
        {
            return Err(FsError::BlockInUse(start + offset));
        }

        let last = start + span - 1;
        let remainder = total_bytes - (span - 1) * self.block_capacity;
        for block in &mut self.blocks[start..last] {
            block.fill(self.block_capacity);
        }
        self.blocks[last].fill(remainder);

        debug!(start, span, total_bytes, remainder, "occupied range");
        Ok(span)
    }

    /// Returns every block in `[start, start + span)` to the zero state.
    pub fn release_range(&mut self, start: usize, span: usize) -> Result<()> {
        self.check_range(start, span)?;
        for block in &mut self.blocks[start..start + span] {
            block.reset();
        }
        debug!(start, span, "released range");
        Ok(())
    }

    /// Resets every block in the table.
    pub fn clear(&mut self) {
        self.blocks.iter_mut().for_each(Block::reset);
    }

    pub fn snapshot(&self) -> Vec<BlockInfo> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| BlockInfo {
                index,
                used: block.used,
                fragmented: block.fragmented,
                occupied: block.occupied,
            })
            .collect()
    }

    pub fn free_block_count(&self) -> usize {
        self.blocks.iter().filter(|block| block.is_free()).count()
    }

    /// Length of the longest run of consecutive free blocks.
    pub fn largest_free_run(&self) -> usize {
        let mut longest = 0;
        let mut run = 0;
        for block in &self.blocks {
            if block.occupied {
                run = 0;
            } else {
                run += 1;
                longest = longest.max(run);
            }
        }
        longest
    }

    pub fn used_bytes(&self) -> usize {
        self.blocks.iter().map(|block| block.used).sum()
    }

    /// Internal fragmentation summed over every occupied block.
    pub fn fragmented_bytes(&self) -> usize {
        self.blocks.iter().map(|block| block.fragmented).sum()
    }

    fn check_range(&self, start: usize, span: usize) -> Result<()> {
        match start.checked_add(span) {
            Some(end) if end <= self.blocks.len() => Ok(()),
            _ => Err(FsError::OutOfBounds {
                start,
                end: start.saturating_add(span),
                len: self.blocks.len(),
            }),
        }
    }
}

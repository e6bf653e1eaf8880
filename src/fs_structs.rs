// Struct definitions for the block table and directory
use serde::Serialize;

pub const KILOBYTE: usize = 1024;
pub const MEGABYTE: usize = 1024 * KILOBYTE;
pub const DEFAULT_SYSTEM_SIZE: usize = MEGABYTE; // 1 MB
pub const DEFAULT_BLOCK_SIZE: usize = 4 * KILOBYTE; // 4 KB

/// Bookkeeping for one fixed-capacity block of simulated storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub capacity: usize,
    pub used: usize,
    pub fragmented: usize, // Unused bytes of an occupied block
    pub occupied: bool,
}

impl Block {
    pub fn new(capacity: usize) -> Self {
        Block {
            capacity,
            used: 0,
            fragmented: 0,
            occupied: false,
        }
    }

    /// Marks the block as holding `used` bytes. Filling with zero bytes is the
    /// same as a reset, so `occupied` always tracks `used > 0`.
    pub fn fill(&mut self, used: usize) {
        debug_assert!(used <= self.capacity);
        if used == 0 {
            self.reset();
            return;
        }
        self.used = used;
        self.fragmented = self.capacity - used;
        self.occupied = true;
    }

    pub fn reset(&mut self) {
        self.used = 0;
        self.fragmented = 0;
        self.occupied = false;
    }

    pub fn is_free(&self) -> bool {
        !self.occupied
    }
}

/// Read-only view of one block, as listed by the table snapshot.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub index: usize,
    pub used: usize,
    pub fragmented: usize,
    pub occupied: bool,
}

/// Directory record binding a file name to the block range holding it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub size: usize,
    pub start: usize,
    pub span: usize, // Number of blocks
}

impl Entry {
    pub fn new(name: impl Into<String>, size: usize, start: usize, span: usize) -> Self {
        Entry {
            name: name.into(),
            size,
            start,
            span,
        }
    }

    /// One past the last block index of this entry.
    pub fn end(&self) -> usize {
        self.start + self.span
    }

    pub fn contains_block(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }
}

/// Aggregate usage figures for the whole simulated device.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub total_blocks: usize,
    pub free_blocks: usize,
    pub largest_free_run: usize,
    pub used_bytes: usize,
    pub fragmented_bytes: usize,
    pub files: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_tracks_fragmentation() {
        let mut block = Block::new(100);
        block.fill(40);
        assert_eq!(block.used, 40);
        assert_eq!(block.fragmented, 60);
        assert!(block.occupied);

        block.fill(100);
        assert_eq!(block.fragmented, 0);
        assert!(!block.is_free());
    }

    #[test]
    fn fill_with_zero_resets() {
        let mut block = Block::new(100);
        block.fill(70);
        block.fill(0);
        assert_eq!(block, Block::new(100));
    }

    #[test]
    fn entry_range() {
        let entry = Entry::new("a.txt", 250, 4, 3);
        assert_eq!(entry.end(), 7);
        assert!(!entry.contains_block(3));
        assert!(entry.contains_block(4));
        assert!(entry.contains_block(6));
        assert!(!entry.contains_block(7));
    }
}

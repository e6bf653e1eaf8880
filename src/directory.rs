// Fixed-capacity directory of file entries, kept in insertion order.

use crate::error::{FsError, Result};
use crate::fs_structs::Entry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    capacity: usize,
    entries: Vec<Entry>,
}

impl Directory {
    pub fn new(capacity: usize) -> Self {
        Directory {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Appends an entry; listing order is chronological.
    pub fn add(&mut self, entry: Entry) -> Result<()> {
        if self.is_full() {
            return Err(FsError::DirectoryFull(self.capacity));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Removes the entry at `index`, shifting later entries forward.
    pub fn remove_at(&mut self, index: usize) -> Result<Entry> {
        if index >= self.entries.len() {
            return Err(FsError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    /// Index of the first entry named exactly `name`.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

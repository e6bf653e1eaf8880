// Core logic for adding and deleting files on the simulated device.

use crate::block_table::BlockTable;
use crate::config::FsConfig;
use crate::directory::Directory;
use crate::error::{FsError, Result};
use crate::fs_structs::{BlockInfo, Entry, Usage};
use tracing::{info, warn};

/// Places a file of `size` bytes in the first free run long enough for it and
/// records it in the directory. Either both structures change or neither does.
pub fn add_file(
    table: &mut BlockTable,
    directory: &mut Directory,
    name: &str,
    size: usize,
) -> Result<Entry> {
    // Check if the name and size are valid
    if name.is_empty() {
        return Err(FsError::InvalidInput(
            "file name must not be empty".to_string(),
        ));
    }
    if size == 0 {
        return Err(FsError::InvalidInput(
            "file size must be positive".to_string(),
        ));
    }

    // Check if the name already exists
    if directory.find_by_name(name).is_some() {
        return Err(FsError::FileExists(name.to_string()));
    }

    // Find a contiguous run of free blocks
    let blocks_needed = table.blocks_needed(size);
    let start = match table.find_free_run(blocks_needed) {
        Some(start) => start,
        None => {
            let largest_free_run = table.largest_free_run();
            warn!(file = name, size, blocks_needed, largest_free_run, "no contiguous space");
            return Err(FsError::InsufficientSpace {
                size,
                blocks_needed,
                largest_free_run,
            });
        }
    };

    let span = table.occupy_range(start, size)?;
    let entry = Entry::new(name, size, start, span);
    if let Err(e) = directory.add(entry.clone()) {
        // Undo the table update so occupancy and directory never diverge
        warn!(file = name, error = %e, "directory rejected entry, releasing blocks");
        table.release_range(start, span)?;
        return Err(e);
    }

    info!(file = name, size, start, span, "added file");
    Ok(entry)
}

/// Frees the blocks of the first entry named `name` and removes that entry.
pub fn delete_file(table: &mut BlockTable, directory: &mut Directory, name: &str) -> Result<Entry> {
    let index = directory
        .find_by_name(name)
        .ok_or_else(|| FsError::FileNotFound(name.to_string()))?;
    let (start, span) = match directory.get(index) {
        Some(entry) => (entry.start, entry.span),
        None => {
            return Err(FsError::IndexOutOfRange {
                index,
                len: directory.len(),
            })
        }
    };

    // Release the range first; it is validated before any block changes
    table.release_range(start, span)?;
    let entry = directory.remove_at(index)?;

    info!(file = name, start, span, "deleted file");
    Ok(entry)
}

/// FileSystemManager owns the block table and directory for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemManager {
    table: BlockTable,
    directory: Directory,
}

impl FileSystemManager {
    /// Builds an empty device of `system_size` bytes split into `block_size` blocks.
    pub fn init_filesystem(system_size: usize, block_size: usize) -> Result<Self> {
        let table = BlockTable::from_system_size(system_size, block_size)?;
        // One file per block is the most the table can hold
        let directory = Directory::new(table.len());

        info!(
            system_size,
            block_size,
            blocks = table.len(),
            "initialized block table"
        );
        Ok(FileSystemManager { table, directory })
    }

    pub fn from_config(config: &FsConfig) -> Result<Self> {
        config.validate()?;
        Self::init_filesystem(config.system_size, config.block_size)
    }

    pub fn add_file(&mut self, name: &str, size: usize) -> Result<Entry> {
        add_file(&mut self.table, &mut self.directory, name, size)
    }

    pub fn delete_file(&mut self, name: &str) -> Result<Entry> {
        delete_file(&mut self.table, &mut self.directory, name)
    }

    pub fn snapshot_table(&self) -> Vec<BlockInfo> {
        self.table.snapshot()
    }

    pub fn snapshot_directory(&self) -> Vec<Entry> {
        self.directory.list().to_vec()
    }

    pub fn usage(&self) -> Usage {
        Usage {
            total_blocks: self.table.len(),
            free_blocks: self.table.free_block_count(),
            largest_free_run: self.table.largest_free_run(),
            used_bytes: self.table.used_bytes(),
            fragmented_bytes: self.table.fragmented_bytes(),
            files: self.directory.len(),
        }
    }

    /// Drops every file and returns all blocks to the zero state.
    pub fn reset(&mut self) {
        self.table.clear();
        self.directory.clear();
        info!("reset block table and directory");
    }

    pub fn table(&self) -> &BlockTable {
        &self.table
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> FileSystemManager {
        FileSystemManager::init_filesystem(1000, 100).unwrap()
    }

    #[test]
    fn add_places_files_first_fit() {
        let mut fs = manager();
        let a = fs.add_file("A", 250).unwrap();
        assert_eq!(a, Entry::new("A", 250, 0, 3));
        let b = fs.add_file("B", 150).unwrap();
        assert_eq!(b, Entry::new("B", 150, 3, 2));
        assert_eq!(fs.snapshot_directory(), vec![a, b]);
    }

    #[test]
    fn add_rejects_invalid_input() {
        let mut fs = manager();
        assert!(matches!(fs.add_file("", 10), Err(FsError::InvalidInput(_))));
        assert!(matches!(fs.add_file("a", 0), Err(FsError::InvalidInput(_))));
        assert_eq!(fs, manager());
    }

    #[test]
    fn long_names_are_accepted() {
        let mut fs = manager();
        let long = "n".repeat(256);
        let entry = fs.add_file(&long, 10).unwrap();
        assert_eq!(entry.name, long);
        assert_eq!(fs.directory().find_by_name(&long), Some(0));
    }

    #[test]
    fn full_device_reports_insufficient_space() {
        let mut fs = FileSystemManager::init_filesystem(400, 100).unwrap();
        for name in ["w", "x", "y", "z"] {
            fs.add_file(name, 1).unwrap();
        }
        let before = fs.clone();

        let err = fs.add_file("overflow", 1).unwrap_err();
        assert!(matches!(
            err,
            FsError::InsufficientSpace {
                size: 1,
                blocks_needed: 1,
                largest_free_run: 0
            }
        ));
        assert!(!err.is_contract_violation());
        assert_eq!(fs, before);
    }

    #[test]
    fn add_rejects_duplicate_name() {
        let mut fs = manager();
        fs.add_file("A", 100).unwrap();
        let before = fs.clone();
        assert!(matches!(fs.add_file("A", 50), Err(FsError::FileExists(_))));
        assert_eq!(fs, before);
    }

    #[test]
    fn insufficient_space_leaves_state_untouched() {
        let mut fs = manager();
        fs.add_file("A", 250).unwrap();
        fs.add_file("B", 150).unwrap();
        fs.delete_file("A").unwrap();
        let before = fs.clone();

        let err = fs.add_file("C", 1000).unwrap_err();
        assert!(matches!(
            err,
            FsError::InsufficientSpace {
                size: 1000,
                blocks_needed: 10,
                largest_free_run: 5
            }
        ));
        assert_eq!(fs, before);
    }

    #[test]
    fn delete_missing_file() {
        let mut fs = manager();
        assert!(matches!(fs.delete_file("nope"), Err(FsError::FileNotFound(_))));
    }

    #[test]
    fn add_then_delete_round_trips() {
        let mut fs = manager();
        fs.add_file("keep", 120).unwrap();
        let before = fs.clone();

        fs.add_file("temp", 333).unwrap();
        let removed = fs.delete_file("temp").unwrap();
        assert_eq!(removed, Entry::new("temp", 333, 2, 4));
        assert_eq!(fs, before);
    }

    #[test]
    fn freed_run_is_reused() {
        let mut fs = manager();
        fs.add_file("A", 200).unwrap();
        fs.add_file("B", 200).unwrap();
        fs.add_file("C", 200).unwrap();
        fs.delete_file("B").unwrap();

        // Fits in the hole left by B rather than after C
        let d = fs.add_file("D", 150).unwrap();
        assert_eq!((d.start, d.span), (2, 2));
        let names: Vec<_> = fs.snapshot_directory().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["A", "C", "D"]);
    }

    #[test]
    fn directory_full_rolls_back() {
        let mut table = BlockTable::new(100, 4).unwrap();
        let mut directory = Directory::new(1);
        add_file(&mut table, &mut directory, "a", 10).unwrap();
        let table_before = table.clone();

        assert!(matches!(
            add_file(&mut table, &mut directory, "b", 10),
            Err(FsError::DirectoryFull(1))
        ));
        assert_eq!(table, table_before);
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn delete_of_corrupt_entry_is_a_contract_violation() {
        let mut table = BlockTable::new(100, 4).unwrap();
        let mut directory = Directory::new(4);
        directory.add(Entry::new("bad", 500, 2, 5)).unwrap();

        let err = delete_file(&mut table, &mut directory, "bad").unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn usage_and_reset() {
        let mut fs = manager();
        fs.add_file("A", 250).unwrap();
        fs.add_file("B", 150).unwrap();

        let usage = fs.usage();
        assert_eq!(usage.total_blocks, 10);
        assert_eq!(usage.free_blocks, 5);
        assert_eq!(usage.largest_free_run, 5);
        assert_eq!(usage.used_bytes, 400);
        assert_eq!(usage.fragmented_bytes, 100);
        assert_eq!(usage.files, 2);

        fs.reset();
        assert_eq!(fs, manager());
    }

    #[test]
    fn from_config_validates() {
        let config = FsConfig {
            system_size: 1000,
            block_size: 300,
        };
        assert!(matches!(
            FileSystemManager::from_config(&config),
            Err(FsError::InvalidSize(_))
        ));
        let config = FsConfig {
            system_size: 1000,
            block_size: 100,
        };
        assert_eq!(FileSystemManager::from_config(&config).unwrap().table().len(), 10);
    }
}

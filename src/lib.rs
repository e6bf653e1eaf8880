//! In-memory simulator of contiguous block allocation.
//!
//! A [`BlockTable`] models a device split into equal-size blocks and a
//! [`Directory`] records which contiguous block range holds each named file.
//! Files are placed first-fit by [`add_file`] and reclaimed by [`delete_file`];
//! [`FileSystemManager`] bundles both structures for a single session.

pub mod block_table;
pub mod config;
pub mod directory;
pub mod error;
pub mod fs_ops;
pub mod fs_structs;
pub mod shell;

pub use block_table::BlockTable;
pub use config::FsConfig;
pub use directory::Directory;
pub use error::{FsError, Result};
pub use fs_ops::{add_file, delete_file, FileSystemManager};
pub use fs_structs::{Block, BlockInfo, Entry, Usage};

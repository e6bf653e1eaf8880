// Startup geometry of the simulated device.

use crate::block_table::check_geometry;
use crate::error::Result;
use crate::fs_structs::{DEFAULT_BLOCK_SIZE, DEFAULT_SYSTEM_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct FsConfig {
    pub system_size: usize, // Total bytes of storage
    pub block_size: usize,  // Bytes per block
}

impl Default for FsConfig {
    fn default() -> Self {
        FsConfig {
            system_size: DEFAULT_SYSTEM_SIZE,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl FsConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Overrides with whichever values were given on the command line.
    pub fn with_overrides(mut self, system_size: Option<usize>, block_size: Option<usize>) -> Self {
        if let Some(size) = system_size {
            self.system_size = size;
        }
        if let Some(size) = block_size {
            self.block_size = size;
        }
        self
    }

    /// Every block must be the same size and together fill the device exactly.
    pub fn validate(&self) -> Result<()> {
        check_geometry(self.system_size, self.block_size).map(|_| ())
    }

    pub fn block_count(&self) -> usize {
        self.system_size / self.block_size
    }
}

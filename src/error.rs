use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error(
        "Not enough contiguous space for {size} bytes: need {blocks_needed} blocks, largest free run is {largest_free_run} blocks"
    )]
    InsufficientSpace {
        size: usize,
        blocks_needed: usize,
        largest_free_run: usize,
    },

    #[error("File '{0}' not found")]
    FileNotFound(String),

    #[error("File '{0}' already exists")]
    FileExists(String),

    #[error("Directory full: all {0} entries in use")]
    DirectoryFull(usize),

    #[error("Block range {start}..{end} is outside the table of {len} blocks")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Block {0} is already in use")]
    BlockInUse(usize),

    #[error("Directory index {index} out of range (size {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    /// True for failures that can only come from a broken caller contract
    /// (bad geometry, range math or directory indices), never from user input.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            FsError::InvalidSize(_)
                | FsError::OutOfBounds { .. }
                | FsError::BlockInUse(_)
                | FsError::IndexOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FsError>;

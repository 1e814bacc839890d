//! Error types shared by the index, the miner and the I/O collaborators.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AprioriError>;

/// Coarse classification of an [`AprioriError`], for callers that only care
/// whether to fix their input, attach data, or retry an I/O operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    MissingData,
    Encoding,
    Io,
}

#[derive(Debug, Error)]
pub enum AprioriError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("no transactions attached to the miner; call `set_transactions` first")]
    MissingTransactions,

    #[error("transaction store has no transactions or no items")]
    EmptyInput,

    #[error("token `{0}` is not present in the item index")]
    UnknownToken(String),

    #[error("item id {index} is out of range for an index of {len} items")]
    UnknownIndex { index: usize, len: usize },

    #[error("token `{0}` appears more than once in the item index")]
    DuplicateToken(String),

    #[error("cannot persist an empty item index")]
    EmptyIndex,

    #[error("`{}` does not have the `.{expected}` extension required by the format", .path.display())]
    UnsupportedFormat { path: PathBuf, expected: &'static str },

    #[error("`{}` is not separated by {expected:?}; it looks separated by {found:?}", .path.display())]
    DelimiterMismatch {
        path: PathBuf,
        expected: char,
        found: char,
    },

    #[error("item `{item}` cannot be written unquoted with separator {delimiter:?}")]
    UnwritableItem { item: String, delimiter: char },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl AprioriError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AprioriError::InvalidConfiguration(_) | AprioriError::ConfigParse(_) => {
                ErrorKind::Configuration
            }
            AprioriError::MissingTransactions | AprioriError::EmptyInput => ErrorKind::MissingData,
            AprioriError::UnknownToken(_)
            | AprioriError::UnknownIndex { .. }
            | AprioriError::DuplicateToken(_) => ErrorKind::Encoding,
            AprioriError::EmptyIndex
            | AprioriError::UnsupportedFormat { .. }
            | AprioriError::DelimiterMismatch { .. }
            | AprioriError::UnwritableItem { .. }
            | AprioriError::Io(_)
            | AprioriError::Csv(_) => ErrorKind::Io,
        }
    }
}

//! Reading transactions from delimited text and writing stores and item
//! indexes back to disk.

pub mod ingest;
pub mod persist;

/// On-disk layout of a transaction file: one transaction per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// `.txt` with a single-byte separator, a space by default.
    ///
    /// Only ASCII separators can be expressed; multi-byte or non-ASCII
    /// separator strings are not supported.
    Text { sep: u8 },
    /// `.csv`, comma separated.
    #[default]
    Csv,
    /// `.tsv`, tab separated.
    Tsv,
}

impl Format {
    pub fn text() -> Self {
        Format::Text { sep: b' ' }
    }

    pub fn delimiter(&self) -> u8 {
        match *self {
            Format::Text { sep } => sep,
            Format::Csv => b',',
            Format::Tsv => b'\t',
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Text { .. } => "txt",
            Format::Csv => "csv",
            Format::Tsv => "tsv",
        }
    }
}

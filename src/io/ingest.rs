use std::path::Path;

use tracing::debug;

use crate::{
    error::{AprioriError, Result},
    io::Format,
    transactions::{TransactionStore, DEFAULT_STORE_NAME},
};

// Space is left out: it occurs inside ordinary item names.
const KNOWN_SEPARATORS: [u8; 3] = [b',', b'\t', b';'];

/// Reads one transaction per line from `path`.
///
/// The file extension must match `format`. Every line is exactly one
/// transaction: quotes are ordinary characters. Items are trimmed, empty items
/// and blank lines are dropped. The store is named after the file stem.
pub fn read_transactions(path: impl AsRef<Path>, format: Format) -> Result<TransactionStore> {
    let path = path.as_ref();
    check_extension(path, format)?;

    let delimiter = format.delimiter();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(delimiter)
        .from_path(path)?;

    let mut transactions: Vec<Vec<String>> = Vec::new();
    let mut any_split = false;

    for record in reader.records() {
        let record = record?;
        if record.len() > 1 {
            any_split = true;
        }

        let items: Vec<String> = record
            .iter()
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect();
        if !items.is_empty() {
            transactions.push(items);
        }
    }

    if transactions.is_empty() {
        return Err(AprioriError::EmptyInput);
    }

    if !any_split {
        if let Some(found) = foreign_separator(&transactions, delimiter) {
            return Err(AprioriError::DelimiterMismatch {
                path: path.to_path_buf(),
                expected: delimiter as char,
                found: found as char,
            });
        }
    }

    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(DEFAULT_STORE_NAME);

    debug!(
        path = %path.display(),
        transactions = transactions.len(),
        "read transactions"
    );

    Ok(TransactionStore::named(name, transactions))
}

fn check_extension(path: &Path, format: Format) -> Result<()> {
    let expected = format.extension();
    if path.extension().and_then(|ext| ext.to_str()) == Some(expected) {
        Ok(())
    } else {
        Err(AprioriError::UnsupportedFormat {
            path: path.to_path_buf(),
            expected,
        })
    }
}

/// A separator other than `delimiter` found in every line, when no line split
/// on `delimiter`. Single-column files whose items merely contain spaces are
/// accepted.
fn foreign_separator(transactions: &[Vec<String>], delimiter: u8) -> Option<u8> {
    KNOWN_SEPARATORS
        .iter()
        .copied()
        .filter(|&sep| sep != delimiter)
        .find(|&sep| {
            transactions
                .iter()
                .all(|items| items.iter().any(|item| item.as_bytes().contains(&sep)))
        })
}

use std::fmt::{self, Display, Formatter};

use crate::types::Token;

pub const DEFAULT_STORE_NAME: &str = "transactions";

/// Ordered collection of raw transactions.
///
/// Each transaction keeps its tokens in the order they were given, duplicates
/// included; collapsing happens when the store is encoded against an
/// [`ItemIndex`](crate::index::ItemIndex). The store is immutable once built, so
/// `len()` is a stable denominator for relative support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionStore<T = String> {
    name: String,
    transactions: Vec<Vec<T>>,
}

impl<T: Token> TransactionStore<T> {
    pub fn new(transactions: Vec<Vec<T>>) -> Self {
        Self::named(DEFAULT_STORE_NAME, transactions)
    }

    pub fn named(name: impl Into<String>, transactions: Vec<Vec<T>>) -> Self {
        Self {
            name: name.into(),
            transactions,
        }
    }

    /// Row-as-transaction table: every row is one transaction and every present
    /// cell one item. Missing cells are skipped.
    pub fn from_rows<R>(name: impl Into<String>, rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = Option<T>>,
    {
        let transactions = rows
            .into_iter()
            .map(|row| row.into_iter().flatten().collect())
            .collect();
        Self::named(name, transactions)
    }

    /// Cell-as-transaction table: every non-empty cell holds a whole
    /// transaction. Cells are taken row by row, left to right.
    pub fn from_cells<R>(name: impl Into<String>, rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = Vec<T>>,
    {
        let transactions = rows
            .into_iter()
            .flat_map(|row| row.into_iter().filter(|cell| !cell.is_empty()))
            .collect();
        Self::named(name, transactions)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&[T]> {
        self.transactions.get(position).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[T]> {
        self.transactions.iter().map(Vec::as_slice)
    }

    pub fn transactions(&self) -> &[Vec<T>] {
        &self.transactions
    }
}

impl<T: Token> FromIterator<Vec<T>> for TransactionStore<T> {
    fn from_iter<I: IntoIterator<Item = Vec<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> Display for TransactionStore<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction set `{}`: {} transactions",
            self.name,
            self.transactions.len()
        )
    }
}

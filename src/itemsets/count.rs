use rayon::prelude::*;
use serde::Deserialize;
use tracing::debug;

use crate::{
    combi::is_subset,
    index::{EncodedStore, Tidset},
    types::{ItemId, Itemset, SupportCount, Transaction},
};

/// How candidate supports are counted. Both give identical counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountingStrategy {
    /// Subset test of every candidate against every transaction, with
    /// transactions split across the rayon pool.
    #[default]
    Scan,
    /// Intersect per-item transaction bitsets.
    Tidset,
}

/// Per-item support counts, indexed by item id.
pub fn count_items(transactions: &[Transaction], num_items: usize) -> Vec<SupportCount> {
    transactions
        .par_iter()
        .fold(
            || vec![0; num_items],
            |mut counts, transaction| {
                for &item in transaction {
                    counts[item] += 1;
                }
                counts
            },
        )
        .reduce(|| vec![0; num_items], merge_counts)
}

/// Support count of every candidate, in candidate order.
///
/// Transactions are partitioned and each partition counted into its own
/// vector; partial counts are summed at the end.
pub fn count_candidates_scan(
    candidates: &[Itemset],
    transactions: &[Transaction],
) -> Vec<SupportCount> {
    let size = match candidates.first() {
        Some(candidate) => candidate.len(),
        None => return vec![],
    };

    transactions
        .par_iter()
        .filter(|transaction| transaction.len() >= size)
        .fold(
            || vec![0; candidates.len()],
            |mut counts, transaction| {
                for (count, candidate) in counts.iter_mut().zip(candidates) {
                    if is_subset(candidate, transaction) {
                        *count += 1;
                    }
                }
                counts
            },
        )
        .reduce(|| vec![0; candidates.len()], merge_counts)
}

/// Support count of every candidate from the inverted index.
pub fn count_candidates_tidset(
    candidates: &[Itemset],
    tidsets: &[Tidset],
    num_transactions: usize,
) -> Vec<SupportCount> {
    candidates
        .par_iter()
        .map(|candidate| tidset_support(candidate, tidsets, num_transactions))
        .collect()
}

fn tidset_support(candidate: &[ItemId], tidsets: &[Tidset], num_transactions: usize) -> SupportCount {
    let (&first, rest) = match candidate.split_first() {
        Some(split) => split,
        None => return num_transactions as SupportCount,
    };

    let mut holders = tidsets[first].clone();
    for &item in rest {
        for (dst, src) in holders
            .as_raw_mut_slice()
            .iter_mut()
            .zip(tidsets[item].as_raw_slice())
        {
            *dst &= *src;
        }
    }
    holders.count_ones() as SupportCount
}

fn merge_counts(mut a: Vec<SupportCount>, b: Vec<SupportCount>) -> Vec<SupportCount> {
    for (x, y) in a.iter_mut().zip(b) {
        *x += y;
    }
    a
}

/// Counting state owned by one mining run.
#[derive(Debug, Clone)]
pub enum SupportCounter {
    Scan {
        transactions: Vec<Transaction>,
    },
    Tidset {
        tidsets: Vec<Tidset>,
        num_transactions: usize,
    },
}

impl SupportCounter {
    pub fn new(strategy: CountingStrategy, store: &EncodedStore) -> Self {
        match strategy {
            CountingStrategy::Scan => SupportCounter::Scan {
                transactions: store.transactions().to_vec(),
            },
            CountingStrategy::Tidset => SupportCounter::Tidset {
                tidsets: store.tidsets(),
                num_transactions: store.len(),
            },
        }
    }

    /// Drops items that are not frequent and transactions shorter than
    /// `next_size`. Counts of candidates built from frequent items are
    /// unaffected.
    pub fn shrink(&mut self, frequent_items: &[bool], next_size: usize) {
        if let SupportCounter::Scan { transactions } = self {
            let before = transactions.len();
            for transaction in transactions.iter_mut() {
                transaction.retain(|&item| frequent_items.get(item).copied().unwrap_or(false));
            }
            transactions.retain(|transaction| transaction.len() >= next_size);
            debug!(
                before,
                after = transactions.len(),
                "shrunk transactions for next level"
            );
        }
    }

    pub fn count(&self, candidates: &[Itemset]) -> Vec<SupportCount> {
        match self {
            SupportCounter::Scan { transactions } => count_candidates_scan(candidates, transactions),
            SupportCounter::Tidset {
                tidsets,
                num_transactions,
            } => count_candidates_tidset(candidates, tidsets, *num_transactions),
        }
    }
}

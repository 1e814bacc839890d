use crate::types::{FrequentItemsets, ItemId, Itemset, ItemsetLength, SupportCount};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrequentPattern {
    pub itemset: Itemset,
    pub support_count: SupportCount,
}

impl FrequentPattern {
    pub fn new(itemset: Itemset, support_count: SupportCount) -> Self {
        Self {
            itemset,
            support_count,
        }
    }
}

/// Frequent patterns per level, from 1 up to the last non-empty level.
///
/// Each level is sorted by itemset, so level 1 lists items in id
/// (first-occurrence) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    levels: Vec<Vec<FrequentPattern>>,
    num_transactions: usize,
}

impl Lattice {
    pub(crate) fn new(num_transactions: usize) -> Self {
        Self {
            levels: vec![],
            num_transactions,
        }
    }

    pub(crate) fn push_level(&mut self, patterns: Vec<FrequentPattern>) {
        debug_assert!(patterns
            .windows(2)
            .all(|pair| pair[0].itemset < pair[1].itemset));
        self.levels.push(patterns);
    }

    pub fn num_transactions(&self) -> usize {
        self.num_transactions
    }

    /// Largest k with frequent k-itemsets, 0 when nothing is frequent.
    pub fn max_level(&self) -> ItemsetLength {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Total number of frequent patterns over all levels.
    pub fn len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Frequent k-itemsets; empty for levels past the last one (and for 0).
    pub fn level(&self, k: ItemsetLength) -> &[FrequentPattern] {
        k.checked_sub(1)
            .and_then(|position| self.levels.get(position))
            .map_or(&[][..], Vec::as_slice)
    }

    pub fn levels(&self) -> impl Iterator<Item = (ItemsetLength, &[FrequentPattern])> {
        self.levels
            .iter()
            .enumerate()
            .map(|(position, patterns)| (position + 1, patterns.as_slice()))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &FrequentPattern> {
        self.levels.iter().flatten()
    }

    /// Support count of `itemset` if it is frequent. `itemset` must be sorted.
    pub fn support_count(&self, itemset: &[ItemId]) -> Option<SupportCount> {
        let level = self.level(itemset.len());
        level
            .binary_search_by(|pattern| pattern.itemset.as_slice().cmp(itemset))
            .ok()
            .map(|position| level[position].support_count)
    }

    pub fn relative_support(&self, itemset: &[ItemId]) -> Option<f64> {
        if self.num_transactions == 0 {
            return None;
        }
        self.support_count(itemset)
            .map(|count| count as f64 / self.num_transactions as f64)
    }

    pub fn contains(&self, itemset: &[ItemId]) -> bool {
        self.support_count(itemset).is_some()
    }

    pub fn to_itemset_counts(&self) -> FrequentItemsets {
        self.levels()
            .map(|(k, patterns)| {
                let counts = patterns
                    .iter()
                    .map(|pattern| (pattern.itemset.clone(), pattern.support_count))
                    .collect();
                (k, counts)
            })
            .collect()
    }
}

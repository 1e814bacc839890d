use tracing::{debug, info};

use crate::{
    combi::generate_candidates,
    index::EncodedStore,
    itemsets::{
        count::{count_items, CountingStrategy, SupportCounter},
        lattice::{FrequentPattern, Lattice},
    },
    support::SupportThreshold,
    types::{ItemsetLength, SupportCount},
};

/// Level-wise search over an encoded store.
///
/// Stops after the first level that generates no candidate or keeps no
/// frequent itemset, or after `max_len` when given.
pub fn generate_frequent_itemsets(
    store: &EncodedStore,
    threshold: SupportThreshold,
    strategy: CountingStrategy,
    max_len: Option<ItemsetLength>,
) -> Lattice {
    let num_transactions = store.len();
    let mut lattice = Lattice::new(num_transactions);

    if num_transactions == 0 || max_len == Some(0) {
        return lattice;
    }

    let min_count = threshold.min_support_count(num_transactions);

    // 1-itemset
    let item_counts = count_items(store.transactions(), store.num_items());
    let frequent_1 = generate_frequent_1_itemsets(&item_counts, min_count);
    debug!(
        level = 1,
        candidates = item_counts.iter().filter(|&&count| count > 0).count(),
        frequent = frequent_1.len(),
        "counted level"
    );
    if frequent_1.is_empty() {
        info!(levels = 0, patterns = 0, "search complete");
        return lattice;
    }

    let mut counter = SupportCounter::new(strategy, store);
    let mut frequent_items = vec![false; store.num_items()];
    mark_items(&frequent_1, &mut frequent_items);
    counter.shrink(&frequent_items, 2);

    let mut prev: Vec<FrequentPattern> = frequent_1;

    // k-itemset, k >= 2
    let mut size = 2;
    while max_len.map_or(true, |max_len| size <= max_len) {
        let prev_itemsets: Vec<_> = prev.iter().map(|pattern| pattern.itemset.clone()).collect();
        lattice.push_level(prev);

        let candidates = generate_candidates(&prev_itemsets);
        if candidates.is_empty() {
            debug!(level = size, "no candidates generated");
            prev = vec![];
            break;
        }

        let num_candidates = candidates.len();
        let counts = counter.count(&candidates);
        let frequent: Vec<FrequentPattern> = candidates
            .into_iter()
            .zip(counts)
            .filter(|&(_, count)| count >= min_count)
            .map(|(itemset, count)| FrequentPattern::new(itemset, count))
            .collect();
        debug!(
            level = size,
            candidates = num_candidates,
            frequent = frequent.len(),
            "counted level"
        );

        if frequent.is_empty() {
            prev = vec![];
            break;
        }

        frequent_items.iter_mut().for_each(|flag| *flag = false);
        mark_items(&frequent, &mut frequent_items);
        counter.shrink(&frequent_items, size + 1);

        prev = frequent;
        size += 1;
    }

    // loop left through `max_len` with the last level still pending
    if !prev.is_empty() {
        lattice.push_level(prev);
    }

    info!(
        levels = lattice.max_level(),
        patterns = lattice.len(),
        "search complete"
    );

    lattice
}

fn generate_frequent_1_itemsets(
    item_counts: &[SupportCount],
    min_count: SupportCount,
) -> Vec<FrequentPattern> {
    item_counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0 && count >= min_count)
        .map(|(item, &count)| FrequentPattern::new(vec![item], count))
        .collect()
}

fn mark_items(patterns: &[FrequentPattern], flags: &mut [bool]) {
    for pattern in patterns {
        for &item in &pattern.itemset {
            flags[item] = true;
        }
    }
}

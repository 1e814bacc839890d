use std::{cmp::Ordering, collections::HashSet};

use itertools::Itertools;

use crate::types::{ItemId, Itemset};

/// Joins frequent k-itemsets sharing their first k-1 items into (k+1)-itemset
/// candidates. Output is sorted, each candidate sorted.
///
/// https://github.com/tommyod/Efficient-Apriori/blob/master/efficient_apriori/itemsets.py
pub fn join_step(mut itemsets: Vec<Itemset>) -> Vec<Itemset> {
    itemsets.retain(|itemset| !itemset.is_empty());
    if itemsets.is_empty() {
        return vec![];
    }

    itemsets.sort_unstable();
    itemsets.dedup();

    let mut final_itemsets: Vec<Itemset> = Vec::with_capacity(itemsets.len());
    let mut tail_items: Vec<ItemId> = Vec::with_capacity(itemsets.len());

    let mut i = 0;
    while i < itemsets.len() {
        let prefix = &itemsets[i][..itemsets[i].len() - 1];

        tail_items.clear();
        let mut j = i;
        while j < itemsets.len() {
            let (last, rest) = match itemsets[j].split_last() {
                Some(split) => split,
                None => break,
            };
            if rest != prefix {
                break;
            }
            tail_items.push(*last);
            j += 1;
        }

        for (&a, &b) in tail_items.iter().tuple_combinations() {
            let mut candidate = Vec::with_capacity(prefix.len() + 2);
            candidate.extend_from_slice(prefix);
            candidate.push(a);
            candidate.push(b);
            final_itemsets.push(candidate);
        }

        i = j;
    }

    final_itemsets
}

/// Whether some k-subset of a (k+1)-`candidate` is missing from `frequent`.
///
/// Dropping either of the last two items gives back the pair the candidate was
/// joined from, so only the other positions are looked up.
pub fn has_infrequent_subset(candidate: &[ItemId], frequent: &HashSet<Itemset>) -> bool {
    if candidate.len() < 3 {
        return false;
    }

    let mut subset: Itemset = Vec::with_capacity(candidate.len() - 1);
    (0..candidate.len() - 2).any(|skip| {
        subset.clear();
        subset.extend(
            candidate
                .iter()
                .enumerate()
                .filter(|&(position, _)| position != skip)
                .map(|(_, &item)| item),
        );
        !frequent.contains(&subset)
    })
}

/// Downward-closure prune over freshly joined candidates.
pub fn prune_step(candidates: Vec<Itemset>, frequent: &HashSet<Itemset>) -> Vec<Itemset> {
    candidates
        .into_iter()
        .filter(|candidate| !has_infrequent_subset(candidate, frequent))
        .collect()
}

/// Candidates of size k+1 from the frequent itemsets of size k.
pub fn generate_candidates(frequent: &[Itemset]) -> Vec<Itemset> {
    let lookup: HashSet<Itemset> = frequent.iter().cloned().collect();
    prune_step(join_step(frequent.to_vec()), &lookup)
}

/// Linear merge over two sorted sequences.
pub fn is_subset(itemset: &[ItemId], transaction: &[ItemId]) -> bool {
    if itemset.len() > transaction.len() {
        return false;
    }

    let mut items = transaction.iter();
    'outer: for needle in itemset {
        for item in items.by_ref() {
            match item.cmp(needle) {
                Ordering::Less => continue,
                Ordering::Equal => continue 'outer,
                Ordering::Greater => return false,
            }
        }
        return false;
    }
    true
}

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::Hash;

/// Raw item identifier as it appears in the source data.
pub trait Token: Clone + Eq + Hash + Display {}

impl<T: Clone + Eq + Hash + Display> Token for T {}

pub type ItemId = usize;
/// Sorted, duplicate-free sequence of item ids.
pub type Itemset = Vec<ItemId>;

/// Encoded transaction. Sorted and deduplicated like an [`Itemset`].
pub type Transaction = Vec<ItemId>;

pub type SupportCount = u32;
pub type ItemsetCounts = HashMap<Itemset, SupportCount>;

pub type ItemsetLength = usize;
pub type FrequentItemsets = BTreeMap<ItemsetLength, ItemsetCounts>;

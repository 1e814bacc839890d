use std::collections::HashMap;

use bitvec::prelude::*;
use tracing::debug;

use crate::{
    error::{AprioriError, Result},
    transactions::TransactionStore,
    types::{ItemId, Token, Transaction},
};

const APPROX_NUM_UNIQUE_ITEMS: usize = 1024; // arbitrary

/// Transaction ids containing an item, one bit per transaction.
pub type Tidset = BitVec<usize, Lsb0>;

/// Bijection between raw tokens and dense ids in `[0, len)`.
///
/// Ids follow first-occurrence order over the store the index was built
/// from. The index is frozen after construction.
#[derive(Debug, Clone)]
pub struct ItemIndex<T = String> {
    reverse_lookup: HashMap<T, ItemId>,
    inventory: Vec<T>,
}

impl<T: Token> ItemIndex<T> {
    /// Single pass over the store, transactions in order and items in
    /// encounter order.
    pub fn build(store: &TransactionStore<T>) -> Result<Self> {
        if store.is_empty() {
            return Err(AprioriError::EmptyInput);
        }

        let mut reverse_lookup = HashMap::with_capacity(APPROX_NUM_UNIQUE_ITEMS);
        let mut inventory = Vec::with_capacity(APPROX_NUM_UNIQUE_ITEMS);

        for transaction in store.iter() {
            for item in transaction {
                if !reverse_lookup.contains_key(item) {
                    reverse_lookup.insert(item.clone(), inventory.len());
                    inventory.push(item.clone());
                }
            }
        }

        if inventory.is_empty() {
            return Err(AprioriError::EmptyInput);
        }

        debug!(
            store = store.name(),
            items = inventory.len(),
            "built item index"
        );

        Ok(Self {
            reverse_lookup,
            inventory,
        })
    }

    /// Index over an explicit id-ordered token list, e.g. a dictionary that
    /// was persisted alongside a different store.
    pub fn from_tokens(tokens: Vec<T>) -> Result<Self> {
        if tokens.is_empty() {
            return Err(AprioriError::EmptyInput);
        }

        let mut reverse_lookup = HashMap::with_capacity(tokens.len());
        for (id, token) in tokens.iter().enumerate() {
            if reverse_lookup.insert(token.clone(), id).is_some() {
                return Err(AprioriError::DuplicateToken(token.to_string()));
            }
        }

        Ok(Self {
            reverse_lookup,
            inventory: tokens,
        })
    }

    pub fn len(&self) -> usize {
        self.inventory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inventory.is_empty()
    }

    pub fn id_of(&self, token: &T) -> Option<ItemId> {
        self.reverse_lookup.get(token).copied()
    }

    pub fn token_of(&self, id: ItemId) -> Option<&T> {
        self.inventory.get(id)
    }

    /// `(id, token)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &T)> {
        self.inventory.iter().enumerate()
    }

    /// Maps every transaction through the index. Duplicate tokens inside a
    /// transaction collapse and each encoded transaction comes out sorted.
    pub fn encode(&self, store: &TransactionStore<T>) -> Result<EncodedStore> {
        let transactions = store
            .iter()
            .map(|raw_transaction| {
                let mut items = raw_transaction
                    .iter()
                    .map(|item| {
                        self.id_of(item)
                            .ok_or_else(|| AprioriError::UnknownToken(item.to_string()))
                    })
                    .collect::<Result<Transaction>>()?;
                items.sort_unstable();
                items.dedup();
                Ok(items)
            })
            .collect::<Result<Vec<Transaction>>>()?;

        Ok(EncodedStore {
            transactions,
            num_items: self.len(),
        })
    }

    /// Tokens for `itemset`, in the itemset's order.
    pub fn decode(&self, itemset: &[ItemId]) -> Result<Vec<T>> {
        itemset
            .iter()
            .map(|&id| {
                self.token_of(id)
                    .cloned()
                    .ok_or(AprioriError::UnknownIndex {
                        index: id,
                        len: self.len(),
                    })
            })
            .collect()
    }
}

impl<T: Token> PartialEq for ItemIndex<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inventory == other.inventory
    }
}

impl<T: Token> Eq for ItemIndex<T> {}

/// Transaction store in id space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStore {
    transactions: Vec<Transaction>,
    num_items: usize,
}

impl EncodedStore {
    /// Wraps already-encoded transactions, normalising each to a sorted set.
    /// Ids must be below `num_items`.
    pub fn new(mut transactions: Vec<Transaction>, num_items: usize) -> Result<Self> {
        for transaction in transactions.iter_mut() {
            transaction.sort_unstable();
            transaction.dedup();
            if let Some(&id) = transaction.last() {
                if id >= num_items {
                    return Err(AprioriError::UnknownIndex {
                        index: id,
                        len: num_items,
                    });
                }
            }
        }
        Ok(Self {
            transactions,
            num_items,
        })
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Size of the id space, not the number of ids actually present.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Inverted index: for each item id, the set of transactions holding it.
    pub fn tidsets(&self) -> Vec<Tidset> {
        let mut tidsets = vec![Tidset::repeat(false, self.len()); self.num_items];
        for (tid, transaction) in self.transactions.iter().enumerate() {
            for &item in transaction {
                tidsets[item].set(tid, true);
            }
        }
        tidsets
    }
}

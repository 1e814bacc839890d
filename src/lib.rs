//! Frequent-itemset mining with the Apriori algorithm.
//!
//! Transactions are encoded once into dense item ids ([`ItemIndex`]), then
//! searched level by level: join frequent k-itemsets into (k+1)-candidates,
//! prune candidates with an infrequent subset, count the survivors and keep
//! those meeting the support threshold.
//!
//! ```
//! use apriori_miner::{AprioriMiner, TransactionStore};
//!
//! let store = TransactionStore::new(vec![
//!     vec!["a".to_string(), "b".to_string(), "c".to_string()],
//!     vec!["a".to_string(), "b".to_string()],
//!     vec!["a".to_string(), "c".to_string()],
//!     vec!["a".to_string()],
//! ]);
//!
//! let miner = AprioriMiner::new(Some(store), None, Some(2))?;
//! let result = miner.mine()?;
//!
//! assert_eq!(result.lattice().max_level(), 2);
//! assert_eq!(result.support_of(&["a".to_string(), "b".to_string()]), Some(2));
//! # Ok::<(), apriori_miner::AprioriError>(())
//! ```

pub mod apriori;
pub mod combi;
pub mod config;
pub mod error;
pub mod index;
pub mod io;
pub mod itemsets;
pub mod support;
pub mod transactions;
pub mod types;

pub use apriori::{mine, AprioriMiner, DecodedItemsets, MiningResult};
pub use config::{MinerConfig, SupportConfig};
pub use error::{AprioriError, ErrorKind, Result};
pub use index::{EncodedStore, ItemIndex};
pub use itemsets::{
    count::CountingStrategy,
    lattice::{FrequentPattern, Lattice},
};
pub use support::SupportThreshold;
pub use transactions::TransactionStore;

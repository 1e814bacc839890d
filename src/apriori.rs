use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::{
    config::MinerConfig,
    error::{AprioriError, Result},
    index::ItemIndex,
    itemsets::{count::CountingStrategy, lattice::Lattice, search::generate_frequent_itemsets},
    support::SupportThreshold,
    transactions::TransactionStore,
    types::{ItemsetLength, SupportCount, Token},
};

/// Decoded lattice: level -> (tokens, support count).
pub type DecodedItemsets<T> = BTreeMap<ItemsetLength, Vec<(Vec<T>, SupportCount)>>;

/// Apriori miner for frequent itemsets.
///
/// Holds the support threshold and, once attached, the transactions to mine.
/// Nothing of a run is cached on the miner.
#[derive(Debug, Clone)]
pub struct AprioriMiner<T = String> {
    threshold: SupportThreshold,
    transactions: Option<TransactionStore<T>>,
    counting: CountingStrategy,
    max_len: Option<ItemsetLength>,
}

impl<T: Token> AprioriMiner<T> {
    /// Exactly one of `relative_support` / `absolute_support` must be given.
    /// With a store attached, `absolute_support` may not exceed its size.
    pub fn new(
        transactions: Option<TransactionStore<T>>,
        relative_support: Option<f64>,
        absolute_support: Option<usize>,
    ) -> Result<Self> {
        let threshold = SupportThreshold::from_options(absolute_support, relative_support)?;
        Self::with_threshold(threshold, transactions)
    }

    pub fn with_threshold(
        threshold: SupportThreshold,
        transactions: Option<TransactionStore<T>>,
    ) -> Result<Self> {
        match &transactions {
            Some(store) => threshold.validate_for(store.len())?,
            None => debug!("miner created without transactions; attach them before mining"),
        }

        Ok(Self {
            threshold,
            transactions,
            counting: CountingStrategy::default(),
            max_len: None,
        })
    }

    pub fn from_config(config: &MinerConfig, transactions: Option<TransactionStore<T>>) -> Result<Self> {
        config.validate()?;
        let miner = Self::with_threshold(config.support.resolve()?, transactions)?
            .counting_strategy(config.counting);
        Ok(Self {
            max_len: config.max_len,
            ..miner
        })
    }

    pub fn counting_strategy(mut self, counting: CountingStrategy) -> Self {
        self.counting = counting;
        self
    }

    pub fn max_len(mut self, max_len: ItemsetLength) -> Result<Self> {
        if max_len == 0 {
            return Err(AprioriError::InvalidConfiguration(
                "`max_len` must be at least 1".into(),
            ));
        }
        self.max_len = Some(max_len);
        Ok(self)
    }

    /// Attaches `transactions`, replacing any store already attached. On error
    /// the miner keeps its previous store.
    pub fn set_transactions(&mut self, transactions: TransactionStore<T>) -> Result<()> {
        self.threshold.validate_for(transactions.len())?;
        self.transactions = Some(transactions);
        Ok(())
    }

    pub fn transactions(&self) -> Option<&TransactionStore<T>> {
        self.transactions.as_ref()
    }

    pub fn threshold(&self) -> SupportThreshold {
        self.threshold
    }

    /// Absolute threshold, when that was the unit supplied.
    pub fn absolute_support(&self) -> Option<usize> {
        match self.threshold {
            SupportThreshold::Absolute(min_count) => Some(min_count),
            SupportThreshold::Relative(_) => None,
        }
    }

    /// Relative threshold; derived from the attached store for an absolute one.
    pub fn relative_support(&self) -> Option<f64> {
        match (self.threshold, &self.transactions) {
            (SupportThreshold::Relative(min_support), _) => Some(min_support),
            (SupportThreshold::Absolute(_), Some(store)) if !store.is_empty() => {
                Some(self.threshold.relative_to(store.len()))
            }
            (SupportThreshold::Absolute(_), _) => None,
        }
    }

    /// Builds the item index from the attached store and mines it.
    pub fn mine(&self) -> Result<MiningResult<T>> {
        let store = self
            .transactions
            .as_ref()
            .ok_or(AprioriError::MissingTransactions)?;
        let index = ItemIndex::build(store)?;
        let lattice = self.mine_with_index(&index)?;
        Ok(MiningResult { index, lattice })
    }

    /// Mines the attached store encoded against an index supplied by the
    /// caller.
    pub fn mine_with_index(&self, index: &ItemIndex<T>) -> Result<Lattice> {
        let store = self
            .transactions
            .as_ref()
            .ok_or(AprioriError::MissingTransactions)?;
        if store.is_empty() {
            return Err(AprioriError::EmptyInput);
        }
        self.threshold.validate_for(store.len())?;

        let encoded = index.encode(store)?;
        info!(
            store = store.name(),
            transactions = encoded.len(),
            items = index.len(),
            threshold = %self.threshold,
            "mining frequent itemsets"
        );

        Ok(generate_frequent_itemsets(
            &encoded,
            self.threshold,
            self.counting,
            self.max_len,
        ))
    }
}

/// Mines `store` with default settings.
pub fn mine<T: Token>(
    store: &TransactionStore<T>,
    threshold: SupportThreshold,
) -> Result<MiningResult<T>> {
    AprioriMiner::with_threshold(threshold, Some(store.clone()))?.mine()
}

/// Lattice of a run together with the index its ids refer to.
#[derive(Debug, Clone)]
pub struct MiningResult<T = String> {
    index: ItemIndex<T>,
    lattice: Lattice,
}

impl<T: Token> MiningResult<T> {
    pub fn index(&self) -> &ItemIndex<T> {
        &self.index
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn into_parts(self) -> (ItemIndex<T>, Lattice) {
        (self.index, self.lattice)
    }

    pub fn decoded(&self) -> Result<DecodedItemsets<T>> {
        self.lattice
            .levels()
            .map(|(k, patterns)| {
                let decoded = patterns
                    .iter()
                    .map(|pattern| Ok((self.index.decode(&pattern.itemset)?, pattern.support_count)))
                    .collect::<Result<Vec<_>>>()?;
                Ok((k, decoded))
            })
            .collect()
    }

    /// Support count of a set of tokens, if frequent.
    pub fn support_of(&self, tokens: &[T]) -> Option<SupportCount> {
        let mut itemset = tokens
            .iter()
            .map(|token| self.index.id_of(token))
            .collect::<Option<Vec<_>>>()?;
        itemset.sort_unstable();
        itemset.dedup();
        self.lattice.support_count(&itemset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use maplit::btreemap;

    macro_rules! str_vec {
        ($($x:expr),*) => {
            {
                let mut vec: Vec<String> = vec![];
                $(vec.push($x.into());)*
                vec
            }
        };
    }

    fn abc() -> TransactionStore {
        TransactionStore::new(vec![
            str_vec!["a", "b", "c"],
            str_vec!["a", "b"],
            str_vec!["a", "c"],
            str_vec!["a"],
        ])
    }

    #[test]
    fn mines_with_absolute_support() {
        let miner = AprioriMiner::new(Some(abc()), None, Some(2)).unwrap();
        let result = miner.mine().unwrap();

        let expected = btreemap! {
            1 => vec![
                (str_vec!["a"], 4),
                (str_vec!["b"], 2),
                (str_vec!["c"], 2),
            ],
            2 => vec![
                (str_vec!["a", "b"], 2),
                (str_vec!["a", "c"], 2),
            ],
        };
        assert_eq!(result.decoded().unwrap(), expected);
        assert_eq!(result.support_of(&str_vec!["a", "b", "c"]), None);
        assert_eq!(result.support_of(&str_vec!["c", "a"]), Some(2));
        assert_eq!(miner.relative_support(), Some(0.5));
    }

    #[test]
    fn mines_single_transaction_with_relative_support() {
        let store = TransactionStore::new(vec![str_vec!["x"]]);
        let miner = AprioriMiner::new(Some(store), Some(0.5), None).unwrap();
        let result = miner.mine().unwrap();

        assert_eq!(
            result.decoded().unwrap(),
            btreemap! { 1 => vec![(str_vec!["x"], 1)] }
        );
        assert_eq!(miner.absolute_support(), None);
    }

    #[test]
    fn both_units_fail_before_touching_store() {
        let err = AprioriMiner::<String>::new(None, Some(0.5), Some(2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = AprioriMiner::<String>::new(None, None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn absolute_support_bounded_by_store() {
        let err = AprioriMiner::new(Some(abc()), None, Some(5)).unwrap_err();
        assert!(matches!(err, AprioriError::InvalidConfiguration(_)));

        let err = AprioriMiner::new(Some(abc()), None, Some(0)).unwrap_err();
        assert!(matches!(err, AprioriError::InvalidConfiguration(_)));
    }

    #[test]
    fn store_can_be_attached_later() {
        let mut miner = AprioriMiner::<String>::new(None, Some(0.5), None).unwrap();
        assert!(matches!(miner.mine(), Err(AprioriError::MissingTransactions)));

        miner.set_transactions(abc()).unwrap();
        assert_eq!(miner.mine().unwrap().lattice().max_level(), 2);
    }

    #[test]
    fn rejected_store_keeps_previous_one() {
        let mut miner = AprioriMiner::new(Some(abc()), None, Some(3)).unwrap();
        let small = TransactionStore::new(vec![str_vec!["a"]]);

        assert!(miner.set_transactions(small).is_err());
        assert_eq!(miner.transactions().map(|store| store.len()), Some(4));
    }

    #[test]
    fn empty_store_is_empty_input() {
        let miner = AprioriMiner::new(Some(TransactionStore::<String>::new(vec![])), Some(0.5), None).unwrap();
        assert!(matches!(miner.mine(), Err(AprioriError::EmptyInput)));
    }

    #[test]
    fn foreign_index_is_an_encoding_error() {
        let miner = AprioriMiner::new(Some(abc()), Some(0.5), None).unwrap();
        let index = ItemIndex::from_tokens(str_vec!["a", "b"]).unwrap();

        let err = miner.mine_with_index(&index).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn wider_index_leaves_unused_ids_out() {
        let miner = AprioriMiner::new(Some(abc()), Some(0.5), None).unwrap();
        let index = ItemIndex::from_tokens(str_vec!["z", "c", "b", "a"]).unwrap();

        let lattice = miner.mine_with_index(&index).unwrap();
        let level_1: Vec<_> = lattice.level(1).iter().map(|p| p.itemset.clone()).collect();
        assert_eq!(level_1, vec![vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn from_config_applies_settings() {
        let config =
            MinerConfig::from_toml_str("max_len = 1\ncounting = \"tidset\"\n[support]\nabsolute = 2\n")
                .unwrap();
        let miner = AprioriMiner::from_config(&config, Some(abc())).unwrap();

        let result = miner.mine().unwrap();
        assert_eq!(result.lattice().max_level(), 1);
        assert_eq!(result.lattice().len(), 3);
    }

    #[test]
    fn max_len_must_be_positive() {
        let miner = AprioriMiner::new(Some(abc()), Some(0.5), None).unwrap();
        assert!(miner.clone().max_len(0).is_err());
        let miner = miner.max_len(1).unwrap();
        assert_eq!(miner.mine().unwrap().lattice().max_level(), 1);
    }

    #[test]
    fn free_function_matches_miner() {
        let result = mine(&abc(), SupportThreshold::Absolute(2)).unwrap();
        assert_eq!(result.lattice().len(), 5);
    }
}

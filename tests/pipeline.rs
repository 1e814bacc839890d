use std::fs;

use apriori_miner::{
    io::{
        ingest::read_transactions,
        persist::{read_item_index, write_item_index, write_transactions},
        Format,
    },
    AprioriError, AprioriMiner, ErrorKind, ItemIndex, MinerConfig, TransactionStore,
};
use maplit::btreemap;
use tempfile::TempDir;

#[test]
fn file_to_lattice_to_disk() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("basket.csv");
    fs::write(&input, "a,b,c\na,b\na,c\na\n").unwrap();

    let store = read_transactions(&input, Format::Csv).unwrap();
    let config = MinerConfig::from_toml_str("[support]\nabsolute = 2\n").unwrap();
    let miner = AprioriMiner::from_config(&config, Some(store.clone())).unwrap();
    let result = miner.mine().unwrap();

    let s = |x: &str| x.to_string();
    assert_eq!(
        result.decoded().unwrap(),
        btreemap! {
            1 => vec![(vec![s("a")], 4), (vec![s("b")], 2), (vec![s("c")], 2)],
            2 => vec![(vec![s("a"), s("b")], 2), (vec![s("a"), s("c")], 2)],
        }
    );

    let out = dir.path().join("out");
    let (idx2item, _) = write_item_index(&out, store.name(), result.index()).unwrap();
    assert_eq!(&read_item_index(&idx2item).unwrap(), result.index());

    let written = write_transactions(&out, &store, Format::Tsv).unwrap();
    let reread = read_transactions(&written, Format::Tsv).unwrap();
    assert_eq!(reread.transactions(), store.transactions());
}

#[test]
fn persisted_index_encodes_a_new_store() {
    let dir = TempDir::new().unwrap();
    let original = TransactionStore::new(vec![vec![
        "bread".to_string(),
        "milk".to_string(),
    ]]);
    let index = ItemIndex::build(&original).unwrap();
    let (idx2item, _) = write_item_index(dir.path(), "dict", &index).unwrap();
    let index = read_item_index(idx2item).unwrap();

    let mut miner = AprioriMiner::<String>::new(None, Some(0.5), None).unwrap();
    miner
        .set_transactions(TransactionStore::new(vec![
            vec!["milk".to_string()],
            vec!["milk".to_string(), "bread".to_string()],
        ]))
        .unwrap();
    let lattice = miner.mine_with_index(&index).unwrap();
    assert_eq!(lattice.support_count(&[0, 1]), Some(1));
    assert_eq!(lattice.support_count(&[1]), Some(2));

    miner
        .set_transactions(TransactionStore::new(vec![vec!["eggs".to_string()]]))
        .unwrap();
    let err = miner.mine_with_index(&index).unwrap_err();
    assert!(matches!(err, AprioriError::UnknownToken(ref token) if token == "eggs"));
    assert_eq!(err.kind(), ErrorKind::Encoding);
}

#[test]
fn empty_store_never_reaches_the_engine() {
    let store: TransactionStore = TransactionStore::new(vec![]);
    assert!(matches!(
        ItemIndex::build(&store),
        Err(AprioriError::EmptyInput)
    ));
}

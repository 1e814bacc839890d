use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{AprioriError, Result},
    index::ItemIndex,
    io::Format,
    transactions::TransactionStore,
    types::Token,
};

/// Writes `store` to `{dir}/{name}_transactions.{ext}`, creating `dir` if
/// needed. Empty transactions have no textual form and are skipped.
///
/// Fields are never quoted, so every item must survive
/// [`read_transactions`](crate::io::ingest::read_transactions) unchanged:
/// non-empty, without surrounding whitespace, and free of the separator and
/// line breaks. The store is checked before anything is written.
pub fn write_transactions<T: Token>(
    dir: impl AsRef<Path>,
    store: &TransactionStore<T>,
    format: Format,
) -> Result<PathBuf> {
    let delimiter = format.delimiter();
    let records = store
        .iter()
        .filter(|transaction| !transaction.is_empty())
        .map(|transaction| {
            transaction
                .iter()
                .map(|item| writable_item(item.to_string(), delimiter))
                .collect::<Result<Vec<String>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(format!("{}_transactions.{}", store.name(), format.extension()));
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .quote_style(csv::QuoteStyle::Never)
        .delimiter(delimiter)
        .from_path(&path)?;

    for record in &records {
        writer.write_record(record)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), transactions = records.len(), "wrote transactions");
    Ok(path)
}

fn writable_item(item: String, delimiter: u8) -> Result<String> {
    let representable = !item.is_empty()
        && item.trim() == item
        && !item
            .bytes()
            .any(|byte| byte == delimiter || byte == b'\n' || byte == b'\r');
    if representable {
        Ok(item)
    } else {
        Err(AprioriError::UnwritableItem {
            item,
            delimiter: delimiter as char,
        })
    }
}

/// Writes `index` as two listings, `{name}_idx2item.txt` with `id: token`
/// lines and `{name}_item2idx.txt` with `token: id` lines, both in id order.
pub fn write_item_index<T: Token>(
    dir: impl AsRef<Path>,
    name: &str,
    index: &ItemIndex<T>,
) -> Result<(PathBuf, PathBuf)> {
    if index.is_empty() {
        return Err(AprioriError::EmptyIndex);
    }

    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let idx2item = dir.join(format!("{}_idx2item.txt", name));
    let mut file = BufWriter::new(File::create(&idx2item)?);
    for (id, token) in index.iter() {
        writeln!(file, "{}: {}", id, token)?;
    }
    file.flush()?;

    let item2idx = dir.join(format!("{}_item2idx.txt", name));
    let mut file = BufWriter::new(File::create(&item2idx)?);
    for (id, token) in index.iter() {
        writeln!(file, "{}: {}", token, id)?;
    }
    file.flush()?;

    debug!(
        dir = %dir.display(),
        items = index.len(),
        "wrote item index"
    );
    Ok((idx2item, item2idx))
}

/// Reads an `id: token` listing written by [`write_item_index`]. Ids must
/// cover `[0, n)` exactly.
pub fn read_item_index(path: impl AsRef<Path>) -> Result<ItemIndex> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut entries: Vec<(usize, String)> = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed = line
            .split_once(": ")
            .and_then(|(id, token)| id.trim().parse::<usize>().ok().map(|id| (id, token)));
        match parsed {
            Some((id, token)) => entries.push((id, token.to_string())),
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{}:{}: expected `id: token`", path.display(), line_num + 1),
                )
                .into())
            }
        }
    }

    entries.sort_unstable_by_key(|&(id, _)| id);
    if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{}: id {} is listed more than once", path.display(), pair[0].0),
        )
        .into());
    }

    let len = entries.len();
    if let Some((_, &(id, _))) = entries
        .iter()
        .enumerate()
        .find(|&(position, &(id, _))| position != id)
    {
        return Err(AprioriError::UnknownIndex { index: id, len });
    }

    ItemIndex::from_tokens(entries.into_iter().map(|(_, token)| token).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_transactions;
    use tempfile::TempDir;

    macro_rules! str_vec {
        ($($x:expr),*) => {
            {
                let mut vec: Vec<String> = vec![];
                $(vec.push($x.into());)*
                vec
            }
        };
    }

    fn store() -> TransactionStore {
        TransactionStore::named(
            "groceries",
            vec![
                str_vec!["bread", "yogurt"],
                str_vec!["bread", "milk", "cereal"],
                str_vec!["yogurt"],
            ],
        )
    }

    #[test]
    fn writes_both_listings() {
        let dir = TempDir::new().unwrap();
        let index = ItemIndex::build(&store()).unwrap();

        let (idx2item, item2idx) = write_item_index(dir.path(), "groceries", &index).unwrap();

        assert_eq!(
            fs::read_to_string(idx2item).unwrap(),
            "0: bread\n1: yogurt\n2: milk\n3: cereal\n"
        );
        assert_eq!(
            fs::read_to_string(item2idx).unwrap(),
            "bread: 0\nyogurt: 1\nmilk: 2\ncereal: 3\n"
        );
    }

    #[test]
    fn creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("out").join("dicts");
        let index = ItemIndex::build(&store()).unwrap();

        write_item_index(&nested, "groceries", &index).unwrap();
        assert!(nested.join("groceries_idx2item.txt").exists());
    }

    #[test]
    fn reads_back_written_index() {
        let dir = TempDir::new().unwrap();
        let index = ItemIndex::build(&store()).unwrap();
        let (idx2item, _) = write_item_index(dir.path(), "groceries", &index).unwrap();

        assert_eq!(read_item_index(idx2item).unwrap(), index);
    }

    #[test]
    fn rejects_gaps_in_listing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gappy_idx2item.txt");
        fs::write(&path, "0: bread\n2: milk\n").unwrap();

        assert!(matches!(
            read_item_index(&path),
            Err(AprioriError::UnknownIndex { index: 2, len: 2 })
        ));
    }

    #[test]
    fn rejects_repeated_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("twice_idx2item.txt");
        fs::write(&path, "0: bread\n0: milk\n").unwrap();

        match read_item_index(&path) {
            Err(AprioriError::Io(err)) => {
                assert_eq!(err.kind(), io::ErrorKind::InvalidData);
                assert!(err.to_string().contains("more than once"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_listing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad_idx2item.txt");
        fs::write(&path, "bread\n").unwrap();

        assert!(matches!(read_item_index(&path), Err(AprioriError::Io(_))));
    }

    #[test]
    fn transactions_round_trip_through_every_format() {
        let dir = TempDir::new().unwrap();
        let store = store();

        for format in [Format::Csv, Format::Tsv, Format::text()] {
            let path = write_transactions(dir.path(), &store, format).unwrap();
            assert_eq!(
                path.file_name().and_then(|name| name.to_str()),
                Some(format!("groceries_transactions.{}", format.extension()).as_str())
            );

            let read = read_transactions(&path, format).unwrap();
            assert_eq!(read.transactions(), store.transactions());
        }
    }

    #[test]
    fn rejects_items_containing_the_separator() {
        let dir = TempDir::new().unwrap();
        let store = TransactionStore::named("spaced", vec![str_vec!["red apple", "milk"]]);

        match write_transactions(dir.path(), &store, Format::text()) {
            Err(AprioriError::UnwritableItem { item, delimiter }) => {
                assert_eq!(item, "red apple");
                assert_eq!(delimiter, ' ');
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!dir.path().join("spaced_transactions.txt").exists());
    }

    #[test]
    fn rejects_items_with_line_breaks_or_padding() {
        let dir = TempDir::new().unwrap();
        for item in ["bread\nmilk", " milk", ""] {
            let store = TransactionStore::new(vec![vec![item.to_string()]]);
            assert!(matches!(
                write_transactions(dir.path(), &store, Format::Csv),
                Err(AprioriError::UnwritableItem { .. })
            ));
        }
    }

    #[test]
    fn single_column_csv_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = TransactionStore::named(
            "produce",
            vec![str_vec!["red apple"], str_vec!["whole milk"]],
        );

        let path = write_transactions(dir.path(), &store, Format::Csv).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "red apple\nwhole milk\n");

        let read = read_transactions(&path, Format::Csv).unwrap();
        assert_eq!(read.transactions(), store.transactions());
    }

    #[test]
    fn quotes_are_written_verbatim() {
        let dir = TempDir::new().unwrap();
        let store = TransactionStore::named("quoted", vec![str_vec!["\"special", "bread"]]);

        let path = write_transactions(dir.path(), &store, Format::text()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "\"special bread\n");
        assert_eq!(
            read_transactions(&path, Format::text()).unwrap().transactions(),
            store.transactions()
        );
    }
}

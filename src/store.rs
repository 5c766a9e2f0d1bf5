use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail};
use redb::{Database, ReadableTable, TableDefinition};
use tempfile::Builder;

use crate::source::RowSource;

const ROWS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("csv_rows");

// One write transaction covers at most this many rows. A single transaction
// over the whole input gets slow, a transaction per row is all overhead.
const BATCH_SIZE: usize = 10_000;

/// How rows are keyed in the store.
pub(crate) enum StoreKey {
    /// Key by the value of one column; a repeated value is a load error.
    Column { index: usize, name: String },
    /// Key by the row's sequential input position, stringified.
    Sequence,
}

/// Rows spilled to an embedded transactional store in a temporary file.
///
/// The store is written once by [RowStore::load], read by [RowStore::get]
/// which opens the database lazily on first use, and deleted by
/// [RowStore::close]. Exactly one instance owns the file; the write and read
/// phases never overlap.
pub(crate) struct RowStore {
    path: PathBuf,
    db: Option<Database>,
    closed: bool,
}

impl RowStore {
    /// Consume `source` to end of stream into a fresh temporary store.
    ///
    /// Rows are written in transactions of at most `BATCH_SIZE` rows and
    /// serialized as JSON arrays of strings. `on_row` sees every row along
    /// with its sequential position, letting the caller extract sort keys
    /// without retaining the rows themselves. Until loading succeeds the
    /// temporary file is owned by the `tempfile` guard, so any failure
    /// removes it on the way out.
    pub(crate) fn load<S, F>(
        source: &mut S,
        key: StoreKey,
        mut on_row: F,
    ) -> Result<RowStore, anyhow::Error>
    where
        S: RowSource + ?Sized,
        F: FnMut(usize, &[String]) -> Result<(), anyhow::Error>,
    {
        let tmp = Builder::new().prefix("csv-rows-").suffix(".redb").tempfile()?;
        let db = Database::create(tmp.path())?;

        let mut sequence: usize = 0;
        let mut eof = false;
        while !eof {
            let txn = db.begin_write()?;
            {
                let mut table = txn.open_table(ROWS_TABLE)?;
                for _ in 0..BATCH_SIZE {
                    let row = match source.read_row()? {
                        Some(row) => row,
                        None => {
                            eof = true;
                            break;
                        }
                    };

                    let entry_key = match &key {
                        StoreKey::Column { index, name } => {
                            let value = row[*index].as_str();
                            // Checked before insertion within the same
                            // transaction, so detection is as strict as the
                            // in-memory variant.
                            if table.get(value)?.is_some() {
                                bail!("{name}:{value} is duplicated");
                            }
                            value.to_string()
                        }
                        StoreKey::Sequence => sequence.to_string(),
                    };

                    let encoded = serde_json::to_vec(&row)?;
                    table.insert(entry_key.as_str(), encoded.as_slice())?;
                    on_row(sequence, &row)?;
                    sequence += 1;
                }
            }
            txn.commit()?;
        }

        // The write handle is not reused; reads reopen the store lazily.
        drop(db);

        let (_file, path) = tmp.keep()?;
        log::debug!("spilled {} rows to {}", sequence, path.display());
        Ok(RowStore {
            path,
            db: None,
            closed: false,
        })
    }

    /// Fetch the row stored under `key`, opening the database on first use.
    pub(crate) fn get(&mut self, key: &str) -> Result<Option<Vec<String>>, anyhow::Error> {
        if self.db.is_none() {
            self.db = Some(Database::open(&self.path)?);
        }
        let db = self
            .db
            .as_ref()
            .ok_or_else(|| anyhow!("store is not open"))?;

        let txn = db.begin_read()?;
        let table = txn.open_table(ROWS_TABLE)?;
        let row = match table.get(key)? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        Ok(row)
    }

    /// Location of the backing store file.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the database handle, if one was ever opened, and delete the
    /// temporary file.
    pub(crate) fn close(&mut self) -> Result<(), anyhow::Error> {
        self.db = None;
        self.closed = true;
        fs::remove_file(&self.path)?;
        log::debug!("removed temp store {}", self.path.display());
        Ok(())
    }
}

impl Drop for RowStore {
    fn drop(&mut self) {
        if !self.closed {
            self.db = None;
            let _ = fs::remove_file(&self.path);
        }
    }
}

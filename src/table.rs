use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use anyhow::bail;

use crate::backing::Backing;
use crate::columns::resolve_column;
use crate::source::{read_header, RowSource};
use crate::store::{RowStore, StoreKey};

/// A completed, queryable snapshot of one CSV source, keyed by the values of
/// one designated key column.
///
/// Within one table each key value appears at most once; a duplicate is a
/// load error and no partially built table is ever returned. A table is
/// loaded once, queried zero or more times with [CsvTable::find], and closed
/// exactly once.
pub trait CsvTable {
    /// Look up the row stored under `key`, re-exposed as a column-name to
    /// value map covering every column including the key column. `None`
    /// (without error) when the key is absent.
    fn find(&mut self, key: &str) -> Result<Option<HashMap<String, String>>, anyhow::Error>;

    /// Name of the key column.
    fn key_column_name(&self) -> &str;

    /// All column names, in header order.
    fn column_names(&self) -> &[String];

    /// Release any backing resource. A no-op for the in-memory variant;
    /// deletes the temporary store file for the disk-backed variant.
    fn close(&mut self) -> Result<(), anyhow::Error>;
}

fn row_map(column_names: &[String], row: &[String]) -> HashMap<String, String> {
    column_names
        .iter()
        .cloned()
        .zip(row.iter().cloned())
        .collect()
}

/// [CsvTable] holding all rows in a map in process memory.
pub struct MemoryTable {
    key_column_name: String,
    column_names: Vec<String>,
    rows: HashMap<String, Vec<String>>,
}

impl CsvTable for MemoryTable {
    fn find(&mut self, key: &str) -> Result<Option<HashMap<String, String>>, anyhow::Error> {
        Ok(self
            .rows
            .get(key)
            .map(|row| row_map(&self.column_names, row)))
    }

    fn key_column_name(&self) -> &str {
        &self.key_column_name
    }

    fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn close(&mut self) -> Result<(), anyhow::Error> {
        // No resources are held.
        Ok(())
    }
}

/// Load a [MemoryTable] by consuming `source` to end of stream.
///
/// # Arguments
/// * `source` - the row stream; the first row is the header
/// * `key_column_name` - the column whose values serve as lookup keys
pub fn load_memory_table<S>(
    source: &mut S,
    key_column_name: &str,
) -> Result<MemoryTable, anyhow::Error>
where
    S: RowSource + ?Sized,
{
    let column_names = read_header(source)?;
    let key_column_index = resolve_column(&column_names, key_column_name)?;

    let mut rows: HashMap<String, Vec<String>> = HashMap::new();
    while let Some(row) = source.read_row()? {
        match rows.entry(row[key_column_index].clone()) {
            Entry::Occupied(entry) => {
                bail!("{}:{} is duplicated", key_column_name, entry.key());
            }
            Entry::Vacant(entry) => {
                entry.insert(row);
            }
        }
    }

    Ok(MemoryTable {
        key_column_name: key_column_name.to_string(),
        column_names,
        rows,
    })
}

/// [CsvTable] with rows spilled to an embedded store in a temporary file.
///
/// The store is opened lazily on the first [CsvTable::find] and the handle
/// is reused by subsequent calls. [CsvTable::close] deletes the temporary
/// file, whether or not `find` was ever called.
pub struct FileTable {
    key_column_name: String,
    column_names: Vec<String>,
    store: RowStore,
}

impl FileTable {
    /// Location of the backing store file.
    pub fn store_path(&self) -> &Path {
        self.store.path()
    }
}

impl CsvTable for FileTable {
    fn find(&mut self, key: &str) -> Result<Option<HashMap<String, String>>, anyhow::Error> {
        match self.store.get(key)? {
            Some(row) => Ok(Some(row_map(&self.column_names, &row))),
            None => Ok(None),
        }
    }

    fn key_column_name(&self) -> &str {
        &self.key_column_name
    }

    fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn close(&mut self) -> Result<(), anyhow::Error> {
        self.store.close()
    }
}

/// Load a [FileTable] by spilling `source` to a temporary store.
///
/// Duplicate key detection and error shapes match [load_memory_table], so
/// callers need not special-case the backing choice.
pub fn load_file_table<S>(
    source: &mut S,
    key_column_name: &str,
) -> Result<FileTable, anyhow::Error>
where
    S: RowSource + ?Sized,
{
    let column_names = read_header(source)?;
    let key_column_index = resolve_column(&column_names, key_column_name)?;

    let store = RowStore::load(
        source,
        StoreKey::Column {
            index: key_column_index,
            name: key_column_name.to_string(),
        },
        |_, _| Ok(()),
    )?;

    Ok(FileTable {
        key_column_name: key_column_name.to_string(),
        column_names,
        store,
    })
}

/// Load a table with the chosen [Backing].
pub fn load_table<S>(
    source: &mut S,
    key_column_name: &str,
    backing: Backing,
) -> Result<Box<dyn CsvTable>, anyhow::Error>
where
    S: RowSource + ?Sized,
{
    match backing {
        Backing::Memory => Ok(Box::new(load_memory_table(source, key_column_name)?)),
        Backing::File => Ok(Box::new(load_file_table(source, key_column_name)?)),
    }
}

use std::cmp::Ordering;
use std::path::Path;

use anyhow::bail;

use crate::backing::Backing;
use crate::columns::resolve_columns;
use crate::compare::sort_stable;
use crate::source::{read_header, RowSource};
use crate::store::{RowStore, StoreKey};

/// A completed, randomly indexable, order-stable snapshot of one CSV source,
/// ordered by a caller supplied comparator over one or more key columns.
///
/// Iteration by increasing index yields non-decreasing comparator order, and
/// rows whose key column values compare equal retain their original input
/// order. A sorted row set is loaded once, queried by index zero or more
/// times, and closed exactly once.
pub trait CsvSortedRows {
    /// Number of data rows.
    fn count(&self) -> usize;

    /// All column names, in header order.
    fn column_names(&self) -> &[String];

    /// The row at sorted position `index`. The index must be in
    /// `0..count()`.
    fn row(&mut self, index: usize) -> Result<Vec<String>, anyhow::Error>;

    /// Release any backing resource. A no-op for the in-memory variant;
    /// deletes the temporary store file for the disk-backed variant.
    fn close(&mut self) -> Result<(), anyhow::Error>;
}

/// [CsvSortedRows] holding the sorted rows in process memory.
pub struct MemorySortedRows {
    column_names: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvSortedRows for MemorySortedRows {
    fn count(&self) -> usize {
        self.rows.len()
    }

    fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn row(&mut self, index: usize) -> Result<Vec<String>, anyhow::Error> {
        Ok(self.rows[index].clone())
    }

    fn close(&mut self) -> Result<(), anyhow::Error> {
        // No resources are held.
        Ok(())
    }
}

/// Load a [MemorySortedRows] by reading `source` to end of stream and
/// stable-sorting the rows in place.
///
/// # Arguments
/// * `source` - the row stream; the first row is the header
/// * `key_column_names` - key columns compared in the given order; an empty
///   list means all columns in header order
/// * `compare` - comparator applied to key column values, for example
///   [crate::compare::compare_string], possibly wrapped by
///   [crate::compare::descending]
pub fn load_memory_sorted_rows<S, C>(
    source: &mut S,
    key_column_names: &[String],
    compare: C,
) -> Result<MemorySortedRows, anyhow::Error>
where
    S: RowSource + ?Sized,
    C: Fn(&str, &str) -> Result<Ordering, anyhow::Error>,
{
    let column_names = read_header(source)?;
    let key_column_indexes = resolve_columns(&column_names, key_column_names)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    while let Some(row) = source.read_row()? {
        rows.push(row);
    }

    sort_stable(
        &mut rows,
        key_column_indexes.len(),
        |row: &Vec<String>, k| row[key_column_indexes[k]].as_str(),
        &compare,
    )?;

    Ok(MemorySortedRows { column_names, rows })
}

struct SortEntry {
    index: usize,
    keys: Vec<String>,
}

/// [CsvSortedRows] with full rows spilled to an embedded store in a
/// temporary file.
///
/// Only the extracted key column values are kept in memory for sorting, so
/// peak memory is bounded by rows times key size rather than rows times row
/// size. What remains after the sort is a permutation of original input
/// positions; [CsvSortedRows::row] resolves a sorted index through it and
/// fetches the row from disk, opening the store lazily on first use.
pub struct FileSortedRows {
    column_names: Vec<String>,
    sorted_indexes: Vec<usize>,
    store: RowStore,
}

impl FileSortedRows {
    /// Location of the backing store file.
    pub fn store_path(&self) -> &Path {
        self.store.path()
    }
}

impl CsvSortedRows for FileSortedRows {
    fn count(&self) -> usize {
        self.sorted_indexes.len()
    }

    fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn row(&mut self, index: usize) -> Result<Vec<String>, anyhow::Error> {
        let original_index = self.sorted_indexes[index];
        match self.store.get(&original_index.to_string())? {
            Some(row) => Ok(row),
            None => bail!("row {} is missing from the backing store", original_index),
        }
    }

    fn close(&mut self) -> Result<(), anyhow::Error> {
        self.store.close()
    }
}

/// Load a [FileSortedRows] by spilling `source` to a temporary store keyed
/// by input position and stable-sorting the extracted key values.
///
/// Ordering and error shapes match [load_memory_sorted_rows], so callers
/// need not special-case the backing choice.
pub fn load_file_sorted_rows<S, C>(
    source: &mut S,
    key_column_names: &[String],
    compare: C,
) -> Result<FileSortedRows, anyhow::Error>
where
    S: RowSource + ?Sized,
    C: Fn(&str, &str) -> Result<Ordering, anyhow::Error>,
{
    let column_names = read_header(source)?;
    let key_column_indexes = resolve_columns(&column_names, key_column_names)?;

    let mut entries: Vec<SortEntry> = Vec::new();
    let store = RowStore::load(source, StoreKey::Sequence, |index, row| {
        entries.push(SortEntry {
            index,
            keys: key_column_indexes
                .iter()
                .map(|&key_column_index| row[key_column_index].clone())
                .collect(),
        });
        Ok(())
    })?;

    sort_stable(
        &mut entries,
        key_column_indexes.len(),
        |entry: &SortEntry, k| entry.keys[k].as_str(),
        &compare,
    )?;

    let sorted_indexes = entries.into_iter().map(|entry| entry.index).collect();

    Ok(FileSortedRows {
        column_names,
        sorted_indexes,
        store,
    })
}

/// Load a sorted row set with the chosen [Backing].
pub fn load_sorted_rows<S, C>(
    source: &mut S,
    key_column_names: &[String],
    compare: C,
    backing: Backing,
) -> Result<Box<dyn CsvSortedRows>, anyhow::Error>
where
    S: RowSource + ?Sized,
    C: Fn(&str, &str) -> Result<Ordering, anyhow::Error>,
{
    match backing {
        Backing::Memory => Ok(Box::new(load_memory_sorted_rows(
            source,
            key_column_names,
            compare,
        )?)),
        Backing::File => Ok(Box::new(load_file_sorted_rows(
            source,
            key_column_names,
            compare,
        )?)),
    }
}

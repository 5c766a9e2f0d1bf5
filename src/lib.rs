//! This crate implements the row engine behind `join` and `sort` style
//! operations over CSV data: lookup tables keyed by a column value and
//! sorted row sets ordered by one or more key columns.
//!
//! Each structure comes in two variants behind a common trait. The in-memory
//! variant keeps every row in process memory. The disk-backed variant spills
//! rows into an embedded transactional key-value store held in a temporary
//! file, keeping only the sort keys (or nothing at all, for tables) in
//! memory, so that files much larger than available memory can be joined or
//! sorted. Callers choose the variant with [backing::Backing] and otherwise
//! program against the [table::CsvTable] and [sorted_rows::CsvSortedRows]
//! traits alone.
//!
//! # Examples
//! ```
//! use csv_row_store::compare::compare_string;
//! use csv_row_store::source::CsvRowSource;
//! use csv_row_store::sorted_rows::{load_memory_sorted_rows, CsvSortedRows};
//!
//! fn main() -> Result<(), anyhow::Error> {
//!     let data = "id,name\n2,Sato\n1,Suzuki\n";
//!     let mut source = CsvRowSource::new(data.as_bytes());
//!     let mut rows = load_memory_sorted_rows(
//!         &mut source,
//!         &["id".to_string()],
//!         compare_string,
//!     )?;
//!     assert_eq!(rows.count(), 2);
//!     assert_eq!(rows.row(0)?, vec!["1", "Suzuki"]);
//!     assert_eq!(rows.row(1)?, vec!["2", "Sato"]);
//!     rows.close()
//! }
//! ```
//!

pub(crate) mod store;

pub mod backing;
pub mod columns;
pub mod compare;
pub mod sorted_rows;
pub mod source;
pub mod table;

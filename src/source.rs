use std::io::Read;
use std::path::Path;

use anyhow::anyhow;
use csv::{ReaderBuilder, StringRecord};

/// A stream of rows read from one CSV source.
///
/// `Ok(None)` signals end of stream and is not an error; any `Err` is an I/O
/// or parse failure and is propagated verbatim by the loaders in this crate.
/// The first row returned is the header. Every data row of one source is
/// expected to carry the same field count as the header.
pub trait RowSource {
    /// Read the next row, or `None` at end of stream.
    fn read_row(&mut self) -> Result<Option<Vec<String>>, anyhow::Error>;
}

/// Read the header row from a source.
///
/// End of stream before the first row means the source is empty, which is an
/// error for every structure in this crate.
pub fn read_header<S>(source: &mut S) -> Result<Vec<String>, anyhow::Error>
where
    S: RowSource + ?Sized,
{
    source.read_row()?.ok_or_else(|| anyhow!("no header"))
}

/// [RowSource] over the `csv` crate tokenizer.
///
/// The reader is configured with `has_headers(false)` so that the header row
/// flows through [RowSource::read_row] like any other row, and with strict
/// field counts so that a ragged data row surfaces as a read error.
pub struct CsvRowSource<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CsvRowSource<R> {
    /// Create a row source over any reader producing CSV text.
    pub fn new(reader: R) -> CsvRowSource<R> {
        CsvRowSource {
            reader: ReaderBuilder::new().has_headers(false).from_reader(reader),
        }
    }
}

impl CsvRowSource<std::fs::File> {
    /// Create a row source over a CSV file.
    pub fn from_path(path: &Path) -> Result<CsvRowSource<std::fs::File>, anyhow::Error> {
        let reader = ReaderBuilder::new().has_headers(false).from_path(path)?;
        Ok(CsvRowSource { reader })
    }
}

impl<R: Read> RowSource for CsvRowSource<R> {
    fn read_row(&mut self) -> Result<Option<Vec<String>>, anyhow::Error> {
        let mut record = StringRecord::new();
        if self.reader.read_record(&mut record)? {
            Ok(Some(record.iter().map(str::to_string).collect()))
        } else {
            Ok(None)
        }
    }
}

use std::io::Cursor;

use csv_row_store::sorted_rows::CsvSortedRows;
use csv_row_store::source::CsvRowSource;
use log::LevelFilter;
use simple_logger::SimpleLogger;

pub fn setup() {
    SimpleLogger::new()
        .with_level(LevelFilter::Debug)
        .init()
        .ok();
}

#[allow(dead_code)]
pub fn csv_text(rows: &[&[&str]]) -> String {
    let mut text = String::new();
    for row in rows {
        text.push_str(&row.join(","));
        text.push('\n');
    }
    text
}

#[allow(dead_code)]
pub fn csv_source(text: &str) -> CsvRowSource<Cursor<String>> {
    CsvRowSource::new(Cursor::new(text.to_string()))
}

#[allow(dead_code)]
pub fn rows_of(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|field| field.to_string()).collect())
        .collect()
}

#[allow(dead_code)]
pub fn read_all_rows<T>(rows: &mut T) -> Result<Vec<Vec<String>>, anyhow::Error>
where
    T: CsvSortedRows + ?Sized,
{
    (0..rows.count()).map(|index| rows.row(index)).collect()
}

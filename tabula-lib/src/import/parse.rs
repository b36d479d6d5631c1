//! Delimited text parsing

use std::io;

use crate::error::ImportError;

/// One data record with its line number in the file.
#[derive(Debug, Clone)]
pub(crate) struct RawRecord {
    pub line: u64,
    pub cells: Vec<String>,
}

/// Header line plus every data record, still as text.
#[derive(Debug, Clone)]
pub(crate) struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// Reads the whole input. Records may have fewer or more cells than the
/// header line; missing cells read as empty.
pub(crate) fn parse<R: io::Read>(reader: R, delimiter: u8) -> Result<RawTable, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        records.push(RawRecord {
            line,
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    if records.is_empty() {
        return Err(ImportError::NoData);
    }

    Ok(RawTable { headers, records })
}

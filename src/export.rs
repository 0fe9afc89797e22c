use std::fs::File;
use std::io::Write;
use std::path::Path;

use indexmap::IndexSet;

use crate::{ReviewRecord, Result};

/// Union of all field names, in the order they were first seen.
fn columns(records: &[ReviewRecord]) -> IndexSet<&str> {
    records.iter().flat_map(ReviewRecord::field_names).collect()
}

/// Writes `records` as CSV: a header row with every column any record has,
/// then one row per record with empty cells for absent fields.
pub fn write_records<W: Write>(records: &[ReviewRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if records.is_empty() {
        wtr.flush()?;
        return Ok(());
    }

    let columns = columns(records);
    wtr.write_record(&columns)?;
    for record in records {
        wtr.write_record(columns.iter().map(|column| {
            record
                .get(column)
                .map(ToString::to_string)
                .unwrap_or_default()
        }))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the records to it.
/// Returns the number of data rows written.
pub fn write_csv_file(path: impl AsRef<Path>, records: &[ReviewRecord]) -> Result<usize> {
    let file = File::create(path)?;
    write_records(records, file)?;
    Ok(records.len())
}

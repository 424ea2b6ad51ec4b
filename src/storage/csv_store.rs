use crate::model::{INSTRUMENT_COUNT, Instrument, SeriesTable, StorageError};
use csv::WriterBuilder;
use std::fs;
use std::path::Path;
use tracing::info;

const DATE_COLUMN: &str = "Date";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Writes the table as `Date,GOLD,DXY,US10Y`, overwriting any existing file.
/// Floats use shortest round-trip formatting; NaN becomes an empty field.
pub fn write_table(path: &Path, table: &SeriesTable) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().from_path(path)?;

    let mut header = vec![DATE_COLUMN];
    header.extend(Instrument::ALL.iter().map(|i| i.label()));
    writer.write_record(&header)?;

    for (date, values) in table.rows() {
        let mut record = Vec::with_capacity(INSTRUMENT_COUNT + 1);
        record.push(date.format(DATE_FORMAT).to_string());
        record.extend(values.iter().map(|v| format_float(*v)));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    info!("Saved {} rows to {}", table.len(), path.display());
    Ok(())
}

fn format_float(value: f64) -> String {
    if value.is_nan() { String::new() } else { value.to_string() }
}

#[cfg(test)]
pub use reader::read_table;

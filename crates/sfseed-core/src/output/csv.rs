use std::io::Write;

use crate::error::{Result, SfSeedError};
use crate::generate::table::GeneratedTable;

/// Write a table as CSV: one header row, then one record per generated row.
///
/// Quoting follows RFC 4180 through the `csv` crate. Nulls become empty cells
/// and booleans render as `True`/`False`.
pub fn write_csv<W: Write>(writer: W, table: &GeneratedTable) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(table.column_names())
        .map_err(|e| SfSeedError::Csv {
            message: "writing CSV header".to_string(),
            source: e,
        })?;

    for (index, row) in table.rows().enumerate() {
        csv_writer
            .write_record(row.iter().map(|v| v.to_csv_string()))
            .map_err(|e| SfSeedError::Csv {
                message: format!("writing CSV row {}", index + 1),
                source: e,
            })?;
    }

    csv_writer.flush().map_err(|e| SfSeedError::Output {
        message: "flushing CSV output".to_string(),
        source: e,
    })
}

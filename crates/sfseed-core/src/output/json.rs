use std::io::Write;

use crate::error::{Result, SfSeedError};
use crate::generate::table::GeneratedTable;

/// Write a table as a JSON array of row objects.
///
/// Rows are streamed one at a time rather than building the whole document
/// in memory. Keys keep column order.
pub fn write_json<W: Write>(writer: &mut W, table: &GeneratedTable) -> Result<()> {
    let keys = table
        .column_names()
        .map(json_key)
        .collect::<Result<Vec<_>>>()?;

    write_str(writer, "[")?;
    for (row_idx, row) in table.rows().enumerate() {
        if row_idx > 0 {
            write_str(writer, ",")?;
        }
        write_str(writer, "\n  {")?;
        for (col_idx, (key, value)) in keys.iter().zip(row).enumerate() {
            if col_idx > 0 {
                write_str(writer, ",")?;
            }
            let encoded = serde_json::to_string(&value.to_json()).map_err(|e| {
                SfSeedError::Output {
                    message: "encoding JSON value".to_string(),
                    source: e.into(),
                }
            })?;
            write_str(writer, &format!("\n    {}: {}", key, encoded))?;
        }
        write_str(writer, "\n  }")?;
    }
    if table.row_count() > 0 {
        write_str(writer, "\n")?;
    }
    write_str(writer, "]\n")
}

fn write_str<W: Write>(writer: &mut W, s: &str) -> Result<()> {
    writer
        .write_all(s.as_bytes())
        .map_err(|e| SfSeedError::Output {
            message: "writing JSON".to_string(),
            source: e,
        })
}

/// RFC 8259 key escaping via serde_json rather than `{:?}`.
fn json_key(s: &str) -> Result<String> {
    serde_json::to_string(s).map_err(|e| SfSeedError::Output {
        message: "encoding JSON key".to_string(),
        source: e.into(),
    })
}

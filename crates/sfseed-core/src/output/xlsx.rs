use std::io::Write;

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::{Result, SfSeedError};
use crate::generate::table::GeneratedTable;
use crate::generate::value::Value;

/// Worksheet limits, header row included.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Write a table as a single-sheet Excel workbook.
///
/// The header row is bold and frozen. Nulls stay empty, numbers and booleans
/// are native cells, and temporal values use the same text as CSV output.
pub fn write_xlsx<W: Write>(writer: &mut W, table: &GeneratedTable) -> Result<()> {
    if table.row_count() >= MAX_ROWS {
        return Err(SfSeedError::invalid(format!(
            "{} rows do not fit in one worksheet (limit {})",
            table.row_count(),
            MAX_ROWS - 1
        )));
    }
    if table.column_count() > MAX_COLUMNS {
        return Err(SfSeedError::invalid(format!(
            "{} columns do not fit in one worksheet (limit {})",
            table.column_count(),
            MAX_COLUMNS
        )));
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, name) in table.column_names().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, name, &header)
            .map_err(|e| xlsx_error("writing header", e))?;
    }
    sheet
        .set_freeze_panes(1, 0)
        .map_err(|e| xlsx_error("freezing header", e))?;

    for (row_idx, row) in table.rows().enumerate() {
        let r = (row_idx + 1) as u32;
        for (col, value) in row.into_iter().enumerate() {
            let c = col as u16;
            let written = match value {
                Value::Null => continue,
                Value::Bool(b) => sheet.write_boolean(r, c, *b),
                Value::Int(i) => sheet.write_number(r, c, *i as f64),
                Value::Float(f) => sheet.write_number(r, c, *f),
                Value::String(s) => sheet.write_string(r, c, s),
                other => sheet.write_string(r, c, other.to_csv_string()),
            };
            written.map_err(|e| xlsx_error(&format!("writing row {}", row_idx + 1), e))?;
        }
    }

    let bytes = workbook
        .save_to_buffer()
        .map_err(|e| xlsx_error("building workbook", e))?;
    writer.write_all(&bytes).map_err(|e| SfSeedError::Output {
        message: "writing XLSX".to_string(),
        source: e,
    })
}

fn xlsx_error(message: &str, source: XlsxError) -> SfSeedError {
    SfSeedError::Xlsx {
        message: message.to_string(),
        source,
    }
}

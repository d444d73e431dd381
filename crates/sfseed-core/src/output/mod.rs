//! Output writers for generated tables.

pub mod csv;
pub mod json;
pub mod xlsx;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, SfSeedError};
use crate::generate::table::GeneratedTable;

/// Serialization format for a generated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Xlsx,
}

impl OutputFormat {
    /// Guess the format from a file extension, defaulting to CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => OutputFormat::Xlsx,
            _ => OutputFormat::Csv,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SfSeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "xlsx" => Ok(OutputFormat::Xlsx),
            other => Err(SfSeedError::invalid(format!(
                "Unknown output format '{}', expected csv, json or xlsx",
                other
            ))),
        }
    }
}

/// Write `table` to any writer in the given format.
pub fn write_table<W: Write>(writer: &mut W, table: &GeneratedTable, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => self::csv::write_csv(writer, table),
        OutputFormat::Json => self::json::write_json(writer, table),
        OutputFormat::Xlsx => self::xlsx::write_xlsx(writer, table),
    }
}

/// Create (or truncate) `path` and write `table` to it.
pub fn write_table_to_path(path: &Path, table: &GeneratedTable, format: OutputFormat) -> Result<()> {
    let file = File::create(path).map_err(|e| SfSeedError::Output {
        message: format!("creating {}", path.display()),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    write_table(&mut writer, table, format)?;
    writer.flush().map_err(|e| SfSeedError::Output {
        message: format!("flushing {}", path.display()),
        source: e,
    })
}

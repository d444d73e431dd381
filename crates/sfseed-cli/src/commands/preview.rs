use anyhow::{Context, Result};
use comfy_table::Table as ComfyTable;

use sfseed_core::{Generator, ObjectGenerator, Value};

use super::connect;
use crate::args::PreviewArgs;

/// Fixed seed so repeated previews show the same rows.
const PREVIEW_SEED: u64 = 42;
const MAX_CELL_CHARS: usize = 40;

pub async fn run(args: &PreviewArgs) -> Result<()> {
    let config = connect::load_config()?;
    let default_ids = connect::load_default_ids(args.default_ids.as_ref(), &config)?;
    let client = connect::connect(&args.connection, &config).await?;

    let mut generator = ObjectGenerator::new(client, Generator::new(PREVIEW_SEED))
        .with_default_ids(default_ids)
        .with_options(config.generate_options());

    let include_references = !args.no_references && config.generate.references.unwrap_or(true);
    let table = generator
        .generate_table_for_object(&args.object, args.rows, include_references)
        .await
        .with_context(|| format!("Failed to generate {}", args.object))?;

    println!("━━━ {} ({} rows) ━━━", args.object, table.row_count());

    let mut t = ComfyTable::new();
    t.set_header(table.column_names().collect::<Vec<_>>());
    for row in table.rows() {
        t.add_row(row.into_iter().map(cell).collect::<Vec<_>>());
    }
    println!("{}\n", t);

    Ok(())
}

fn cell(value: &Value) -> String {
    if value.is_null() {
        return "NULL".to_string();
    }
    let s = value.to_string();
    if s.chars().count() > MAX_CELL_CHARS {
        let head: String = s.chars().take(MAX_CELL_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_truncates_on_chars() {
        let long = Value::String("é".repeat(50));
        let shown = cell(&long);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), MAX_CELL_CHARS);
        assert_eq!(cell(&Value::Null), "NULL");
        assert_eq!(cell(&Value::Int(3)), "3");
    }
}

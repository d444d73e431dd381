use anyhow::{Context, Result};
use comfy_table::Table as ComfyTable;

use sfseed_core::classify::classify_field;
use sfseed_core::SchemaSource;

use super::connect;
use crate::args::{DescribeArgs, DescribeFormat};

pub async fn run(args: &DescribeArgs) -> Result<()> {
    let config = connect::load_config()?;
    let client = connect::connect(&args.connection, &config).await?;

    let fields = client
        .describe(&args.object)
        .await
        .with_context(|| format!("Failed to describe {}", args.object))?;

    match args.format {
        DescribeFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }
        DescribeFormat::Table => {
            let mut t = ComfyTable::new();
            t.set_header(vec!["Field", "Type", "Required", "References", "Picklist", "Plan"]);
            for field in &fields {
                t.add_row(vec![
                    field.name.clone(),
                    field.field_type.clone(),
                    (if field.nillable { "" } else { "yes" }).to_string(),
                    field.reference_to.join(", "),
                    field.picklist_values.len().to_string(),
                    classify_field(field).to_string(),
                ]);
            }
            println!("━━━ {} ({} fields) ━━━", args.object, fields.len());
            println!("{}", t);
        }
    }

    Ok(())
}

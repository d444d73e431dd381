use anyhow::{Context, Result};

use sfseed_core::config::SfSeedConfig;
use sfseed_core::generate::parse_base_time;
use sfseed_core::output::write_table_to_path;
use sfseed_core::{Generator, ObjectGenerator};

use super::connect;
use crate::args::GenerateArgs;

const DEFAULT_ROWS: usize = 100;

pub async fn run(args: &GenerateArgs) -> Result<()> {
    let config = connect::load_config()?;

    // CLI flags win over sfseed.toml, which wins over built-in defaults
    let rows = args.rows.or(config.generate.rows).unwrap_or(DEFAULT_ROWS);
    let seed = args.seed.or(config.generate.seed);
    let include_references = !args.no_references && config.generate.references.unwrap_or(true);

    let mut options = config.generate_options();
    if let Some(sample_size) = args.sample_size {
        options.sample_size = sample_size;
    }
    if args.skip_unsupported {
        options.skip_unsupported = true;
    }

    let default_ids = connect::load_default_ids(args.default_ids.as_ref(), &config)?;
    let client = connect::connect(&args.connection, &config).await?;

    let engine = build_engine(seed, args.base_time.as_deref(), &config)?;
    let base_time = engine.base_time().format("%Y-%m-%dT%H:%M:%S").to_string();
    let mut generator = ObjectGenerator::new(client, engine)
        .with_default_ids(default_ids)
        .with_options(options);

    let pb = connect::spinner("2/2", &format!("Generating {} rows for {}...", rows, args.object));
    let table = generator
        .generate_table_for_object(&args.object, rows, include_references)
        .await
        .with_context(|| format!("Failed to generate {}", args.object))?;
    pb.finish_with_message(format!(
        "Generating {} rows for {}... ✓ {} columns",
        rows,
        args.object,
        table.column_count()
    ));

    let path = args.output_path();
    write_table_to_path(&path, &table, args.output_format())?;

    eprintln!(
        "\n✓ Wrote {} rows x {} columns to {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    if let Some(seed) = seed {
        eprintln!(
            "  Seed: {}, base time: {} (rerun with --seed {} --base-time {} for the same data)",
            seed, base_time, seed, base_time
        );
    }

    Ok(())
}

/// Seeded engines anchor on `--base-time`, then `generate.base_time`, then a
/// fixed default. Unseeded engines use "now" unless a base time is given.
fn build_engine(seed: Option<u64>, base_time: Option<&str>, config: &SfSeedConfig) -> Result<Generator> {
    let base_time = match base_time {
        Some(raw) => Some(parse_base_time(raw).context("Invalid --base-time")?),
        None => config.base_time()?,
    };
    let engine = match (seed, base_time) {
        (Some(seed), Some(t)) => Generator::new(seed).with_base_time(t),
        (Some(seed), None) => Generator::new(seed),
        (None, Some(t)) => Generator::from_entropy().with_base_time(t),
        (None, None) => Generator::from_entropy(),
    };
    Ok(engine)
}

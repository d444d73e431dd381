use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::error::{Result, SfSeedError};
use crate::generate::field_type::FieldType;
use crate::generate::plan::{ColumnSpec, FieldConfig, GenerationConfig};
use crate::generate::providers::{validate_config, ValueGenerator};
use crate::generate::table::GeneratedTable;
use crate::generate::value::Value;

/// The generator engine: turns field types and configs into values, columns
/// and tables.
///
/// Owns its RNG and a pinned `base_time`, so two engines built with the same
/// seed and base time produce identical tables.
#[derive(Debug)]
pub struct Generator {
    rng: StdRng,
    base_time: NaiveDateTime,
}

/// Anchor for seeded engines: 2025-01-01 00:00:00.
pub fn default_base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Parse a base time given as `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_base_time(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|_| {
            SfSeedError::invalid(format!(
                "Base time '{}' is not YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
                raw
            ))
        })
}

impl Generator {
    /// Build a deterministic engine from a seed, anchored on
    /// [`default_base_time`] so reruns reproduce temporal values too.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_time: default_base_time(),
        }
    }

    /// Build an engine seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            base_time: chrono::Utc::now().naive_utc(),
        }
    }

    /// Pin temporal values to a fixed anchor instead of "now".
    pub fn with_base_time(mut self, base_time: NaiveDateTime) -> Self {
        self.base_time = base_time;
        self
    }

    pub fn base_time(&self) -> NaiveDateTime {
        self.base_time
    }

    /// Generate a single value. `config` may be mutated (comboboxes grow their pool).
    pub fn generate_value(&mut self, field_type: FieldType, config: &mut FieldConfig) -> Result<Value> {
        field_type.generate(config, &mut self.rng, self.base_time)
    }

    /// Generate `count` values of one type.
    ///
    /// The caller's config is cloned once per column, so repeated calls with
    /// the same config start from the same pool.
    pub fn generate_column(
        &mut self,
        field_type: FieldType,
        count: usize,
        config: &FieldConfig,
    ) -> Result<Vec<Value>> {
        ensure_positive(count, "Number of samples")?;
        validate_config(field_type, config)?;

        let mut config = config.clone();
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.generate_value(field_type, &mut config)?);
        }
        Ok(values)
    }

    /// Generate a table with one column per spec, in spec order.
    ///
    /// All arguments are validated before any value is drawn, so the call
    /// either returns a complete table or an error.
    pub fn generate_table(&mut self, specs: &[ColumnSpec], row_count: usize) -> Result<GeneratedTable> {
        ensure_positive(row_count, "Number of rows")?;

        let mut seen = HashSet::with_capacity(specs.len());
        for spec in specs {
            if !seen.insert(spec.name.as_str()) {
                return Err(SfSeedError::invalid(format!(
                    "Duplicate column name '{}'",
                    spec.name
                )));
            }
            if let Err(SfSeedError::InvalidArgument { message }) =
                validate_config(spec.field_type, &spec.config)
            {
                return Err(SfSeedError::invalid(format!("Column '{}': {}", spec.name, message)));
            }
        }

        debug!(columns = specs.len(), rows = row_count, "Generating table");

        let mut table = GeneratedTable::with_row_count(row_count);
        for spec in specs {
            let values = self.generate_column(spec.field_type, row_count, &spec.config)?;
            table.push_column(spec.name.clone(), values);
        }
        Ok(table)
    }

    /// Generate a table from parallel name/type sequences and a per-name config map.
    ///
    /// Type names are parsed case-insensitively. Names without a config entry
    /// use the default (pool-less) config.
    pub fn generate_table_from_parts<N, T>(
        &mut self,
        column_names: &[N],
        column_types: &[T],
        row_count: usize,
        configs: &GenerationConfig,
    ) -> Result<GeneratedTable>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        if column_names.len() != column_types.len() {
            return Err(SfSeedError::invalid(format!(
                "Length of column_names and column_types mismatched: names = {}, types = {}",
                column_names.len(),
                column_types.len()
            )));
        }

        let specs = column_names
            .iter()
            .zip(column_types)
            .map(|(name, type_name)| {
                let name = name.as_ref();
                let field_type: FieldType = type_name.as_ref().parse()?;
                let config = configs.get(name).cloned().unwrap_or_default();
                Ok(ColumnSpec::new(name, field_type).with_config(config))
            })
            .collect::<Result<Vec<_>>>()?;

        self.generate_table(&specs, row_count)
    }
}

fn ensure_positive(count: usize, what: &str) -> Result<()> {
    if count == 0 {
        return Err(SfSeedError::invalid(format!(
            "{} must be a positive integer, found {}",
            what, count
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Generator {
        Generator::new(42).with_base_time(
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_generate_column_length() {
        let mut eng = engine();
        for t in FieldType::ALL {
            let values = eng.generate_column(t, 7, &FieldConfig::default()).unwrap();
            assert_eq!(values.len(), 7, "{}", t);
        }
    }

    #[test]
    fn test_zero_count_rejected() {
        let mut eng = engine();
        let err = eng
            .generate_column(FieldType::Int, 0, &FieldConfig::default())
            .unwrap_err();
        assert!(matches!(err, SfSeedError::InvalidArgument { .. }));

        let err = eng.generate_table(&[ColumnSpec::new("A", FieldType::Int)], 0).unwrap_err();
        assert!(err.to_string().contains("Number of rows"));
    }

    #[test]
    fn test_table_preserves_column_order() {
        let mut eng = engine();
        let specs = vec![
            ColumnSpec::new("Zeta", FieldType::Int),
            ColumnSpec::new("Alpha", FieldType::Email),
            ColumnSpec::picklist("Mid", ["x"]),
        ];
        let table = eng.generate_table(&specs, 3).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mid"]);
        assert!(table.column("Mid").unwrap().iter().all(|v| v.as_str() == Some("x")));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut eng = engine();
        let specs = vec![
            ColumnSpec::new("Name", FieldType::String),
            ColumnSpec::new("Name", FieldType::Int),
        ];
        assert!(eng.generate_table(&specs, 1).is_err());
    }

    #[test]
    fn test_empty_pool_fails_before_generation() {
        let mut eng = engine();
        let specs = vec![
            ColumnSpec::new("Ok", FieldType::Int),
            ColumnSpec::picklist("Bad", Vec::<String>::new()),
        ];
        let err = eng.generate_table(&specs, 5).unwrap_err();
        assert!(err.to_string().contains("Bad"));
    }

    #[test]
    fn test_from_parts_length_mismatch() {
        let mut eng = engine();
        let err = eng
            .generate_table_from_parts(&["A", "B"], &["int"], 5, &GenerationConfig::new())
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("names = 2"), "{}", msg);
        assert!(msg.contains("types = 1"), "{}", msg);
    }

    #[test]
    fn test_from_parts_unknown_type() {
        let mut eng = engine();
        let err = eng
            .generate_table_from_parts(&["A"], &["geolocation"], 5, &GenerationConfig::new())
            .unwrap_err();
        assert!(err.to_string().contains("geolocation"));
    }

    #[test]
    fn test_from_parts_applies_configs() {
        let mut eng = engine();
        let mut configs = GenerationConfig::new();
        configs.insert("Stage".to_string(), FieldConfig::picklist(["Won", "Lost"]));
        let table = eng
            .generate_table_from_parts(&["Stage", "Amount"], &["PICKLIST", "currency"], 20, &configs)
            .unwrap();
        for v in table.column("Stage").unwrap() {
            assert!(matches!(v.as_str(), Some("Won") | Some("Lost")));
        }
        assert!(table.column("Amount").unwrap().iter().all(|v| v.as_float().is_some()));
    }

    #[test]
    fn test_combobox_pool_not_shared_across_columns() {
        let mut eng = engine();
        let config = FieldConfig::picklist(["Web"]);
        eng.generate_column(FieldType::Combobox, 10, &config).unwrap();
        assert_eq!(config.picklist_values.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_same_seed_same_table() {
        let specs = vec![
            ColumnSpec::new("Name", FieldType::String),
            ColumnSpec::new("Close", FieldType::Date),
        ];
        let a = engine().generate_table(&specs, 10).unwrap();
        let b = engine().generate_table(&specs, 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seeded_engines_built_apart_match() {
        let specs = vec![
            ColumnSpec::new("CreatedAt", FieldType::DateTime),
            ColumnSpec::new("Close", FieldType::Date),
            ColumnSpec::new("Reminder", FieldType::Time),
        ];
        let mut first = Generator::new(7);
        let a = first.generate_table(&specs, 10).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let mut second = Generator::new(7);
        let b = second.generate_table(&specs, 10).unwrap();

        assert_eq!(first.base_time(), default_base_time());
        assert_eq!(second.base_time(), default_base_time());
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_base_time() {
        let midnight = parse_base_time("2024-03-05").unwrap();
        assert_eq!(midnight.to_string(), "2024-03-05 00:00:00");
        let exact = parse_base_time(" 2024-03-05T13:45:10 ").unwrap();
        assert_eq!(exact.to_string(), "2024-03-05 13:45:10");
        let err = parse_base_time("03/05/2024").unwrap_err();
        assert!(matches!(err, SfSeedError::InvalidArgument { .. }));
    }
}

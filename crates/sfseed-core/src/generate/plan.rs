use std::collections::HashMap;

use crate::generate::field_type::FieldType;

/// Per-field generation options.
///
/// The only recognized option is the enumeration pool used by `picklist`,
/// `multipicklist` and `combobox`. `None` means no pool was configured, which
/// is different from an explicitly empty pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldConfig {
    pub picklist_values: Option<Vec<String>>,
}

impl FieldConfig {
    /// A config offering exactly `values` to enumeration-style generators.
    pub fn picklist<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            picklist_values: Some(values.into_iter().map(Into::into).collect()),
        }
    }
}

/// Field name -> config. Fields without an entry use `FieldConfig::default()`.
pub type GenerationConfig = HashMap<String, FieldConfig>;

/// A fully resolved column: what to call it, how to generate it, with what pool.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub field_type: FieldType,
    pub config: FieldConfig,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            config: FieldConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Shorthand for a picklist column over a fixed pool.
    pub fn picklist<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, FieldType::Picklist).with_config(FieldConfig::picklist(values))
    }
}

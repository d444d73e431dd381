//! # Object Generator
//!
//! Drives the engine from live schema metadata:
//!
//! 1. describe the object,
//! 2. drop system-managed and non-createable fields,
//! 3. attach enumeration pools to required picklist-style fields,
//! 4. resolve required reference fields to identifier pools (cache, then
//!    default-id table, then a remote sample query),
//! 5. apply fixed and configured overrides,
//! 6. hand the column specs to the engine.
//!
//! Reference fields are resolved one at a time in describe order.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::classify::rules::{classify_field, constant_override, enumeration_pool, FieldClass};
use crate::default_ids::DefaultIds;
use crate::error::{Result, SfSeedError};
use crate::generate::engine::Generator;
use crate::generate::field_type::FieldType;
use crate::generate::foreign_key::{IdentifierCache, IdentifierPool};
use crate::generate::plan::{ColumnSpec, FieldConfig};
use crate::generate::table::GeneratedTable;
use crate::schema::introspect::{RecordSource, SchemaSource};
use crate::schema::types::FieldDescriptor;

/// Default number of existing identifiers sampled per reference target.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Knobs for object-level generation.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Maximum identifiers fetched per reference target.
    pub sample_size: usize,
    /// Drop fields whose describe type has no generator instead of failing.
    pub skip_unsupported: bool,
    /// Fixed value lists keyed by `"Object.Field"`; the field becomes a
    /// picklist over these values.
    pub field_overrides: BTreeMap<String, Vec<String>>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            skip_unsupported: false,
            field_overrides: BTreeMap::new(),
        }
    }
}

/// Generates tables for whole objects using a schema/record collaborator.
pub struct ObjectGenerator<C> {
    client: C,
    engine: Generator,
    default_ids: DefaultIds,
    cache: IdentifierCache,
    options: GenerateOptions,
}

impl<C> ObjectGenerator<C>
where
    C: SchemaSource + RecordSource,
{
    pub fn new(client: C, engine: Generator) -> Self {
        Self {
            client,
            engine,
            default_ids: DefaultIds::new(),
            cache: IdentifierCache::new(),
            options: GenerateOptions::default(),
        }
    }

    pub fn with_default_ids(mut self, default_ids: DefaultIds) -> Self {
        self.default_ids = default_ids;
        self
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn cache(&self) -> &IdentifierCache {
        &self.cache
    }

    /// Generate `row_count` rows of synthetic data for `object_name`.
    ///
    /// Fails without producing a table if the row count is zero, the describe
    /// call fails, a field type is unsupported (unless skipped), or a required
    /// reference has no identifiers to draw from.
    pub async fn generate_table_for_object(
        &mut self,
        object_name: &str,
        row_count: usize,
        include_references: bool,
    ) -> Result<GeneratedTable> {
        if row_count == 0 {
            return Err(SfSeedError::invalid(format!(
                "Number of rows must be a positive integer, found {}",
                row_count
            )));
        }

        let specs = self.plan_object(object_name, include_references).await?;
        info!(
            object = object_name,
            columns = specs.len(),
            rows = row_count,
            "Generating rows"
        );
        self.engine.generate_table(&specs, row_count)
    }

    /// Describe `object_name` and resolve its column specs without generating rows.
    pub async fn plan_object(
        &mut self,
        object_name: &str,
        include_references: bool,
    ) -> Result<Vec<ColumnSpec>> {
        debug!(object = object_name, "Describing object");
        let fields = self.client.describe(object_name).await?;

        let mut specs = Vec::with_capacity(fields.len());
        for field in &fields {
            if let Some(spec) = self
                .plan_field(object_name, field, include_references)
                .await?
            {
                specs.push(spec);
            }
        }

        let prefix = format!("{}.", object_name);
        for key in self.options.field_overrides.keys() {
            if let Some(name) = key.strip_prefix(&prefix) {
                if !fields.iter().any(|f| f.name == name) {
                    warn!("Override '{}' names a field {} does not have", key, object_name);
                }
            }
        }
        Ok(specs)
    }

    async fn plan_field(
        &mut self,
        object_name: &str,
        field: &FieldDescriptor,
        include_references: bool,
    ) -> Result<Option<ColumnSpec>> {
        let class = classify_field(field);
        if matches!(class, FieldClass::System | FieldClass::ReadOnly) {
            debug!(field = %field.name, %class, "Skipping field");
            return Ok(None);
        }

        let override_key = format!("{}.{}", object_name, field.name);
        if let Some(values) = self.options.field_overrides.get(&override_key) {
            return Ok(Some(ColumnSpec::picklist(&field.name, values.iter().cloned())));
        }
        if let Some(values) = constant_override(&field.name) {
            return Ok(Some(ColumnSpec::picklist(&field.name, values.iter().copied())));
        }

        let spec = match class {
            FieldClass::Generated(field_type) => {
                let spec = ColumnSpec::new(&field.name, field_type);
                if field_type.is_enumerated() && !field.nillable {
                    spec.with_config(FieldConfig::picklist(enumeration_pool(field)))
                } else {
                    spec
                }
            }
            FieldClass::Reference { target } => {
                if !include_references || field.nillable {
                    debug!(field = %field.name, "Leaving reference field empty");
                    return Ok(None);
                }
                let unresolved = |target: &str| SfSeedError::UnresolvedReference {
                    object: object_name.to_string(),
                    field: field.name.clone(),
                    target: target.to_string(),
                };
                let target = target.ok_or_else(|| unresolved("<no declared target>"))?;
                let pool = self
                    .resolve_identifier_pool(&target)
                    .await?
                    .ok_or_else(|| unresolved(&target))?;
                ColumnSpec::picklist(&field.name, pool.ids().iter().cloned())
            }
            FieldClass::Unsupported(raw) => {
                if self.options.skip_unsupported {
                    warn!(
                        "Skipping {}.{}: type '{}' has no generator",
                        object_name, field.name, raw
                    );
                    return Ok(None);
                }
                return Err(SfSeedError::invalid(format!(
                    "{}.{} has type '{}' which is not supported, select from [{}]",
                    object_name,
                    field.name,
                    raw,
                    FieldType::supported_names()
                )));
            }
            FieldClass::System | FieldClass::ReadOnly => return Ok(None),
        };

        Ok(Some(spec))
    }

    /// Identifier pool for `object_name`, computed at most once per generator.
    ///
    /// A default-id entry wins over the remote query. A query returning no
    /// identifiers yields `None`.
    pub async fn resolve_identifier_pool(
        &mut self,
        object_name: &str,
    ) -> Result<Option<IdentifierPool>> {
        let client = &self.client;
        let default_ids = &self.default_ids;
        let limit = self.options.sample_size;

        self.cache
            .get_or_resolve(object_name, || async move {
                if let Some(id) = default_ids.get(object_name) {
                    debug!(object = object_name, id, "Using default id");
                    return Ok(Some(IdentifierPool::new(vec![id.to_string()])));
                }
                let ids = client.query_identifiers(object_name, limit).await?;
                debug!(object = object_name, count = ids.len(), "Fetched identifiers");
                if ids.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(IdentifierPool::new(ids)))
                }
            })
            .await
    }
}

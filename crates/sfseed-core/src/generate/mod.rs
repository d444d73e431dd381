//! # Generator Engine
//!
//! Turns a field's semantic type plus optional configuration into random
//! values, columns and whole tables.

pub mod engine;
pub mod field_type;
pub mod foreign_key;
pub mod plan;
pub mod providers;
pub mod table;
pub mod value;

pub use engine::{default_base_time, parse_base_time, Generator};
pub use field_type::FieldType;
pub use foreign_key::{IdentifierCache, IdentifierPool};
pub use plan::{ColumnSpec, FieldConfig, GenerationConfig};
pub use table::GeneratedTable;
pub use value::Value;

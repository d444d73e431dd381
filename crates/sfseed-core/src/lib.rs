pub mod classify;
pub mod config;
pub mod default_ids;
pub mod error;
pub mod generate;
pub mod object_generator;
pub mod output;
pub mod salesforce;
pub mod schema;

// Re-export key types for convenience
pub use default_ids::DefaultIds;
pub use error::{Result, SfSeedError};
pub use generate::{ColumnSpec, FieldConfig, FieldType, GeneratedTable, Generator, Value};
pub use object_generator::{GenerateOptions, ObjectGenerator};
pub use schema::{FieldDescriptor, RecordSource, SchemaSource};

pub mod introspect;
pub mod types;

pub use introspect::{RecordSource, SchemaSource};
pub use types::FieldDescriptor;

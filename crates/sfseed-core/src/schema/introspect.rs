use crate::error::{Result, SfSeedError};
use crate::schema::types::FieldDescriptor;

/// Source of object metadata.
/// The Salesforce REST client implements this; tests use an in-memory source.
pub trait SchemaSource: Send + Sync {
    /// Return the field descriptors of `object_name`, in describe order.
    fn describe(
        &self,
        object_name: &str,
    ) -> impl std::future::Future<Output = Result<Vec<FieldDescriptor>>> + Send;
}

/// Source of existing record identifiers, used to populate reference fields.
pub trait RecordSource: Send + Sync {
    /// Return up to `limit` identifiers of `object_name` records, in the order
    /// the source returns them.
    fn query_identifiers(
        &self,
        object_name: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

/// Check that `name` is a plain API name (letters, digits, underscores,
/// starting with a letter) before it is placed in a URL path or query.
pub fn validate_object_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SfSeedError::invalid(format!(
            "'{}' is not a valid object API name",
            name
        )))
    }
}

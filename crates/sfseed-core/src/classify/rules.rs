use std::fmt;

use crate::generate::field_type::FieldType;
use crate::schema::types::FieldDescriptor;

/// Fields the platform manages itself: identity, audit stamps, ownership.
pub const SYSTEM_FIELDS: &[&str] = &[
    "Id",
    "CreatedDate",
    "CreatedById",
    "LastModifiedDate",
    "LastModifiedById",
    "SystemModstamp",
    "OwnerId",
    "LastActivityDate",
    "LastViewedDate",
    "LastReferencedDate",
];

/// Fields forced to a constant single-value picklist when present.
const CONSTANT_OVERRIDES: &[(&str, &[&str])] = &[("IsDeleted", &["False"])];

/// Pool used for a required enumeration field whose schema reports no labels.
pub const EMPTY_PICKLIST_FALLBACK: &str = "None";

/// How a field takes part in generation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldClass {
    /// System-managed field; never generated.
    System,
    /// Not createable; never generated.
    ReadOnly,
    /// Generated from its own type.
    Generated(FieldType),
    /// Foreign key whose values come from the target object's identifiers.
    Reference { target: Option<String> },
    /// Describe type the engine has no generator for.
    Unsupported(String),
}

impl fmt::Display for FieldClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldClass::System => write!(f, "system"),
            FieldClass::ReadOnly => write!(f, "read-only"),
            FieldClass::Generated(t) => write!(f, "{}", t),
            FieldClass::Reference { target: Some(t) } => write!(f, "reference -> {}", t),
            FieldClass::Reference { target: None } => write!(f, "reference -> ?"),
            FieldClass::Unsupported(raw) => write!(f, "unsupported ({})", raw),
        }
    }
}

/// Classify a field from its descriptor.
///
/// System fields are checked first, so `OwnerId` is excluded even though it is
/// also a createable reference.
pub fn classify_field(field: &FieldDescriptor) -> FieldClass {
    if SYSTEM_FIELDS.contains(&field.name.as_str()) {
        return FieldClass::System;
    }
    if !field.createable {
        return FieldClass::ReadOnly;
    }
    if field.is_reference() {
        return FieldClass::Reference {
            target: field.primary_target().map(str::to_string),
        };
    }
    match field.field_type.parse::<FieldType>() {
        Ok(t) => FieldClass::Generated(t),
        Err(_) => FieldClass::Unsupported(field.field_type.clone()),
    }
}

/// The enumeration pool for a field: its declared labels, or `["None"]` when
/// the schema reports none.
pub fn enumeration_pool(field: &FieldDescriptor) -> Vec<String> {
    if field.picklist_values.is_empty() {
        vec![EMPTY_PICKLIST_FALLBACK.to_string()]
    } else {
        field.picklist_values.clone()
    }
}

/// The constant values a field is pinned to, if it is one of the fixed overrides.
pub fn constant_override(field_name: &str) -> Option<&'static [&'static str]> {
    CONSTANT_OVERRIDES
        .iter()
        .find(|(name, _)| *name == field_name)
        .map(|(_, values)| *values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_fields_excluded_first() {
        let owner = FieldDescriptor::new("OwnerId", "reference").references(["User"]);
        assert_eq!(classify_field(&owner), FieldClass::System);
        let id = FieldDescriptor::new("Id", "id").read_only();
        assert_eq!(classify_field(&id), FieldClass::System);
    }

    #[test]
    fn test_read_only_excluded() {
        let f = FieldDescriptor::new("Formula__c", "currency").read_only();
        assert_eq!(classify_field(&f), FieldClass::ReadOnly);
    }

    #[test]
    fn test_reference_target() {
        let f = FieldDescriptor::new("AccountId", "reference").references(["Account"]);
        assert_eq!(
            classify_field(&f),
            FieldClass::Reference {
                target: Some("Account".to_string())
            }
        );
    }

    #[test]
    fn test_generated_and_unsupported() {
        let f = FieldDescriptor::new("StageName", "picklist");
        assert_eq!(classify_field(&f), FieldClass::Generated(FieldType::Picklist));
        let f = FieldDescriptor::new("Secret__c", "encryptedstring");
        assert_eq!(
            classify_field(&f),
            FieldClass::Unsupported("encryptedstring".to_string())
        );
    }

    #[test]
    fn test_enumeration_pool_fallback() {
        let f = FieldDescriptor::new("Type", "picklist");
        assert_eq!(enumeration_pool(&f), vec!["None".to_string()]);
        let f = f.with_picklist(["A", "B"]);
        assert_eq!(enumeration_pool(&f), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_constant_override() {
        assert_eq!(constant_override("IsDeleted"), Some(&["False"][..]));
        assert_eq!(constant_override("Name"), None);
    }

    #[test]
    fn test_class_display() {
        let class = FieldClass::Reference {
            target: Some("Account".into()),
        };
        assert_eq!(class.to_string(), "reference -> Account");
        assert_eq!(FieldClass::Generated(FieldType::MultiPicklist).to_string(), "multipicklist");
    }
}

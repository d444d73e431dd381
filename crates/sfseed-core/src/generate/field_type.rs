use std::fmt;
use std::str::FromStr;

use crate::error::SfSeedError;

/// The closed set of semantic field types the engine can generate.
///
/// Names match the Salesforce describe `type` tags and are parsed
/// case-insensitively. `reference` is deliberately absent: reference fields are
/// rewritten to [`FieldType::Picklist`] over an identifier pool before they
/// reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Address,
    AnyType,
    Boolean,
    Base64,
    Combobox,
    Currency,
    Date,
    DateTime,
    Double,
    Email,
    Id,
    Int,
    Location,
    MultiPicklist,
    Percent,
    Phone,
    Picklist,
    String,
    TextArea,
    Time,
    Url,
}

impl FieldType {
    /// Every supported type, in registry order.
    pub const ALL: [FieldType; 21] = [
        FieldType::Address,
        FieldType::AnyType,
        FieldType::Boolean,
        FieldType::Base64,
        FieldType::Combobox,
        FieldType::Currency,
        FieldType::Date,
        FieldType::DateTime,
        FieldType::Double,
        FieldType::Email,
        FieldType::Id,
        FieldType::Int,
        FieldType::Location,
        FieldType::MultiPicklist,
        FieldType::Percent,
        FieldType::Phone,
        FieldType::Picklist,
        FieldType::String,
        FieldType::TextArea,
        FieldType::Time,
        FieldType::Url,
    ];

    /// The lowercase registry name of this type.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Address => "address",
            FieldType::AnyType => "anytype",
            FieldType::Boolean => "boolean",
            FieldType::Base64 => "base64",
            FieldType::Combobox => "combobox",
            FieldType::Currency => "currency",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Double => "double",
            FieldType::Email => "email",
            FieldType::Id => "id",
            FieldType::Int => "int",
            FieldType::Location => "location",
            FieldType::MultiPicklist => "multipicklist",
            FieldType::Percent => "percent",
            FieldType::Phone => "phone",
            FieldType::Picklist => "picklist",
            FieldType::String => "string",
            FieldType::TextArea => "textarea",
            FieldType::Time => "time",
            FieldType::Url => "url",
        }
    }

    /// Enumeration-style types that draw from a configured pool.
    pub fn is_enumerated(self) -> bool {
        matches!(
            self,
            FieldType::Picklist | FieldType::MultiPicklist | FieldType::Combobox
        )
    }

    /// Comma-separated list of supported names, for error messages.
    pub fn supported_names() -> String {
        FieldType::ALL
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = SfSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| {
                SfSeedError::invalid(format!(
                    "'{}' is not a supported field type, select from [{}]",
                    s,
                    FieldType::supported_names()
                ))
            })
    }
}

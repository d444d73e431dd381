use serde::{Deserialize, Serialize};

/// Describe type tag marking a foreign-key style field.
pub const REFERENCE_TYPE: &str = "reference";

/// Metadata for one field of an object, as reported by the schema source.
///
/// `field_type` is kept as the raw describe tag (e.g. `"picklist"`,
/// `"reference"`, `"encryptedstring"`) because the source may report types the
/// generator engine does not support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: String,
    pub nillable: bool,
    pub createable: bool,
    pub reference_to: Vec<String>,
    pub picklist_values: Vec<String>,
}

impl FieldDescriptor {
    /// A nillable, createable field with no references or picklist labels.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            nillable: true,
            createable: true,
            reference_to: Vec::new(),
            picklist_values: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.nillable = false;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.createable = false;
        self
    }

    pub fn references<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_to = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_picklist<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.picklist_values = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_reference(&self) -> bool {
        self.field_type.eq_ignore_ascii_case(REFERENCE_TYPE)
    }

    /// The first declared reference target, if any.
    pub fn primary_target(&self) -> Option<&str> {
        self.reference_to.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_flags() {
        let f = FieldDescriptor::new("AccountId", "Reference")
            .required()
            .references(["Account", "Contact"]);
        assert!(f.is_reference());
        assert!(!f.nillable);
        assert!(f.createable);
        assert_eq!(f.primary_target(), Some("Account"));
    }

    #[test]
    fn test_no_target() {
        assert_eq!(FieldDescriptor::new("X", "reference").primary_target(), None);
    }
}

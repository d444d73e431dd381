//! # Error Types
//!
//! Defines `SfSeedError`, the unified error enum for every failure mode in
//! the sfseed pipeline. Variants carry the object, field and operation involved
//! so a failed run can be traced back to the schema without digging through logs.

use thiserror::Error;

/// All errors that can occur in sfseed operations.
#[derive(Error, Debug)]
pub enum SfSeedError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Cannot resolve reference {object}.{field} -> {target}: no identifiers available\n  The field is required, so rows cannot be generated without a valid {target} id.\n  Create at least one {target} record, or map it in the default-id table:\n  object,id\n  {target},<18-character id>")]
    UnresolvedReference {
        object: String,
        field: String,
        target: String,
    },

    #[error("Salesforce {operation} failed: {message}")]
    Upstream { operation: String, message: String },

    #[error("Salesforce login failed: {message}")]
    Auth { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Output error: {message}: {source}")]
    Output {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {message}: {source}")]
    Csv {
        message: String,
        #[source]
        source: csv::Error,
    },

    #[error("XLSX error: {message}: {source}")]
    Xlsx {
        message: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

impl SfSeedError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SfSeedError::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn upstream(operation: impl Into<String>, message: impl Into<String>) -> Self {
        SfSeedError::Upstream {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SfSeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_reference_names_field_and_object() {
        let err = SfSeedError::UnresolvedReference {
            object: "Opportunity".to_string(),
            field: "AccountId".to_string(),
            target: "Account".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Opportunity.AccountId"));
        assert!(msg.contains("Account"));
    }

    #[test]
    fn test_upstream_message() {
        let err = SfSeedError::upstream("describe Account", "HTTP 404");
        assert_eq!(err.to_string(), "Salesforce describe Account failed: HTTP 404");
    }
}

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use sfseed_core::schema::types::FieldDescriptor;
use sfseed_core::schema::{RecordSource, SchemaSource};
use sfseed_core::{Result, SfSeedError};

/// In-memory stand-in for a Salesforce org.
///
/// Describe results are fixed per object. Identifier queries pop from a
/// per-object queue, so a test can make a second query for the same object
/// return something different and prove it never happened.
#[derive(Debug, Default)]
pub struct MockSalesforce {
    objects: HashMap<String, Vec<FieldDescriptor>>,
    describe_errors: HashMap<String, String>,
    query_errors: HashMap<String, String>,
    records: Mutex<HashMap<String, VecDeque<Vec<String>>>>,
    describe_calls: AtomicUsize,
    query_calls: Mutex<Vec<(String, usize)>>,
}

impl MockSalesforce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, name: &str, fields: Vec<FieldDescriptor>) -> Self {
        self.objects.insert(name.to_string(), fields);
        self
    }

    /// Make `describe(name)` fail with an upstream error.
    pub fn with_describe_error(mut self, name: &str, message: &str) -> Self {
        self.describe_errors
            .insert(name.to_string(), message.to_string());
        self
    }

    /// Make `query_identifiers(name, _)` fail with an upstream error.
    pub fn with_query_error(mut self, name: &str, message: &str) -> Self {
        self.query_errors.insert(name.to_string(), message.to_string());
        self
    }

    /// Queue one query response for `name`. Responses are served in order;
    /// once the queue is drained the object has no records.
    pub fn with_records<I, S>(self, name: &str, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.records
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    /// Every `(object, limit)` pair passed to `query_identifiers`.
    pub fn query_calls(&self) -> Vec<(String, usize)> {
        self.query_calls.lock().unwrap().clone()
    }

    pub fn query_count(&self, name: &str) -> usize {
        self.query_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(object, _)| object == name)
            .count()
    }
}

impl SchemaSource for MockSalesforce {
    async fn describe(&self, object_name: &str) -> Result<Vec<FieldDescriptor>> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.describe_errors.get(object_name) {
            return Err(upstream("describe", object_name, message));
        }
        self.objects
            .get(object_name)
            .cloned()
            .ok_or_else(|| upstream("describe", object_name, "HTTP 404 Not Found: NOT_FOUND"))
    }
}

impl RecordSource for MockSalesforce {
    async fn query_identifiers(&self, object_name: &str, limit: usize) -> Result<Vec<String>> {
        self.query_calls
            .lock()
            .unwrap()
            .push((object_name.to_string(), limit));
        if let Some(message) = self.query_errors.get(object_name) {
            return Err(upstream("query", object_name, message));
        }
        let mut ids = self
            .records
            .lock()
            .unwrap()
            .get_mut(object_name)
            .and_then(VecDeque::pop_front)
            .unwrap_or_default();
        ids.truncate(limit);
        Ok(ids)
    }
}

fn upstream(operation: &str, object_name: &str, message: &str) -> SfSeedError {
    SfSeedError::Upstream {
        operation: format!("{} {}", operation, object_name),
        message: message.to_string(),
    }
}

/// Audit fields every object carries; all are skipped during generation.
pub fn system_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("Id", "id").required().read_only(),
        FieldDescriptor::new("IsDeleted", "boolean").required().read_only(),
        FieldDescriptor::new("CreatedDate", "datetime").required().read_only(),
        FieldDescriptor::new("CreatedById", "reference")
            .required()
            .read_only()
            .references(["User"]),
        FieldDescriptor::new("LastModifiedDate", "datetime").required().read_only(),
        FieldDescriptor::new("SystemModstamp", "datetime").required().read_only(),
        FieldDescriptor::new("OwnerId", "reference")
            .required()
            .references(["User", "Group"]),
    ]
}

/// A small Opportunity: a required two-value picklist, a required
/// reference to Account, and a few optional scalars.
pub fn opportunity_fields() -> Vec<FieldDescriptor> {
    let mut fields = system_fields();
    fields.extend([
        FieldDescriptor::new("Name", "string").required(),
        FieldDescriptor::new("Status", "picklist")
            .required()
            .with_picklist(["Open", "Closed"]),
        FieldDescriptor::new("AccountId", "reference")
            .required()
            .references(["Account"]),
        FieldDescriptor::new("Amount", "currency"),
        FieldDescriptor::new("Probability", "percent"),
        FieldDescriptor::new("CloseDate", "date").required(),
        FieldDescriptor::new("ExpectedRevenue", "currency").read_only(),
    ]);
    fields
}

/// Account with an optional self-reference and a nillable picklist.
pub fn account_fields() -> Vec<FieldDescriptor> {
    let mut fields = system_fields();
    fields.extend([
        FieldDescriptor::new("Name", "string").required(),
        FieldDescriptor::new("Industry", "picklist").with_picklist(["Energy", "Banking"]),
        FieldDescriptor::new("ParentId", "reference").references(["Account"]),
        FieldDescriptor::new("Website", "url"),
        FieldDescriptor::new("Phone", "phone"),
        FieldDescriptor::new("NumberOfEmployees", "int"),
    ]);
    fields
}

/// Case carries a type the engine cannot generate and a required lookup to
/// Contact.
pub fn case_fields() -> Vec<FieldDescriptor> {
    let mut fields = system_fields();
    fields.extend([
        FieldDescriptor::new("Subject", "string"),
        FieldDescriptor::new("Origin", "picklist").required(),
        FieldDescriptor::new("ContactId", "reference")
            .required()
            .references(["Contact"]),
        FieldDescriptor::new("SecretCode__c", "encryptedstring"),
    ]);
    fields
}

/// An org with Opportunity, Account and Case described and no records.
pub fn mock_org() -> MockSalesforce {
    MockSalesforce::new()
        .with_object("Opportunity", opportunity_fields())
        .with_object("Account", account_fields())
        .with_object("Case", case_fields())
}

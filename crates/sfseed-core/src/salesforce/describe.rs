//! Wire shapes for the REST describe and query endpoints.

use serde::Deserialize;

use crate::schema::types::FieldDescriptor;

#[derive(Debug, Deserialize)]
pub(crate) struct DescribeResponse {
    pub fields: Vec<DescribeField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DescribeField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub nillable: bool,
    pub createable: bool,
    #[serde(default)]
    pub reference_to: Vec<String>,
    #[serde(default)]
    pub picklist_values: Vec<PicklistEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PicklistEntry {
    pub label: Option<String>,
    pub value: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl From<DescribeField> for FieldDescriptor {
    fn from(field: DescribeField) -> Self {
        let picklist_values = field
            .picklist_values
            .into_iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.label.unwrap_or(entry.value))
            .collect();
        FieldDescriptor {
            name: field.name,
            field_type: field.field_type,
            nillable: field.nillable,
            createable: field.createable,
            reference_to: field.reference_to,
            picklist_values,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryResponse {
    pub records: Vec<IdRecord>,
    #[serde(default)]
    pub next_records_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdRecord {
    #[serde(rename = "Id")]
    pub id: String,
}

/// Parse a describe response body into field descriptors.
pub(crate) fn parse_describe(body: &str) -> serde_json::Result<Vec<FieldDescriptor>> {
    let parsed: DescribeResponse = serde_json::from_str(body)?;
    Ok(parsed.fields.into_iter().map(FieldDescriptor::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPPORTUNITY_DESCRIBE: &str = r#"{
        "name": "Opportunity",
        "fields": [
            {"name": "Id", "type": "id", "nillable": false, "createable": false,
             "referenceTo": [], "picklistValues": []},
            {"name": "AccountId", "type": "reference", "nillable": true, "createable": true,
             "referenceTo": ["Account"], "picklistValues": []},
            {"name": "StageName", "type": "picklist", "nillable": false, "createable": true,
             "referenceTo": [],
             "picklistValues": [
                {"active": true, "label": "Prospecting", "value": "Prospecting"},
                {"active": false, "label": "Legacy", "value": "Legacy"},
                {"active": true, "label": null, "value": "Closed Won"}
             ]},
            {"name": "Amount", "type": "currency", "nillable": true, "createable": true}
        ]
    }"#;

    #[test]
    fn test_parse_describe() {
        let fields = parse_describe(OPPORTUNITY_DESCRIBE).unwrap();
        assert_eq!(fields.len(), 4);

        assert!(!fields[0].createable);
        assert_eq!(fields[1].reference_to, vec!["Account".to_string()]);
        assert!(fields[1].is_reference());
        assert_eq!(
            fields[2].picklist_values,
            vec!["Prospecting".to_string(), "Closed Won".to_string()]
        );
        assert_eq!(fields[3].field_type, "currency");
        assert!(fields[3].reference_to.is_empty());
    }

    #[test]
    fn test_parse_query() {
        let body = r#"{"totalSize": 2, "done": true, "records": [
            {"attributes": {"type": "Account", "url": "/x"}, "Id": "001A"},
            {"attributes": {"type": "Account", "url": "/y"}, "Id": "001B"}
        ]}"#;
        let parsed: QueryResponse = serde_json::from_str(body).unwrap();
        let ids: Vec<_> = parsed.records.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["001A", "001B"]);
        assert!(parsed.next_records_url.is_none());
    }
}

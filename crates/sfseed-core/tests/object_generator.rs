//! Object-level generation against an in-memory org.

use std::collections::{BTreeMap, HashMap};

use sfseed_core::generate::Value;
use sfseed_core::schema::types::FieldDescriptor;
use sfseed_core::{DefaultIds, GenerateOptions, Generator, ObjectGenerator, SfSeedError};
use sfseed_testutil::{mock_org, opportunity_fields, MockSalesforce};

const ACCOUNT_ID: &str = "001xx000003DGb2AAC";

/// Fixed base time for deterministic tests.
fn fixed_base_time() -> chrono::NaiveDateTime {
    chrono::NaiveDateTime::new(
        chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
    )
}

fn object_generator(org: MockSalesforce, seed: u64) -> ObjectGenerator<MockSalesforce> {
    ObjectGenerator::new(org, Generator::new(seed).with_base_time(fixed_base_time()))
}

fn default_account() -> DefaultIds {
    let mut map = HashMap::new();
    map.insert("Account".to_string(), ACCOUNT_ID.to_string());
    DefaultIds::from_map(map)
}

fn strings(values: &[Value]) -> Vec<&str> {
    values
        .iter()
        .map(|v| v.as_str().expect("string value"))
        .collect()
}

#[tokio::test]
async fn test_opportunity_with_default_account() {
    let mut og = object_generator(mock_org(), 7).with_default_ids(default_account());

    let table = og
        .generate_table_for_object("Opportunity", 5, true)
        .await
        .unwrap();

    assert_eq!(table.row_count(), 5);
    assert_eq!(
        table.column_names().collect::<Vec<_>>(),
        vec!["Name", "Status", "AccountId", "Amount", "Probability", "CloseDate"]
    );

    for status in strings(table.column("Status").unwrap()) {
        assert!(status == "Open" || status == "Closed", "got {}", status);
    }
    for account in strings(table.column("AccountId").unwrap()) {
        assert_eq!(account, ACCOUNT_ID);
    }
    for probability in table.column("Probability").unwrap() {
        let p = probability.as_float().unwrap();
        assert!((0.0..=100.0).contains(&p));
    }
    assert!(table
        .column("CloseDate")
        .unwrap()
        .iter()
        .all(|v| matches!(v, Value::Date(_))));

    assert_eq!(og.client().query_count("Account"), 0);
}

#[tokio::test]
async fn test_identifier_pool_is_cached() {
    let org = mock_org()
        .with_records("Account", ["001000000000001AAA", "001000000000002AAA"])
        .with_records("Account", ["001000000000009ZZZ"]);
    let mut og = object_generator(org, 11);

    let first = og
        .generate_table_for_object("Opportunity", 20, true)
        .await
        .unwrap();
    let second = og
        .generate_table_for_object("Opportunity", 20, true)
        .await
        .unwrap();

    for table in [&first, &second] {
        for id in strings(table.column("AccountId").unwrap()) {
            assert!(id == "001000000000001AAA" || id == "001000000000002AAA");
        }
    }
    assert_eq!(og.client().query_count("Account"), 1);
    assert_eq!(og.client().describe_calls(), 2);

    let pool = og.resolve_identifier_pool("Account").await.unwrap().unwrap();
    assert_eq!(pool.len(), 2);
    assert_eq!(og.client().query_count("Account"), 1);
}

#[tokio::test]
async fn test_sample_size_is_query_limit() {
    let org = mock_org().with_records("Account", ["001000000000001AAA"]);
    let options = GenerateOptions {
        sample_size: 7,
        ..GenerateOptions::default()
    };
    let mut og = object_generator(org, 1).with_options(options);

    og.generate_table_for_object("Opportunity", 1, true)
        .await
        .unwrap();
    assert_eq!(og.client().query_calls(), vec![("Account".to_string(), 7)]);
}

#[tokio::test]
async fn test_unresolved_reference_names_field() {
    let mut og = object_generator(mock_org(), 3);

    let err = og
        .generate_table_for_object("Opportunity", 5, true)
        .await
        .unwrap_err();
    match &err {
        SfSeedError::UnresolvedReference {
            object,
            field,
            target,
        } => {
            assert_eq!(object, "Opportunity");
            assert_eq!(field, "AccountId");
            assert_eq!(target, "Account");
        }
        other => panic!("expected UnresolvedReference, got {:?}", other),
    }
    assert!(err.to_string().contains("Opportunity.AccountId"));

    // The empty pool is remembered; no second query.
    assert!(og
        .generate_table_for_object("Opportunity", 5, true)
        .await
        .is_err());
    assert_eq!(og.client().query_count("Account"), 1);
    assert!(og.resolve_identifier_pool("Account").await.unwrap().is_none());
}

#[tokio::test]
async fn test_references_excluded() {
    let mut og = object_generator(mock_org(), 5);

    let table = og
        .generate_table_for_object("Opportunity", 3, false)
        .await
        .unwrap();
    assert!(table.column("AccountId").is_none());
    assert!(og.client().query_calls().is_empty());
}

#[tokio::test]
async fn test_nillable_reference_left_out() {
    let mut og = object_generator(mock_org(), 5);

    let table = og
        .generate_table_for_object("Account", 4, true)
        .await
        .unwrap();
    assert!(table.column("ParentId").is_none());
    assert!(table.column("Industry").unwrap().iter().all(Value::is_null));
    assert!(og.client().query_calls().is_empty());
}

#[tokio::test]
async fn test_zero_rows_rejected_before_describe() {
    let mut og = object_generator(mock_org(), 1);

    let err = og
        .generate_table_for_object("Opportunity", 0, true)
        .await
        .unwrap_err();
    assert!(matches!(err, SfSeedError::InvalidArgument { .. }));
    assert_eq!(og.client().describe_calls(), 0);
}

#[tokio::test]
async fn test_describe_failure_propagates() {
    let org = MockSalesforce::new().with_describe_error("Lead", "HTTP 403 Forbidden");
    let mut og = object_generator(org, 1);

    let err = og.generate_table_for_object("Lead", 2, true).await.unwrap_err();
    match err {
        SfSeedError::Upstream { operation, message } => {
            assert_eq!(operation, "describe Lead");
            assert!(message.contains("403"));
        }
        other => panic!("expected Upstream, got {:?}", other),
    }
}

#[tokio::test]
async fn test_query_failure_is_not_cached() {
    let org = mock_org().with_query_error("Account", "HTTP 500");
    let mut og = object_generator(org, 1);

    for _ in 0..2 {
        let err = og
            .generate_table_for_object("Opportunity", 2, true)
            .await
            .unwrap_err();
        assert!(matches!(err, SfSeedError::Upstream { .. }));
    }
    assert_eq!(og.client().query_count("Account"), 2);
    assert!(og.cache().get("Account").is_none());
}

#[tokio::test]
async fn test_unsupported_type_fails() {
    let org = mock_org().with_records("Contact", ["003000000000001AAA"]);
    let mut og = object_generator(org, 1);

    let err = og.generate_table_for_object("Case", 2, true).await.unwrap_err();
    assert!(matches!(err, SfSeedError::InvalidArgument { .. }));
    let msg = err.to_string();
    assert!(msg.contains("SecretCode__c"));
    assert!(msg.contains("encryptedstring"));
    assert!(msg.contains("picklist"));
}

#[tokio::test]
async fn test_unsupported_type_skipped() {
    let org = mock_org().with_records("Contact", ["003000000000001AAA"]);
    let options = GenerateOptions {
        skip_unsupported: true,
        ..GenerateOptions::default()
    };
    let mut og = object_generator(org, 1).with_options(options);

    let table = og.generate_table_for_object("Case", 3, true).await.unwrap();
    assert!(table.column("SecretCode__c").is_none());
    assert_eq!(strings(table.column("Origin").unwrap()), vec!["None"; 3]);
    assert_eq!(
        strings(table.column("ContactId").unwrap()),
        vec!["003000000000001AAA"; 3]
    );
}

#[tokio::test]
async fn test_field_overrides() {
    let mut fields = opportunity_fields();
    fields.push(FieldDescriptor::new("IsDeleted", "boolean").required());
    fields.retain(|f| !(f.name == "IsDeleted" && !f.createable));
    let org = MockSalesforce::new().with_object("Opportunity", fields);

    let mut overrides = BTreeMap::new();
    overrides.insert("Opportunity.Status".to_string(), vec!["Won".to_string()]);
    overrides.insert("Account.Status".to_string(), vec!["Ignored".to_string()]);
    let options = GenerateOptions {
        field_overrides: overrides,
        ..GenerateOptions::default()
    };
    let mut og = object_generator(org, 9)
        .with_default_ids(default_account())
        .with_options(options);

    let table = og
        .generate_table_for_object("Opportunity", 4, true)
        .await
        .unwrap();
    assert_eq!(strings(table.column("Status").unwrap()), vec!["Won"; 4]);
    assert_eq!(strings(table.column("IsDeleted").unwrap()), vec!["False"; 4]);
}

#[tokio::test]
async fn test_same_seed_same_table() {
    let mut a = object_generator(mock_org(), 42).with_default_ids(default_account());
    let mut b = object_generator(mock_org(), 42).with_default_ids(default_account());

    let left = a.generate_table_for_object("Opportunity", 10, true).await.unwrap();
    let right = b.generate_table_for_object("Opportunity", 10, true).await.unwrap();
    assert_eq!(left, right);
}

//! Live tests against a commercetools project.
//!
//! These tests require `CTP_PROJECT_KEY`, `CTP_CLIENT_ID` and
//! `CTP_CLIENT_SECRET` for an API client with `manage_project` scope.
//!
//! Run with: cargo test -p commerce-discounts-integration-tests -- --ignored

use commerce_discounts_core::LocalizedString;
use commerce_discounts_provider::resource::ValueBlock;
use commerce_discounts_provider::{
    CommercetoolsClient, ProductDiscountConfig, ProductDiscountResource, ProviderConfig,
};

#[tokio::test]
#[ignore = "Requires commercetools credentials"]
async fn test_live_product_discount_lifecycle() {
    let config = ProviderConfig::from_env().expect("CTP_* variables must be set");
    let client = CommercetoolsClient::new(config).expect("Failed to build client");
    let resource = ProductDiscountResource::new(client);

    let key = format!("ctd-it-{}", uuid::Uuid::new_v4().simple());
    let desired = ProductDiscountConfig {
        name: LocalizedString::new().with("en", "Integration test discount"),
        key: Some(key.clone()),
        sort_order: Some(format!("0.{}1", sort_order_digits(&key))),
        valid_from: Some("2030-01-01".to_string()),
        value: vec![ValueBlock::relative(100)],
        ..ProductDiscountConfig::default()
    };

    let mut state = resource.create(&desired).await.expect("create failed");
    assert_eq!(state.attributes.valid_from.as_deref(), Some("2030-01-01"));
    assert_eq!(state.attributes.key.as_deref(), Some(key.as_str()));

    let updated = ProductDiscountConfig {
        valid_from: None,
        ..desired
    };
    resource
        .update(&mut state, &updated)
        .await
        .expect("update failed");
    assert_eq!(state.attributes.valid_from, None);

    resource.delete(&mut state).await.expect("delete failed");
    assert!(!state.exists());
}

/// Sort orders are unique per project, so derive them from the random key.
fn sort_order_digits(key: &str) -> String {
    key.bytes()
        .filter(u8::is_ascii_digit)
        .map(char::from)
        .take(7)
        .collect()
}

//! Integration tests for the product discount resource lifecycle.
//!
//! These run the resource adapter against the in-memory API and check the
//! requests it sends along with the state it keeps.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use commerce_discounts_core::{
    LocalizedString, ProductDiscountUpdateAction, ProductDiscountValue,
};
use commerce_discounts_integration_tests::{InMemoryApi, Request};
use commerce_discounts_provider::resource::{MoneyBlock, ValueBlock};
use commerce_discounts_provider::{
    Plan, ProductDiscountConfig, ProductDiscountResource, ProviderError, ResourceData, resource,
};

fn setup() -> (Arc<InMemoryApi>, ProductDiscountResource<Arc<InMemoryApi>>) {
    let api = Arc::new(InMemoryApi::new());
    (Arc::clone(&api), ProductDiscountResource::new(api))
}

fn summer_sale() -> ProductDiscountConfig {
    ProductDiscountConfig {
        name: LocalizedString::new()
            .with("en", "Summer sale")
            .with("de-DE", "Sommerschlussverkauf"),
        key: Some("summer-sale".to_string()),
        description: Some(LocalizedString::new().with("en", "Ten percent off everything")),
        sort_order: Some("0.7".to_string()),
        valid_from: Some("2024-06-01".to_string()),
        valid_until: Some("2024-08-31".to_string()),
        value: vec![ValueBlock::relative(1000)],
        ..ProductDiscountConfig::default()
    }
}

// =============================================================================
// Create / Read
// =============================================================================

#[tokio::test]
async fn test_create_stores_identity_and_normalized_state() {
    let (api, resource) = setup();
    let config = summer_sale();

    let state = resource.create(&config).await.unwrap();

    let id = state.id.clone().unwrap();
    assert_eq!(state.version, 1);
    assert_eq!(state.attributes, config);

    // Create is followed by a read of the new discount
    let requests = api.requests().await;
    assert_eq!(requests.len(), 2);
    assert!(matches!(requests[0], Request::Create(_)));
    assert_eq!(requests[1], Request::Get(id.clone()));

    let stored = api.stored(&id).await.unwrap();
    assert_eq!(
        stored.valid_from.unwrap().to_rfc3339(),
        "2024-06-01T00:00:00+00:00"
    );
    assert_eq!(stored.value, ProductDiscountValue::Relative { permyriad: 1000 });
}

#[tokio::test]
async fn test_create_sends_draft_with_defaults() {
    let (api, resource) = setup();
    let config = ProductDiscountConfig {
        name: LocalizedString::new().with("en", "External"),
        value: vec![ValueBlock::external()],
        ..ProductDiscountConfig::default()
    };

    resource.create(&config).await.unwrap();

    let Request::Create(draft) = &api.requests().await[0] else {
        panic!("first request should be a create");
    };
    assert_eq!(draft.predicate, "1=1");
    assert!(!draft.is_active);
    assert_eq!(draft.key, None);
    assert_eq!(draft.valid_from, None);
    assert_eq!(draft.value, ProductDiscountValue::External);
}

#[tokio::test]
async fn test_absolute_value_round_trips_through_api() {
    let (_api, resource) = setup();
    let config = ProductDiscountConfig {
        value: vec![ValueBlock::absolute(vec![MoneyBlock::new(500, "EUR")])],
        ..summer_sale()
    };

    let state = resource.create(&config).await.unwrap();

    assert_eq!(
        state.attributes.value,
        vec![ValueBlock::absolute(vec![MoneyBlock::new(500, "EUR")])]
    );
}

#[tokio::test]
async fn test_read_picks_up_remote_changes() {
    let (api, resource) = setup();
    let mut state = resource.create(&summer_sale()).await.unwrap();
    let id = state.id.clone().unwrap();

    api.modify(&id, |d| {
        d.is_active = true;
        d.valid_until = None;
    })
    .await;

    resource.read(&mut state).await.unwrap();
    assert_eq!(state.version, 2);
    assert!(state.attributes.is_active);
    assert_eq!(state.attributes.valid_until, None);
}

#[tokio::test]
async fn test_read_of_deleted_discount_clears_identity() {
    let (api, resource) = setup();
    let mut state = resource.create(&summer_sale()).await.unwrap();
    api.remove(state.id.as_ref().unwrap()).await;

    resource.read(&mut state).await.unwrap();

    assert!(!state.exists());
    assert_eq!(resource::plan(Some(&state), &summer_sale()), Plan::Create);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_is_active_change_submits_one_action() {
    let (api, resource) = setup();
    let mut state = resource.create(&summer_sale()).await.unwrap();

    let desired = ProductDiscountConfig {
        is_active: true,
        ..summer_sale()
    };
    resource.update(&mut state, &desired).await.unwrap();

    assert_eq!(
        api.submitted_actions().await,
        vec![vec![ProductDiscountUpdateAction::ChangeIsActive {
            is_active: true
        }]]
    );
    assert_eq!(state.version, 2);
    assert!(state.attributes.is_active);
}

#[tokio::test]
async fn test_update_submits_all_changes_in_one_request() {
    let (api, resource) = setup();
    let mut state = resource.create(&summer_sale()).await.unwrap();

    let desired = ProductDiscountConfig {
        name: LocalizedString::new().with("en", "Late summer sale"),
        key: None,
        description: None,
        predicate: "categories.id = \"c-1\"".to_string(),
        sort_order: Some("0.8".to_string()),
        valid_from: None,
        valid_until: Some("2024-09-15".to_string()),
        value: vec![ValueBlock::absolute(vec![
            MoneyBlock::new(500, "EUR"),
            MoneyBlock::new(550, "USD"),
        ])],
        is_active: true,
        unknown: resource::data::UnknownAttributes::new(),
    };
    resource.update(&mut state, &desired).await.unwrap();

    let submitted = api.submitted_actions().await;
    assert_eq!(submitted.len(), 1);
    let names: Vec<_> = submitted[0]
        .iter()
        .map(ProductDiscountUpdateAction::name)
        .collect();
    assert_eq!(
        names,
        vec![
            "setKey",
            "changeIsActive",
            "changePredicate",
            "changeSortOrder",
            "setValidFrom",
            "setValidUntil",
            "changeName",
            "setDescription",
            "changeValue",
        ]
    );

    assert_eq!(state.version, 2);
    assert_eq!(state.attributes, desired);
}

#[tokio::test]
async fn test_update_without_changes_sends_nothing() {
    let (api, resource) = setup();
    let mut state = resource.create(&summer_sale()).await.unwrap();

    resource.update(&mut state, &summer_sale()).await.unwrap();

    assert!(api.submitted_actions().await.is_empty());
    assert_eq!(state.version, 1);
}

#[tokio::test]
async fn test_stale_version_is_rejected_with_conflict() {
    let (api, resource) = setup();
    let mut state = resource.create(&summer_sale()).await.unwrap();
    api.modify(state.id.as_ref().unwrap(), |d| d.predicate = "1=2".to_string())
        .await;

    let desired = ProductDiscountConfig {
        is_active: true,
        ..summer_sale()
    };
    let err = resource.update(&mut state, &desired).await.unwrap_err();

    assert_eq!(err.status_code(), Some(409));
    let ProviderError::Client(client_err) = &err else {
        panic!("expected client error, got {err:?}");
    };
    let extras = client_err.response().unwrap().format_extras();
    assert!(extras.contains("currentVersion=2"), "{extras}");

    // State is untouched so the caller can refresh and retry
    assert_eq!(state.version, 1);
    assert!(!state.attributes.is_active);
}

#[tokio::test]
async fn test_invalid_date_aborts_update_before_request() {
    let (api, resource) = setup();
    let mut state = resource.create(&summer_sale()).await.unwrap();

    let desired = ProductDiscountConfig {
        valid_from: Some("June 1st".to_string()),
        ..summer_sale()
    };
    let err = resource.update(&mut state, &desired).await.unwrap_err();

    assert!(matches!(err, ProviderError::Validation(_)));
    assert!(api.submitted_actions().await.is_empty());
}

#[tokio::test]
async fn test_unknown_value_type_never_reaches_the_api() {
    let (api, resource) = setup();
    let config = ProductDiscountConfig {
        value: vec![ValueBlock {
            value_type: "buy-one-get-one".to_string(),
            ..ValueBlock::default()
        }],
        ..summer_sale()
    };

    let err = resource.create(&config).await.unwrap_err();

    let ProviderError::Validation(diagnostics) = err else {
        panic!("expected validation error");
    };
    let summary = &diagnostics.errors().next().unwrap().summary;
    assert!(summary.contains("buy-one-get-one"));
    assert!(summary.contains("value.0.type"));
    assert!(api.requests().await.is_empty());
}

#[tokio::test]
async fn test_duplicate_key_is_reported() {
    let (_api, resource) = setup();
    resource.create(&summer_sale()).await.unwrap();

    let err = resource.create(&summer_sale()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(400));
}

// =============================================================================
// Delete / Import
// =============================================================================

#[tokio::test]
async fn test_delete_clears_identity() {
    let (api, resource) = setup();
    let mut state = resource.create(&summer_sale()).await.unwrap();
    let id = state.id.clone().unwrap();

    resource.delete(&mut state).await.unwrap();

    assert!(!state.exists());
    assert!(api.stored(&id).await.is_none());
    assert!(matches!(
        api.requests().await.last(),
        Some(Request::Delete { version: 1, .. })
    ));
}

#[tokio::test]
async fn test_delete_propagates_not_found() {
    let (api, resource) = setup();
    let mut state = resource.create(&summer_sale()).await.unwrap();
    api.remove(state.id.as_ref().unwrap()).await;

    let err = resource.delete(&mut state).await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert!(state.exists());
}

#[tokio::test]
async fn test_import_adopts_existing_discount() {
    let (_api, resource) = setup();
    let created = resource.create(&summer_sale()).await.unwrap();
    let id = created.id.clone().unwrap();

    let imported = resource.import(id.as_str()).await.unwrap();

    assert_eq!(imported.id, Some(id));
    assert_eq!(imported, created);
    assert_eq!(resource::plan(Some(&imported), &summer_sale()), Plan::NoChange);
}

#[tokio::test]
async fn test_import_unknown_id_fails() {
    let (_api, resource) = setup();

    let err = resource
        .import("00000000-0000-0000-0000-000000000000")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::ImportNotFound(_)));
}

// =============================================================================
// Full lifecycle
// =============================================================================

#[tokio::test]
async fn test_plan_apply_cycle() {
    let (_api, resource) = setup();
    let desired = summer_sale();

    assert_eq!(resource::plan(None, &desired), Plan::Create);
    let mut state: ResourceData = resource.create(&desired).await.unwrap();
    assert_eq!(resource::plan(Some(&state), &desired), Plan::NoChange);

    let desired = ProductDiscountConfig {
        predicate: "sku = \"SKU-42\"".to_string(),
        ..desired
    };
    let Plan::Update { changes } = resource::plan(Some(&state), &desired) else {
        panic!("expected an update plan");
    };
    assert_eq!(changes, vec![resource::ChangedField::Predicate]);

    resource.update(&mut state, &desired).await.unwrap();
    assert_eq!(resource::plan(Some(&state), &desired), Plan::NoChange);

    resource.delete(&mut state).await.unwrap();
    assert_eq!(resource::plan(Some(&state), &desired), Plan::Create);
}

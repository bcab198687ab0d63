//! Integration tests for Commerce Discounts.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline tests against the in-memory API
//! cargo test -p commerce-discounts-integration-tests
//!
//! # Live tests against a real project (needs CTP_* variables)
//! cargo test -p commerce-discounts-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `product_discount_lifecycle` - create / read / update / delete / import
//!   through the resource adapter
//! - `live_api` - the same lifecycle against commercetools
//!
//! [`InMemoryApi`] stands in for commercetools: it assigns IDs, bumps
//! versions, rejects stale versions with 409 and unknown IDs with 404, and
//! records every submitted action list.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use commerce_discounts_core::{
    ProductDiscount, ProductDiscountDraft, ProductDiscountId, ProductDiscountUpdateAction,
};
use commerce_discounts_provider::ProductDiscountApi;
use commerce_discounts_provider::client::{ClientError, ErrorResponse};
use tokio::sync::Mutex;

/// A request the fake received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Create(ProductDiscountDraft),
    Get(ProductDiscountId),
    Update {
        id: ProductDiscountId,
        version: i64,
        actions: Vec<ProductDiscountUpdateAction>,
    },
    Delete {
        id: ProductDiscountId,
        version: i64,
    },
}

#[derive(Default)]
struct Store {
    discounts: HashMap<ProductDiscountId, ProductDiscount>,
    requests: Vec<Request>,
}

/// In-memory product discount endpoint.
#[derive(Default)]
pub struct InMemoryApi {
    store: Mutex<Store>,
}

impl InMemoryApi {
    /// Create an empty API.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<Request> {
        self.store.lock().await.requests.clone()
    }

    /// Action lists of every update request, in order.
    pub async fn submitted_actions(&self) -> Vec<Vec<ProductDiscountUpdateAction>> {
        self.store
            .lock()
            .await
            .requests
            .iter()
            .filter_map(|r| match r {
                Request::Update { actions, .. } => Some(actions.clone()),
                _ => None,
            })
            .collect()
    }

    /// Current server-side copy of a discount.
    pub async fn stored(&self, id: &ProductDiscountId) -> Option<ProductDiscount> {
        self.store.lock().await.discounts.get(id).cloned()
    }

    /// Modify a discount behind the client's back, bumping its version.
    pub async fn modify(&self, id: &ProductDiscountId, f: impl FnOnce(&mut ProductDiscount)) {
        if let Some(discount) = self.store.lock().await.discounts.get_mut(id) {
            f(discount);
            discount.version += 1;
            discount.last_modified_at = Some(Utc::now());
        }
    }

    /// Remove a discount behind the client's back.
    pub async fn remove(&self, id: &ProductDiscountId) {
        self.store.lock().await.discounts.remove(id);
    }
}

fn not_found(id: &ProductDiscountId) -> ClientError {
    let message = format!("The Resource with ID '{id}' was not found.");
    ClientError::Api(ErrorResponse::new(404, &message).with_error("ResourceNotFound", message))
}

fn concurrent_modification(expected: i64, current: i64) -> ClientError {
    let message = format!("Object has a different version ({current}) than expected ({expected}).");
    let mut response =
        ErrorResponse::new(409, &message).with_error("ConcurrentModification", message);
    if let Some(error) = response.errors.first_mut() {
        error
            .extra
            .insert("currentVersion".to_string(), serde_json::json!(current));
    }
    ClientError::Api(response)
}

fn duplicate_key(key: &str) -> ClientError {
    let message = format!("A duplicate value '\"{key}\"' exists for field 'key'.");
    let mut response = ErrorResponse::new(400, &message).with_error("DuplicateField", message);
    if let Some(error) = response.errors.first_mut() {
        error
            .extra
            .insert("field".to_string(), serde_json::json!("key"));
    }
    ClientError::Api(response)
}

fn key_taken(store: &Store, key: Option<&str>, except: Option<&ProductDiscountId>) -> bool {
    key.is_some_and(|key| {
        store
            .discounts
            .values()
            .any(|d| d.key.as_deref() == Some(key) && Some(&d.id) != except)
    })
}

fn apply_action(discount: &mut ProductDiscount, action: &ProductDiscountUpdateAction) {
    match action.clone() {
        ProductDiscountUpdateAction::SetKey { key } => discount.key = key,
        ProductDiscountUpdateAction::ChangeIsActive { is_active } => discount.is_active = is_active,
        ProductDiscountUpdateAction::ChangePredicate { predicate } => {
            discount.predicate = predicate;
        }
        ProductDiscountUpdateAction::ChangeSortOrder { sort_order } => {
            discount.sort_order = Some(sort_order);
        }
        ProductDiscountUpdateAction::SetValidFrom { valid_from } => {
            discount.valid_from = valid_from;
        }
        ProductDiscountUpdateAction::SetValidUntil { valid_until } => {
            discount.valid_until = valid_until;
        }
        ProductDiscountUpdateAction::ChangeName { name } => discount.name = name,
        ProductDiscountUpdateAction::SetDescription { description } => {
            discount.description = description;
        }
        ProductDiscountUpdateAction::ChangeValue { value } => discount.value = value,
    }
}

#[async_trait]
impl ProductDiscountApi for InMemoryApi {
    async fn create(&self, draft: &ProductDiscountDraft) -> Result<ProductDiscount, ClientError> {
        let mut store = self.store.lock().await;
        store.requests.push(Request::Create(draft.clone()));

        if let Some(key) = draft.key.as_deref()
            && key_taken(&store, Some(key), None)
        {
            return Err(duplicate_key(key));
        }

        let id = ProductDiscountId::parse(&uuid::Uuid::new_v4().to_string())
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        let now = Utc::now();
        let discount = ProductDiscount {
            id: id.clone(),
            version: 1,
            created_at: Some(now),
            last_modified_at: Some(now),
            name: draft.name.clone(),
            key: draft.key.clone(),
            description: draft.description.clone(),
            value: draft.value.clone(),
            predicate: draft.predicate.clone(),
            sort_order: draft.sort_order.clone(),
            is_active: draft.is_active,
            references: Vec::new(),
            valid_from: draft.valid_from,
            valid_until: draft.valid_until,
        };

        store.discounts.insert(id, discount.clone());
        Ok(discount)
    }

    async fn get_by_id(&self, id: &ProductDiscountId) -> Result<ProductDiscount, ClientError> {
        let mut store = self.store.lock().await;
        store.requests.push(Request::Get(id.clone()));

        store.discounts.get(id).cloned().ok_or_else(|| not_found(id))
    }

    async fn update_by_id(
        &self,
        id: &ProductDiscountId,
        version: i64,
        actions: &[ProductDiscountUpdateAction],
    ) -> Result<ProductDiscount, ClientError> {
        let mut store = self.store.lock().await;
        store.requests.push(Request::Update {
            id: id.clone(),
            version,
            actions: actions.to_vec(),
        });

        let current = store.discounts.get(id).ok_or_else(|| not_found(id))?;
        if current.version != version {
            return Err(concurrent_modification(version, current.version));
        }

        let mut updated = current.clone();
        for action in actions {
            apply_action(&mut updated, action);
        }
        if key_taken(&store, updated.key.as_deref(), Some(id)) {
            return Err(duplicate_key(updated.key.as_deref().unwrap_or_default()));
        }

        updated.version += 1;
        updated.last_modified_at = Some(Utc::now());
        store.discounts.insert(id.clone(), updated.clone());
        Ok(updated)
    }

    async fn delete_by_id(
        &self,
        id: &ProductDiscountId,
        version: i64,
    ) -> Result<ProductDiscount, ClientError> {
        let mut store = self.store.lock().await;
        store.requests.push(Request::Delete {
            id: id.clone(),
            version,
        });

        let current = store.discounts.get(id).ok_or_else(|| not_found(id))?;
        if current.version != version {
            return Err(concurrent_modification(version, current.version));
        }

        store.discounts.remove(id).ok_or_else(|| not_found(id))
    }
}

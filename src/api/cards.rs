// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Virtual card operations.

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::client::VirtualCardsClient;
use crate::graphql::operations::{self, PaginatedRecords, SealedCardRecord};
use crate::graphql::{GatewayError, GraphQlOperation, GraphQlResponseError, RawResponse};
use crate::keys::KeyStoreError;
use crate::models::{ListFilters, PartialVirtualCard, ProvisionCardInput, UpdateCardInput, VirtualCard};
use crate::unsealing::{aggregate_page, unseal_single, ListApiResult, SingleApiResult};

use super::error::GraphQlErrorCode;

/// Error family for card operations.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("card not found")]
    NotFound,

    #[error("identity is not verified")]
    IdentityNotVerified,

    #[error("account is locked")]
    AccountLocked,

    #[error("card state does not permit this operation")]
    InvalidCardState,

    #[error("velocity limits exceeded")]
    VelocityExceeded,

    #[error("entitlements exceeded")]
    EntitlementExceeded,

    #[error("currency not supported")]
    UnsupportedCurrency,

    #[error("funding source is not active")]
    FundingSourceNotActive,

    /// No public key is enrolled; raised before any network call for
    /// operations that register sealed data against the client's key ring.
    #[error("no public key is enrolled for this client")]
    PublicKey,

    #[error("key store error: {0}")]
    KeyStore(#[from] KeyStoreError),

    #[error("access denied by the service")]
    Forbidden,

    /// HTTP-layer failure, distinct from domain errors.
    #[error("card request failed: {0}")]
    RequestFailed(#[source] GatewayError),

    /// Cooperative cancellation, passed through unmodified.
    #[error("operation cancelled")]
    Cancelled,

    #[error("service returned malformed data: {0}")]
    MalformedResponse(String),

    /// Unrecognized service error, carrying the raw tag and message.
    #[error("service error {error_type}: {message}")]
    Unknown { error_type: String, message: String },
}

impl From<GatewayError> for CardError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Cancelled => Self::Cancelled,
            GatewayError::Forbidden => Self::Forbidden,
            other => Self::RequestFailed(other),
        }
    }
}

impl CardError {
    fn from_graphql(error: &GraphQlResponseError) -> Self {
        match GraphQlErrorCode::parse(&error.error_type) {
            GraphQlErrorCode::CardNotFound => Self::NotFound,
            GraphQlErrorCode::IdentityNotVerified => Self::IdentityNotVerified,
            GraphQlErrorCode::AccountLocked => Self::AccountLocked,
            GraphQlErrorCode::CardState => Self::InvalidCardState,
            GraphQlErrorCode::VelocityExceeded => Self::VelocityExceeded,
            GraphQlErrorCode::EntitlementExceeded => Self::EntitlementExceeded,
            GraphQlErrorCode::UnsupportedCurrency => Self::UnsupportedCurrency,
            GraphQlErrorCode::FundingSourceNotActive => Self::FundingSourceNotActive,
            _ => Self::Unknown {
                error_type: error.error_type.clone(),
                message: error.message.clone(),
            },
        }
    }
}

fn check_errors(response: &RawResponse) -> Result<(), CardError> {
    match response.errors.first() {
        Some(error) => Err(CardError::from_graphql(error)),
        None => Ok(()),
    }
}

/// Result alias for single-card operations.
pub type CardResult = SingleApiResult<VirtualCard, PartialVirtualCard>;
/// Result alias for card list operations.
pub type CardListResult = ListApiResult<VirtualCard, PartialVirtualCard>;

impl VirtualCardsClient {
    /// Fetch one virtual card by id. `None` when the card does not exist.
    pub async fn get_virtual_card(&self, id: &str) -> Result<Option<CardResult>, CardError> {
        let operation = GraphQlOperation::new(
            "GetCard",
            operations::GET_VIRTUAL_CARD,
            json!({ "id": id }),
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let Some(value) = response.field("getCard") else {
            return Ok(None);
        };
        let record: SealedCardRecord = serde_json::from_value(value.clone())
            .map_err(|e| CardError::MalformedResponse(e.to_string()))?;
        Ok(Some(unseal_single(&record, &self.unsealer)))
    }

    /// List the caller's virtual cards, one page per call.
    pub async fn list_virtual_cards(
        &self,
        filters: ListFilters,
    ) -> Result<CardListResult, CardError> {
        let operation = GraphQlOperation::new(
            "ListCards",
            operations::LIST_VIRTUAL_CARDS,
            filters.variables(),
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let Some(value) = response.field("listCards") else {
            return Ok(ListApiResult::Success {
                items: Vec::new(),
                next_token: None,
            });
        };
        let page: PaginatedRecords<SealedCardRecord> = serde_json::from_value(value.clone())
            .map_err(|e| CardError::MalformedResponse(e.to_string()))?;
        Ok(aggregate_page(&page.items, page.next_token, &self.unsealer))
    }

    /// Provision a new virtual card against a funding source.
    ///
    /// Requires an enrolled public key: the service seals the card's PII
    /// against the client's key ring, so a missing key fails here before
    /// any network call.
    pub async fn provision_virtual_card(
        &self,
        input: ProvisionCardInput,
    ) -> Result<CardResult, CardError> {
        let Some(public_key) = self.key_store.current_public_key()? else {
            return Err(CardError::PublicKey);
        };

        let client_ref_id = Uuid::new_v4().to_string();
        let mut variables = serde_json::to_value(&input)
            .map_err(|e| CardError::MalformedResponse(e.to_string()))?;
        let vars = variables
            .as_object_mut()
            .ok_or_else(|| CardError::MalformedResponse("input is not an object".to_string()))?;
        vars.insert("keyRingId".to_string(), json!(public_key.key_ring_id));
        vars.insert("clientRefId".to_string(), json!(client_ref_id));

        info!(client_ref_id = %client_ref_id, "provisioning virtual card");
        let operation = GraphQlOperation::new(
            "CardProvision",
            operations::PROVISION_VIRTUAL_CARD,
            json!({ "input": variables }),
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let record = required_card(&response, "cardProvision")?;
        Ok(unseal_single(&record, &self.unsealer))
    }

    /// Update a card's mutable metadata.
    pub async fn update_virtual_card(&self, input: UpdateCardInput) -> Result<CardResult, CardError> {
        let variables = serde_json::to_value(&input)
            .map_err(|e| CardError::MalformedResponse(e.to_string()))?;
        let operation = GraphQlOperation::new(
            "UpdateCard",
            operations::UPDATE_VIRTUAL_CARD,
            json!({ "input": variables }),
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let record = required_card(&response, "updateCard")?;
        Ok(unseal_single(&record, &self.unsealer))
    }

    /// Cancel a card. The returned entity reflects the closed state.
    pub async fn cancel_virtual_card(&self, id: &str) -> Result<CardResult, CardError> {
        let operation = GraphQlOperation::new(
            "CancelCard",
            operations::CANCEL_VIRTUAL_CARD,
            json!({ "input": { "id": id } }),
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let record = required_card(&response, "cancelCard")?;
        Ok(unseal_single(&record, &self.unsealer))
    }
}

fn required_card(response: &RawResponse, field: &str) -> Result<SealedCardRecord, CardError> {
    let value = response
        .field(field)
        .ok_or_else(|| CardError::MalformedResponse(format!("missing {field} in response")))?;
    serde_json::from_value(value.clone()).map_err(|e| CardError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::client::testing::{sealed_card_json, FailingKeyStore, MockGateway};
    use crate::keys::LocalKeyStore;
    use crate::models::CardState;

    fn client_with(
        gateway: Arc<MockGateway>,
        key_store: Arc<dyn crate::keys::KeyStore>,
    ) -> VirtualCardsClient {
        VirtualCardsClient::new(gateway, key_store)
    }

    #[tokio::test]
    async fn get_card_unseals_fully_populated_entity() {
        let store = Arc::new(LocalKeyStore::new());
        store.generate_key_pair("key-1").unwrap();
        let gateway = Arc::new(MockGateway::new());
        gateway.push_data(json!({ "getCard": sealed_card_json(&store, "key-1", "card-1") }));

        let client = client_with(gateway, store);
        let result = client.get_virtual_card("card-1").await.unwrap().unwrap();
        let card = result.success().expect("expected full unseal");
        assert_eq!(card.state, CardState::Issued);
        assert_eq!(card.last4, "last4");
        assert_eq!(card.card_holder, "card holder");
        assert_eq!(card.pan, "6666666666666666");
    }

    #[tokio::test]
    async fn get_card_returns_none_for_null_data() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_data(json!({ "getCard": null }));

        let client = client_with(gateway, Arc::new(LocalKeyStore::new()));
        assert!(client.get_virtual_card("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_with_undecryptable_record_degrades_to_partial() {
        // Sealed against a key the client's store does not hold.
        let sealing_store = LocalKeyStore::new();
        sealing_store.generate_key_pair("key-1").unwrap();

        let gateway = Arc::new(MockGateway::new());
        gateway.push_data(json!({
            "listCards": {
                "items": [sealed_card_json(&sealing_store, "key-1", "card-1")],
                "nextToken": null,
            }
        }));

        let failing = Arc::new(FailingKeyStore::new());
        let client = client_with(gateway, failing.clone());

        match client.list_virtual_cards(ListFilters::default()).await.unwrap() {
            ListApiResult::Partial {
                items,
                failed,
                next_token,
            } => {
                assert!(items.is_empty());
                assert_eq!(failed.len(), 1);
                assert_eq!(next_token, None);
                // Plain fields survive; PII fields have no slot to leak into.
                let partial = &failed[0].partial;
                assert_eq!(partial.id, "card-1");
                assert_eq!(partial.owner, "owner-1");
                assert_eq!(partial.version, 1);
                assert_eq!(partial.state, CardState::Issued);
                assert_eq!(partial.last4, "last4");
                assert_eq!(partial.currency, "USD");
                assert_eq!(partial.created_at.timestamp_millis(), 1_700_000_000_000);
            }
            other => panic!("expected partial, got {other:?}"),
        }
        // Fail-fast: one decrypt attempt for the record's first sealed field.
        assert_eq!(failing.private_decrypt_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn list_deduplicates_repeated_ids() {
        let store = Arc::new(LocalKeyStore::new());
        store.generate_key_pair("key-1").unwrap();
        let gateway = Arc::new(MockGateway::new());
        gateway.push_data(json!({
            "listCards": {
                "items": [
                    sealed_card_json(&store, "key-1", "card-a"),
                    sealed_card_json(&store, "key-1", "card-b"),
                    sealed_card_json(&store, "key-1", "card-a"),
                ],
                "nextToken": "more",
            }
        }));

        let client = client_with(gateway, store);
        let result = client.list_virtual_cards(ListFilters::default()).await.unwrap();
        assert!(!result.is_partial());
        assert_eq!(result.items().len(), 2);
        assert_eq!(result.items()[0].id, "card-a");
        assert_eq!(result.items()[1].id, "card-b");
        assert_eq!(result.next_token(), Some("more"));
    }

    #[tokio::test]
    async fn list_with_null_data_is_empty_success() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_data(json!({ "listCards": null }));

        let client = client_with(gateway, Arc::new(LocalKeyStore::new()));
        match client.list_virtual_cards(ListFilters::default()).await.unwrap() {
            ListApiResult::Success { items, next_token } => {
                assert!(items.is_empty());
                assert_eq!(next_token, None);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancel_maps_account_locked_without_unsealing() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_graphql_error("AccountLockedError");

        let failing = Arc::new(FailingKeyStore::new());
        let client = client_with(gateway, failing.clone());

        let err = client.cancel_virtual_card("card-1").await.unwrap_err();
        assert!(matches!(err, CardError::AccountLocked));
        assert_eq!(failing.private_decrypt_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unrecognized_error_type_maps_to_unknown() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_graphql_error("BrandNewServiceError");

        let client = client_with(gateway, Arc::new(LocalKeyStore::new()));
        let err = client.get_virtual_card("card-1").await.unwrap_err();
        match err {
            CardError::Unknown { error_type, .. } => {
                assert_eq!(error_type, "BrandNewServiceError");
            }
            other => panic!("expected unknown, got {other:?}"),
        }
    }

    fn cancelled_client() -> VirtualCardsClient {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_error(GatewayError::Cancelled);
        client_with(gateway, Arc::new(LocalKeyStore::new()))
    }

    #[tokio::test]
    async fn cancellation_passes_through_every_operation() {
        let err = cancelled_client().get_virtual_card("card-1").await.unwrap_err();
        assert!(matches!(err, CardError::Cancelled));

        let err = cancelled_client()
            .list_virtual_cards(ListFilters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CardError::Cancelled));

        let err = cancelled_client().cancel_virtual_card("card-1").await.unwrap_err();
        assert!(matches!(err, CardError::Cancelled));

        let err = cancelled_client()
            .update_virtual_card(UpdateCardInput {
                id: "card-1".to_string(),
                expected_version: 1,
                card_holder: None,
                alias: Some("renamed".to_string()),
                billing_address: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CardError::Cancelled));
    }

    #[tokio::test]
    async fn forbidden_status_maps_to_forbidden() {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_error(GatewayError::Forbidden);
        let client = client_with(gateway, Arc::new(LocalKeyStore::new()));
        assert!(matches!(
            client.get_virtual_card("card-1").await.unwrap_err(),
            CardError::Forbidden
        ));
    }

    #[tokio::test]
    async fn provision_without_enrolled_key_fails_before_network() {
        let gateway = Arc::new(MockGateway::new());
        // No queued response: reaching the gateway would panic the mock.
        let client = client_with(gateway.clone(), Arc::new(LocalKeyStore::new()));

        let input = ProvisionCardInput {
            funding_source_id: "fs-1".to_string(),
            card_holder: "Jane Shopper".to_string(),
            alias: "shopping".to_string(),
            currency: "USD".to_string(),
            billing_address: None,
        };
        let err = client.provision_virtual_card(input).await.unwrap_err();
        assert!(matches!(err, CardError::PublicKey));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provision_with_enrolled_key_returns_unsealed_card() {
        let store = Arc::new(LocalKeyStore::new());
        store.generate_key_pair("key-1").unwrap();
        let gateway = Arc::new(MockGateway::new());
        gateway.push_data(json!({ "cardProvision": sealed_card_json(&store, "key-1", "card-new") }));

        let client = client_with(gateway, store);
        let input = ProvisionCardInput {
            funding_source_id: "fs-1".to_string(),
            card_holder: "Jane Shopper".to_string(),
            alias: "shopping".to_string(),
            currency: "USD".to_string(),
            billing_address: None,
        };
        let result = client.provision_virtual_card(input).await.unwrap();
        let card = result.success().expect("expected full unseal");
        assert_eq!(card.id, "card-new");
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GraphQL documents and raw wire record types.
//!
//! Wire records are the shapes the service returns before unsealing: plain
//! fields are typed, sealed fields are base64 strings tagged by the
//! record-level `keyId`/`algorithm` pair. Turning these into domain entities
//! is the job of `crate::models`.

use serde::Deserialize;

// =============================================================================
// Documents
// =============================================================================

pub const GET_VIRTUAL_CARD: &str = r#"
query GetCard($id: ID!) {
  getCard(id: $id) {
    ...SealedCard
  }
}
"#;

pub const LIST_VIRTUAL_CARDS: &str = r#"
query ListCards($limit: Int, $nextToken: String, $sortOrder: SortOrder, $startDateEpochMs: Float, $endDateEpochMs: Float) {
  listCards(limit: $limit, nextToken: $nextToken, sortOrder: $sortOrder, startDateEpochMs: $startDateEpochMs, endDateEpochMs: $endDateEpochMs) {
    items {
      ...SealedCard
    }
    nextToken
  }
}
"#;

pub const PROVISION_VIRTUAL_CARD: &str = r#"
mutation CardProvision($input: CardProvisionRequest!) {
  cardProvision(input: $input) {
    ...SealedCard
  }
}
"#;

pub const UPDATE_VIRTUAL_CARD: &str = r#"
mutation UpdateCard($input: CardUpdateRequest!) {
  updateCard(input: $input) {
    ...SealedCard
  }
}
"#;

pub const CANCEL_VIRTUAL_CARD: &str = r#"
mutation CancelCard($input: CardCancelRequest!) {
  cancelCard(input: $input) {
    ...SealedCard
  }
}
"#;

pub const GET_TRANSACTION: &str = r#"
query GetTransaction($id: ID!) {
  getTransaction(id: $id) {
    ...SealedTransaction
  }
}
"#;

pub const LIST_TRANSACTIONS_BY_CARD_ID: &str = r#"
query ListTransactionsByCardId($cardId: ID!, $limit: Int, $nextToken: String, $sortOrder: SortOrder, $startDateEpochMs: Float, $endDateEpochMs: Float) {
  listTransactionsByCardId(cardId: $cardId, limit: $limit, nextToken: $nextToken, sortOrder: $sortOrder, startDateEpochMs: $startDateEpochMs, endDateEpochMs: $endDateEpochMs) {
    items {
      ...SealedTransaction
    }
    nextToken
  }
}
"#;

pub const SETUP_FUNDING_SOURCE: &str = r#"
mutation SetupFundingSource($input: SetupFundingSourceRequest!) {
  setupFundingSource(input: $input) {
    ...ProvisionalFundingSource
  }
}
"#;

pub const COMPLETE_FUNDING_SOURCE: &str = r#"
mutation CompleteFundingSource($input: CompleteFundingSourceRequest!) {
  completeFundingSource(input: $input) {
    ...FundingSource
  }
}
"#;

pub const GET_FUNDING_SOURCE: &str = r#"
query GetFundingSource($id: ID!) {
  getFundingSource(id: $id) {
    ...FundingSource
  }
}
"#;

pub const LIST_FUNDING_SOURCES: &str = r#"
query ListFundingSources($limit: Int, $nextToken: String) {
  listFundingSources(limit: $limit, nextToken: $nextToken) {
    items {
      ...FundingSource
    }
    nextToken
  }
}
"#;

pub const CANCEL_FUNDING_SOURCE: &str = r#"
mutation CancelFundingSource($input: IdInput!) {
  cancelFundingSource(input: $input) {
    ...FundingSource
  }
}
"#;

pub const REFRESH_FUNDING_SOURCE: &str = r#"
mutation RefreshFundingSource($input: RefreshFundingSourceRequest!) {
  refreshFundingSource(input: $input) {
    ...FundingSource
  }
}
"#;

pub const REVIEW_FUNDING_SOURCE: &str = r#"
mutation ReviewFundingSource($input: IdInput!) {
  reviewFundingSource(input: $input) {
    ...FundingSource
  }
}
"#;

// =============================================================================
// Wire records
// =============================================================================

/// One page of records plus the pagination token, as returned by list
/// queries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedRecords<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// Raw virtual card record. PII attributes (`card_holder`, `alias`, `pan`,
/// `csc`, billing address, expiry) are sealed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedCardRecord {
    pub id: String,
    pub owner: String,
    pub version: u32,
    pub created_at_epoch_ms: f64,
    pub updated_at_epoch_ms: f64,
    pub key_id: String,
    pub key_ring_id: String,
    pub algorithm: String,
    pub funding_source_id: String,
    pub state: String,
    pub active_to_epoch_ms: f64,
    #[serde(default)]
    pub cancelled_at_epoch_ms: Option<f64>,
    pub last4: String,
    pub currency: String,
    // Sealed attributes (base64 envelopes).
    pub card_holder: String,
    pub alias: String,
    pub pan: String,
    pub csc: String,
    #[serde(default)]
    pub billing_address: Option<SealedAddressRecord>,
    #[serde(default)]
    pub expiry: Option<SealedExpiryRecord>,
}

/// Sealed billing address attributes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedAddressRecord {
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Sealed card expiry attributes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedExpiryRecord {
    pub mm: String,
    pub yyyy: String,
}

/// Raw transaction record. Amounts, description, the transaction timestamp
/// and the optional decline reason are sealed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedTransactionRecord {
    pub id: String,
    pub owner: String,
    pub version: u32,
    pub created_at_epoch_ms: f64,
    pub updated_at_epoch_ms: f64,
    pub card_id: String,
    pub sequence_id: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub key_id: String,
    pub algorithm: String,
    // Sealed attributes (base64 envelopes).
    pub transacted_at_epoch_ms: String,
    pub description: String,
    pub billed_amount: SealedCurrencyAmountRecord,
    pub transacted_amount: SealedCurrencyAmountRecord,
    /// Absent on non-declined transactions; absence is "no value", not a
    /// failure.
    #[serde(default)]
    pub declined_reason: Option<String>,
}

/// Sealed currency amount attributes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedCurrencyAmountRecord {
    pub currency: String,
    pub amount: String,
}

/// Raw funding source record. Funding sources carry no sealed attributes;
/// the service only exposes non-PII summary data (last4, network).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingSourceRecord {
    pub id: String,
    pub owner: String,
    pub version: u32,
    pub created_at_epoch_ms: f64,
    pub updated_at_epoch_ms: f64,
    pub state: String,
    pub currency: String,
    pub last4: String,
    pub network: String,
}

/// Raw provisional funding source record, tracked until setup reaches a
/// terminal state.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionalFundingSourceRecord {
    pub id: String,
    pub owner: String,
    pub version: u32,
    pub created_at_epoch_ms: f64,
    pub updated_at_epoch_ms: f64,
    pub state: String,
    /// Opaque provider payload the caller needs to complete setup.
    pub provisioning_data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sealed_card_record_deserializes_wire_shape() {
        let record: SealedCardRecord = serde_json::from_value(json!({
            "id": "card-1",
            "owner": "owner-1",
            "version": 1,
            "createdAtEpochMs": 1.0,
            "updatedAtEpochMs": 2.0,
            "keyId": "key-1",
            "keyRingId": "ring-1",
            "algorithm": "RSA_2048_OAEP_SHA256/AES_256_GCM",
            "fundingSourceId": "fs-1",
            "state": "ISSUED",
            "activeToEpochMs": 3.0,
            "last4": "1234",
            "currency": "USD",
            "cardHolder": "c2VhbGVk",
            "alias": "c2VhbGVk",
            "pan": "c2VhbGVk",
            "csc": "c2VhbGVk"
        }))
        .unwrap();
        assert_eq!(record.id, "card-1");
        assert_eq!(record.state, "ISSUED");
        assert!(record.billing_address.is_none());
        assert!(record.cancelled_at_epoch_ms.is_none());
    }

    #[test]
    fn paginated_records_tolerate_missing_token() {
        let page: PaginatedRecords<FundingSourceRecord> = serde_json::from_value(json!({
            "items": []
        }))
        .unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_token.is_none());
    }

    #[test]
    fn transaction_record_treats_missing_decline_reason_as_absent() {
        let record: SealedTransactionRecord = serde_json::from_value(json!({
            "id": "txn-1",
            "owner": "owner-1",
            "version": 1,
            "createdAtEpochMs": 1.0,
            "updatedAtEpochMs": 2.0,
            "cardId": "card-1",
            "sequenceId": "seq-1",
            "type": "COMPLETE",
            "keyId": "key-1",
            "algorithm": "RSA_2048_OAEP_SHA256/AES_256_GCM",
            "transactedAtEpochMs": "c2VhbGVk",
            "description": "c2VhbGVk",
            "billedAmount": {"currency": "c2VhbGVk", "amount": "c2VhbGVk"},
            "transactedAmount": {"currency": "c2VhbGVk", "amount": "c2VhbGVk"}
        }))
        .unwrap();
        assert!(record.declined_reason.is_none());
    }
}

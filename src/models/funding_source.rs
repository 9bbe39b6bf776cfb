// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Funding source entities.
//!
//! Funding sources carry no sealed attributes; the service exposes only
//! non-PII summary data, so these convert straight from wire records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::graphql::operations::{FundingSourceRecord, ProvisionalFundingSourceRecord};

use super::datetime_from_epoch_ms;

/// Lifecycle state of a funding source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingSourceState {
    Active,
    Inactive,
    /// Provider data is stale; the source must be refreshed before use.
    Refresh,
    Unknown,
}

impl FundingSourceState {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "ACTIVE" => Self::Active,
            "INACTIVE" => Self::Inactive,
            "REFRESH" => Self::Refresh,
            _ => Self::Unknown,
        }
    }
}

/// Card network of a credit card funding source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditCardNetwork {
    Amex,
    Discover,
    Mastercard,
    Visa,
    Unknown,
}

impl CreditCardNetwork {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "AMEX" => Self::Amex,
            "DISCOVER" => Self::Discover,
            "MASTERCARD" => Self::Mastercard,
            "VISA" => Self::Visa,
            _ => Self::Unknown,
        }
    }
}

/// A payment method backing virtual cards.
#[derive(Debug, Clone)]
pub struct FundingSource {
    pub id: String,
    pub owner: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: FundingSourceState,
    pub currency: String,
    pub last4: String,
    pub network: CreditCardNetwork,
}

impl From<FundingSourceRecord> for FundingSource {
    fn from(record: FundingSourceRecord) -> Self {
        Self {
            id: record.id,
            owner: record.owner,
            version: record.version,
            created_at: datetime_from_epoch_ms(record.created_at_epoch_ms),
            updated_at: datetime_from_epoch_ms(record.updated_at_epoch_ms),
            state: FundingSourceState::parse(&record.state),
            currency: record.currency,
            last4: record.last4,
            network: CreditCardNetwork::parse(&record.network),
        }
    }
}

/// Setup state of a provisional funding source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionalFundingSourceState {
    Provisioning,
    Pending,
    Completed,
    Failed,
    Unknown,
}

impl ProvisionalFundingSourceState {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "PROVISIONING" => Self::Provisioning,
            "PENDING" => Self::Pending,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

/// A funding source mid-setup, tracked until it reaches a terminal state.
#[derive(Debug, Clone)]
pub struct ProvisionalFundingSource {
    pub id: String,
    pub owner: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: ProvisionalFundingSourceState,
    /// Opaque provider payload the caller needs to complete setup.
    pub provisioning_data: String,
}

impl From<ProvisionalFundingSourceRecord> for ProvisionalFundingSource {
    fn from(record: ProvisionalFundingSourceRecord) -> Self {
        Self {
            id: record.id,
            owner: record.owner,
            version: record.version,
            created_at: datetime_from_epoch_ms(record.created_at_epoch_ms),
            updated_at: datetime_from_epoch_ms(record.updated_at_epoch_ms),
            state: ProvisionalFundingSourceState::parse(&record.state),
            provisioning_data: record.provisioning_data,
        }
    }
}

// =============================================================================
// Mutation inputs
// =============================================================================

/// Request to begin funding source setup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupFundingSourceInput {
    /// ISO-4217 currency code the source will fund in.
    pub currency: String,
    /// Funding source kind tag, e.g. `"CREDIT_CARD"` or `"BANK_ACCOUNT"`.
    #[serde(rename = "type")]
    pub source_type: String,
}

/// Request to complete a provisional funding source.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteFundingSourceInput {
    pub id: String,
    /// Opaque provider completion payload (tokenized card data etc.).
    pub completion_data: Value,
}

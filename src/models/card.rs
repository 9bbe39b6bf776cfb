// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Virtual card entities and their unsealing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::graphql::operations::SealedCardRecord;
use crate::unsealing::{
    PlaintextType, SealedField, SealedRecord, Unsealer, UnsealingError,
};

use super::datetime_from_epoch_ms;

/// Lifecycle state of a virtual card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// Card is issued and usable.
    Issued,
    /// Card has failed provisioning.
    Failed,
    /// Card has been closed by the owner or the service.
    Closed,
    /// Card is suspended pending review.
    Suspended,
    /// State tag this client version does not recognize.
    Unknown,
}

impl CardState {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "ISSUED" => Self::Issued,
            "FAILED" => Self::Failed,
            "CLOSED" => Self::Closed,
            "SUSPENDED" => Self::Suspended,
            _ => Self::Unknown,
        }
    }
}

/// Unsealed billing address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingAddress {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Unsealed card expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expiry {
    pub mm: String,
    pub yyyy: String,
}

/// A fully unsealed virtual card.
///
/// Every PII field (`card_holder`, `alias`, `pan`, `csc`, billing address,
/// expiry) has been decrypted; construction goes through the unsealing
/// pipeline only.
#[derive(Debug, Clone)]
pub struct VirtualCard {
    pub id: String,
    pub owner: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Key pair that sealed this card's PII fields.
    pub key_id: String,
    pub key_ring_id: String,
    pub funding_source_id: String,
    pub state: CardState,
    pub active_to: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub last4: String,
    pub currency: String,
    pub card_holder: String,
    pub alias: String,
    pub pan: String,
    pub csc: String,
    pub billing_address: Option<BillingAddress>,
    pub expiry: Option<Expiry>,
}

/// A virtual card whose sealed fields could not be recovered.
///
/// Carries only the plain fields; never decrypted plaintext.
#[derive(Debug, Clone)]
pub struct PartialVirtualCard {
    pub id: String,
    pub owner: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub funding_source_id: String,
    pub state: CardState,
    pub active_to: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub last4: String,
    pub currency: String,
}

impl SealedCardRecord {
    fn string_field(&self, ciphertext: &str) -> SealedField {
        SealedField::new(
            &self.key_id,
            &self.algorithm,
            PlaintextType::String,
            ciphertext,
        )
    }
}

impl SealedRecord for SealedCardRecord {
    type Unsealed = VirtualCard;
    type Partial = PartialVirtualCard;

    const RECORD_TYPE: &'static str = "virtualCard";

    fn id(&self) -> &str {
        &self.id
    }

    fn unseal(&self, unsealer: &Unsealer) -> Result<VirtualCard, UnsealingError> {
        let card_holder = unsealer.unseal_string(&self.string_field(&self.card_holder))?;
        let alias = unsealer.unseal_string(&self.string_field(&self.alias))?;
        let pan = unsealer.unseal_string(&self.string_field(&self.pan))?;
        let csc = unsealer.unseal_string(&self.string_field(&self.csc))?;

        let billing_address = match &self.billing_address {
            Some(addr) => Some(BillingAddress {
                address_line1: unsealer.unseal_string(&self.string_field(&addr.address_line1))?,
                address_line2: match &addr.address_line2 {
                    Some(line2) => Some(unsealer.unseal_string(&self.string_field(line2))?),
                    None => None,
                },
                city: unsealer.unseal_string(&self.string_field(&addr.city))?,
                state: unsealer.unseal_string(&self.string_field(&addr.state))?,
                postal_code: unsealer.unseal_string(&self.string_field(&addr.postal_code))?,
                country: unsealer.unseal_string(&self.string_field(&addr.country))?,
            }),
            None => None,
        };

        let expiry = match &self.expiry {
            Some(exp) => Some(Expiry {
                mm: unsealer.unseal_string(&self.string_field(&exp.mm))?,
                yyyy: unsealer.unseal_string(&self.string_field(&exp.yyyy))?,
            }),
            None => None,
        };

        Ok(VirtualCard {
            id: self.id.clone(),
            owner: self.owner.clone(),
            version: self.version,
            created_at: datetime_from_epoch_ms(self.created_at_epoch_ms),
            updated_at: datetime_from_epoch_ms(self.updated_at_epoch_ms),
            key_id: self.key_id.clone(),
            key_ring_id: self.key_ring_id.clone(),
            funding_source_id: self.funding_source_id.clone(),
            state: CardState::parse(&self.state),
            active_to: datetime_from_epoch_ms(self.active_to_epoch_ms),
            cancelled_at: self.cancelled_at_epoch_ms.map(datetime_from_epoch_ms),
            last4: self.last4.clone(),
            currency: self.currency.clone(),
            card_holder,
            alias,
            pan,
            csc,
            billing_address,
            expiry,
        })
    }

    fn to_partial(&self) -> PartialVirtualCard {
        PartialVirtualCard {
            id: self.id.clone(),
            owner: self.owner.clone(),
            version: self.version,
            created_at: datetime_from_epoch_ms(self.created_at_epoch_ms),
            updated_at: datetime_from_epoch_ms(self.updated_at_epoch_ms),
            funding_source_id: self.funding_source_id.clone(),
            state: CardState::parse(&self.state),
            active_to: datetime_from_epoch_ms(self.active_to_epoch_ms),
            cancelled_at: self.cancelled_at_epoch_ms.map(datetime_from_epoch_ms),
            last4: self.last4.clone(),
            currency: self.currency.clone(),
        }
    }
}

// =============================================================================
// Mutation inputs
// =============================================================================

/// Billing address as submitted on card provision/update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddressInput {
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Request to provision a new virtual card.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionCardInput {
    pub funding_source_id: String,
    pub card_holder: String,
    pub alias: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<BillingAddressInput>,
}

/// Request to update a card's mutable metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardInput {
    pub id: String,
    /// Version the update is based on; the service rejects stale versions.
    pub expected_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_holder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<BillingAddressInput>,
}

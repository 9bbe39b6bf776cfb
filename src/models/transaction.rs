// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction entities and their unsealing.

use chrono::{DateTime, Utc};

use crate::graphql::operations::{SealedCurrencyAmountRecord, SealedTransactionRecord};
use crate::unsealing::{
    PlaintextType, SealedField, SealedRecord, Unsealer, UnsealingError,
};

use super::datetime_from_epoch_ms;

/// Kind of a card transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Authorization that has not settled yet.
    Pending,
    /// Settled transaction.
    Complete,
    /// Refund against an earlier transaction.
    Refund,
    /// Declined authorization.
    Decline,
    /// Type tag this client version does not recognize.
    Unknown,
}

impl TransactionType {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "PENDING" => Self::Pending,
            "COMPLETE" => Self::Complete,
            "REFUND" => Self::Refund,
            "DECLINE" => Self::Decline,
            _ => Self::Unknown,
        }
    }
}

/// An unsealed monetary amount.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyAmount {
    /// ISO-4217 currency code.
    pub currency: String,
    /// Amount in minor currency units.
    pub amount: f64,
}

/// A fully unsealed card transaction.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: String,
    pub owner: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub card_id: String,
    /// Groups related transactions (auth, settle, refund).
    pub sequence_id: String,
    pub transaction_type: TransactionType,
    pub transacted_at: DateTime<Utc>,
    pub billed_amount: CurrencyAmount,
    pub transacted_amount: CurrencyAmount,
    pub description: String,
    /// Decline reason, present only for declined transactions.
    pub declined_reason: Option<String>,
}

/// A transaction whose sealed fields could not be recovered.
#[derive(Debug, Clone)]
pub struct PartialTransaction {
    pub id: String,
    pub owner: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub card_id: String,
    pub sequence_id: String,
    pub transaction_type: TransactionType,
}

impl SealedTransactionRecord {
    fn field(&self, plaintext_type: PlaintextType, ciphertext: &str) -> SealedField {
        SealedField::new(&self.key_id, &self.algorithm, plaintext_type, ciphertext)
    }

    fn unseal_amount(
        &self,
        unsealer: &Unsealer,
        record: &SealedCurrencyAmountRecord,
    ) -> Result<CurrencyAmount, UnsealingError> {
        Ok(CurrencyAmount {
            currency: unsealer.unseal_string(&self.field(PlaintextType::String, &record.currency))?,
            amount: unsealer.unseal_number(&self.field(PlaintextType::Number, &record.amount))?,
        })
    }
}

impl SealedRecord for SealedTransactionRecord {
    type Unsealed = Transaction;
    type Partial = PartialTransaction;

    const RECORD_TYPE: &'static str = "transaction";

    fn id(&self) -> &str {
        &self.id
    }

    fn unseal(&self, unsealer: &Unsealer) -> Result<Transaction, UnsealingError> {
        let transacted_at = unsealer
            .unseal_datetime(&self.field(PlaintextType::DateTime, &self.transacted_at_epoch_ms))?;
        let description =
            unsealer.unseal_string(&self.field(PlaintextType::String, &self.description))?;
        let billed_amount = self.unseal_amount(unsealer, &self.billed_amount)?;
        let transacted_amount = self.unseal_amount(unsealer, &self.transacted_amount)?;

        // An absent decline reason is "no value", not a failure.
        let declined_reason = match &self.declined_reason {
            Some(sealed) => {
                Some(unsealer.unseal_string(&self.field(PlaintextType::String, sealed))?)
            }
            None => None,
        };

        Ok(Transaction {
            id: self.id.clone(),
            owner: self.owner.clone(),
            version: self.version,
            created_at: datetime_from_epoch_ms(self.created_at_epoch_ms),
            updated_at: datetime_from_epoch_ms(self.updated_at_epoch_ms),
            card_id: self.card_id.clone(),
            sequence_id: self.sequence_id.clone(),
            transaction_type: TransactionType::parse(&self.transaction_type),
            transacted_at,
            billed_amount,
            transacted_amount,
            description,
            declined_reason,
        })
    }

    fn to_partial(&self) -> PartialTransaction {
        PartialTransaction {
            id: self.id.clone(),
            owner: self.owner.clone(),
            version: self.version,
            created_at: datetime_from_epoch_ms(self.created_at_epoch_ms),
            updated_at: datetime_from_epoch_ms(self.updated_at_epoch_ms),
            card_id: self.card_id.clone(),
            sequence_id: self.sequence_id.clone(),
            transaction_type: TransactionType::parse(&self.transaction_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_parses_known_tags() {
        assert_eq!(TransactionType::parse("PENDING"), TransactionType::Pending);
        assert_eq!(TransactionType::parse("COMPLETE"), TransactionType::Complete);
        assert_eq!(TransactionType::parse("REFUND"), TransactionType::Refund);
        assert_eq!(TransactionType::parse("DECLINE"), TransactionType::Decline);
        assert_eq!(TransactionType::parse("CHARGEBACK"), TransactionType::Unknown);
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Domain Models
//!
//! Typed entities exposed to application code, assembled from raw wire
//! records by the unsealing pipeline.
//!
//! ## Model Categories
//!
//! - **Cards**: virtual payment cards, full and partial variants
//! - **Transactions**: card transactions with sealed amounts
//! - **Funding Sources**: payment methods backing virtual cards
//! - **Filters**: pagination and date-range query parameters

mod card;
mod filters;
mod funding_source;
mod transaction;

pub use card::{
    BillingAddress, BillingAddressInput, CardState, Expiry, PartialVirtualCard,
    ProvisionCardInput, UpdateCardInput, VirtualCard,
};
pub use filters::{DateRange, ListFilters, SortOrder};
pub use funding_source::{
    CompleteFundingSourceInput, CreditCardNetwork, FundingSource, FundingSourceState,
    ProvisionalFundingSource, ProvisionalFundingSourceState, SetupFundingSourceInput,
};
pub use transaction::{CurrencyAmount, PartialTransaction, Transaction, TransactionType};

use chrono::{DateTime, TimeZone, Utc};

/// Convert a plain epoch-millisecond wire value to a timestamp. Out-of-range
/// values clamp to the epoch rather than failing deserialization of an
/// otherwise valid record.
pub(crate) fn datetime_from_epoch_ms(ms: f64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms as i64)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

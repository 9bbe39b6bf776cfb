// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Three-way API result surface.
//!
//! List queries aggregate a page of records into [`ListApiResult`]: fully
//! `Success` when every record unseals, `Partial` when any record degrades.
//! Single-entity operations use the analogous [`SingleApiResult`]. One
//! failing record demotes only itself, never the page or the operation.

use std::collections::HashSet;

use super::record::{unseal_record, RecordOutcome, SealedRecord};
use super::unsealer::{Unsealer, UnsealingError};

/// A degraded record plus the unsealing failure that caused it.
#[derive(Debug)]
pub struct PartialResult<P> {
    /// Plain (non-sealed) fields of the record.
    pub partial: P,
    /// The first unsealing failure encountered for this record.
    pub cause: UnsealingError,
}

/// Result of a paginated list operation.
#[derive(Debug)]
pub enum ListApiResult<T, P> {
    /// Every record on the page unsealed fully.
    Success {
        items: Vec<T>,
        next_token: Option<String>,
    },
    /// At least one record degraded. `items` holds the fully unsealed
    /// subset, `failed` the degraded subset, both in input order.
    Partial {
        items: Vec<T>,
        failed: Vec<PartialResult<P>>,
        next_token: Option<String>,
    },
}

impl<T, P> ListApiResult<T, P> {
    /// Pagination token for the next page, regardless of classification.
    pub fn next_token(&self) -> Option<&str> {
        match self {
            Self::Success { next_token, .. } | Self::Partial { next_token, .. } => {
                next_token.as_deref()
            }
        }
    }

    /// Fully unsealed items, regardless of classification.
    pub fn items(&self) -> &[T] {
        match self {
            Self::Success { items, .. } | Self::Partial { items, .. } => items,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }
}

/// Result of a single-entity operation.
///
/// There is no third "failed" state here: a record whose every sealed field
/// is unreadable still yields `Partial` carrying the plain fields. Only
/// gateway/domain errors abort the operation, and those surface as `Err`
/// from the calling operation, not here.
#[derive(Debug)]
pub enum SingleApiResult<T, P> {
    Success { result: T },
    Partial { result: PartialResult<P> },
}

impl<T, P> SingleApiResult<T, P> {
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }

    /// The fully unsealed entity, if this result is `Success`.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success { result } => Some(result),
            Self::Partial { .. } => None,
        }
    }
}

/// Run the pipeline over one page of raw records and classify the page.
///
/// Records are deduplicated by `(id, RECORD_TYPE)`, keeping the first
/// occurrence; emitted order follows first-seen input order. The pagination
/// token passes through unchanged. An empty page is `Success`.
pub fn aggregate_page<R: SealedRecord>(
    records: &[R],
    next_token: Option<String>,
    unsealer: &Unsealer,
) -> ListApiResult<R::Unsealed, R::Partial> {
    let mut seen: HashSet<(String, &'static str)> = HashSet::new();
    let mut items = Vec::with_capacity(records.len());
    let mut failed = Vec::new();

    for record in records {
        if !seen.insert((record.id().to_string(), R::RECORD_TYPE)) {
            continue;
        }
        match unseal_record(record, unsealer) {
            RecordOutcome::Unsealed(unsealed) => items.push(unsealed),
            RecordOutcome::Partial { partial, cause } => {
                failed.push(PartialResult { partial, cause });
            }
        }
    }

    if failed.is_empty() {
        ListApiResult::Success { items, next_token }
    } else {
        ListApiResult::Partial {
            items,
            failed,
            next_token,
        }
    }
}

/// Run the pipeline over one raw record for a single-entity operation.
pub fn unseal_single<R: SealedRecord>(
    record: &R,
    unsealer: &Unsealer,
) -> SingleApiResult<R::Unsealed, R::Partial> {
    match unseal_record(record, unsealer) {
        RecordOutcome::Unsealed(result) => SingleApiResult::Success { result },
        RecordOutcome::Partial { partial, cause } => SingleApiResult::Partial {
            result: PartialResult { partial, cause },
        },
    }
}

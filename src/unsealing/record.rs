// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Record unsealing pipeline.
//!
//! A raw API record mixes plain fields (ids, enums, timestamps) with sealed
//! fields. [`unseal_record`] turns one raw record into either its fully
//! unsealed entity or a partial entity carrying only the plain fields plus
//! the triggering error.
//!
//! Failure policy is fail-fast *per record*: the first sealed field that
//! fails aborts the remaining fields of that record (implementations unseal
//! with `?`), but never aborts other records in the batch.

use tracing::warn;

use super::unsealer::{Unsealer, UnsealingError};

/// A raw API record whose sealed fields can be opened into a typed entity.
///
/// Implementations unseal their fields in any order (fields are
/// independent), propagating the first failure with `?` so that no further
/// decrypt calls are attempted for the record. Optional sealed fields that
/// are absent are "no value", not failures.
pub trait SealedRecord {
    /// The fully unsealed domain entity.
    type Unsealed;
    /// The degraded entity: plain fields only, never decrypted plaintext.
    type Partial;

    /// Record type tag, used with [`SealedRecord::id`] for page-level
    /// deduplication.
    const RECORD_TYPE: &'static str;

    /// Server-assigned identifier of this record.
    fn id(&self) -> &str;

    /// Unseal every sealed field and assemble the typed entity.
    fn unseal(&self, unsealer: &Unsealer) -> Result<Self::Unsealed, UnsealingError>;

    /// Assemble the degraded entity from the plain fields.
    fn to_partial(&self) -> Self::Partial;
}

/// Outcome of running the pipeline over one record.
#[derive(Debug)]
pub enum RecordOutcome<U, P> {
    /// Every sealed field decrypted; the full entity is available.
    Unsealed(U),
    /// One sealed field failed; only plain fields survive.
    Partial { partial: P, cause: UnsealingError },
}

/// Run the unsealing pipeline over one record.
///
/// A failing record degrades to [`RecordOutcome::Partial`]; it is never an
/// error at this layer, so one bad record cannot poison a batch.
pub fn unseal_record<R: SealedRecord>(
    record: &R,
    unsealer: &Unsealer,
) -> RecordOutcome<R::Unsealed, R::Partial> {
    match record.unseal(unsealer) {
        Ok(unsealed) => RecordOutcome::Unsealed(unsealed),
        Err(cause) => {
            warn!(
                record_type = R::RECORD_TYPE,
                id = record.id(),
                error = %cause,
                "record degraded to partial"
            );
            RecordOutcome::Partial {
                partial: record.to_partial(),
                cause,
            }
        }
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Field-level unsealing and partial-result aggregation.
//!
//! Sealed response data arrives as per-field ciphertext blobs tagged with a
//! key id and algorithm. This module decrypts those blobs ([`Unsealer`]),
//! assembles typed entities out of raw records ([`SealedRecord`]), and
//! aggregates pages of records into a three-way result surface
//! ([`ListApiResult`] / [`SingleApiResult`]) that tolerates per-record
//! decryption failure without discarding the rest of the response.

mod envelope;
mod record;
mod result;
mod unsealer;

pub use envelope::{PlaintextType, SealedField, SealingAlgorithm, AES_NONCE_LEN, SEALED_KEY_LEN};
pub use record::{unseal_record, RecordOutcome, SealedRecord};
pub use result::{aggregate_page, unseal_single, ListApiResult, PartialResult, SingleApiResult};
pub use unsealer::{UnsealedValue, Unsealer, UnsealingError};

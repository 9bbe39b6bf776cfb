// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public operation surface, one module per operation family.
//!
//! Every operation follows the same policy: unsealing failures demote the
//! affected record to a partial result; gateway transport errors and GraphQL
//! domain errors surface as the family's typed error; cancellation passes
//! through untouched.

pub mod cards;
pub mod error;
pub mod funding_sources;
pub mod transactions;

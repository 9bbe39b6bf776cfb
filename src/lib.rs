// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Virtual Cards Client - SDK for the virtual cards service
//!
//! This crate provides a typed client for the virtual cards GraphQL service:
//! card provisioning and lifecycle, funding source setup, and transaction
//! queries, with end-to-end decryption ("unsealing") of PII attributes
//! against a client-held key ring.
//!
//! ## Modules
//!
//! - `api` - Operation families (cards, funding sources, transactions)
//! - `client` - The [`VirtualCardsClient`] facade
//! - `graphql` - Gateway trait, HTTP transport, GraphQL documents
//! - `keys` - Key store trait and local RSA key ring
//! - `models` - Domain entities and mutation inputs
//! - `unsealing` - Envelope format and partial-result pipeline

pub mod api;
pub mod client;
pub mod config;
pub mod graphql;
pub mod keys;
pub mod models;
pub mod unsealing;

pub use client::VirtualCardsClient;
pub use keys::{KeyStore, KeyStoreError, LocalKeyStore, PublicKey};
pub use unsealing::{ListApiResult, PartialResult, SingleApiResult};

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GraphQL gateway collaborator boundary.
//!
//! - `gateway` - the [`GraphQlGateway`] trait and raw response types
//! - `http` - reqwest-backed gateway implementation
//! - `operations` - GraphQL documents and raw wire record types

mod gateway;
mod http;
pub mod operations;

pub use gateway::{GatewayError, GraphQlGateway, GraphQlOperation, GraphQlResponseError, RawResponse};
pub use http::HttpGateway;

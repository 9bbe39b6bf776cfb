// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gateway trait and raw response types.
//!
//! The unsealing core consumes the gateway purely through this interface;
//! transport details (HTTP, caching, retries) stay behind it. Retry policy,
//! if any, belongs to the gateway implementation, never to the operations.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// One GraphQL operation ready for execution.
#[derive(Debug, Clone)]
pub struct GraphQlOperation {
    /// Operation name, also used in logs.
    pub name: &'static str,
    /// Full GraphQL document.
    pub document: &'static str,
    /// JSON variables object.
    pub variables: Value,
}

impl GraphQlOperation {
    pub fn new(name: &'static str, document: &'static str, variables: Value) -> Self {
        Self {
            name,
            document,
            variables,
        }
    }
}

/// A GraphQL error entry from the service.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponseError {
    /// Service error type tag, e.g. `"AccountLockedError"`.
    #[serde(rename = "errorType", default)]
    pub error_type: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Structured error payload, present for errors that carry data (e.g.
    /// user-interaction-required).
    #[serde(rename = "errorInfo", default)]
    pub error_info: Option<Value>,
}

/// Raw GraphQL response: nullable data plus a list of domain errors.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub data: Option<Value>,
    pub errors: Vec<GraphQlResponseError>,
}

impl RawResponse {
    /// The named top-level field of `data`, when present and non-null.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data
            .as_ref()
            .and_then(|d| d.get(name))
            .filter(|v| !v.is_null())
    }
}

/// Error raised by the gateway itself, distinct from domain
/// [`GraphQlResponseError`]s carried inside a [`RawResponse`].
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The service rejected the caller's credentials (HTTP 403).
    #[error("access denied by the service")]
    Forbidden,

    /// Any other non-success HTTP status.
    #[error("request failed with HTTP status {status}")]
    Http { status: u16 },

    /// The request never completed (connect, TLS, timeout).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body was not a GraphQL response.
    #[error("invalid response from service: {0}")]
    InvalidResponse(String),

    /// The operation was cancelled cooperatively. Must propagate to the
    /// caller unmodified; never reinterpreted as a domain error.
    #[error("operation cancelled")]
    Cancelled,
}

/// Executes GraphQL operations against the virtual cards service.
#[async_trait]
pub trait GraphQlGateway: Send + Sync {
    async fn execute(&self, operation: GraphQlOperation) -> Result<RawResponse, GatewayError>;
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction operations.

use serde_json::json;

use crate::client::VirtualCardsClient;
use crate::graphql::operations::{self, PaginatedRecords, SealedTransactionRecord};
use crate::graphql::{GatewayError, GraphQlOperation, GraphQlResponseError, RawResponse};
use crate::models::{ListFilters, PartialTransaction, Transaction};
use crate::unsealing::{aggregate_page, unseal_single, ListApiResult, SingleApiResult};

use super::error::GraphQlErrorCode;

/// Error family for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("transaction not found")]
    NotFound,

    #[error("access denied by the service")]
    Forbidden,

    #[error("transaction request failed: {0}")]
    RequestFailed(#[source] GatewayError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("service returned malformed data: {0}")]
    MalformedResponse(String),

    #[error("service error {error_type}: {message}")]
    Unknown { error_type: String, message: String },
}

impl From<GatewayError> for TransactionError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Cancelled => Self::Cancelled,
            GatewayError::Forbidden => Self::Forbidden,
            other => Self::RequestFailed(other),
        }
    }
}

impl TransactionError {
    fn from_graphql(error: &GraphQlResponseError) -> Self {
        match GraphQlErrorCode::parse(&error.error_type) {
            GraphQlErrorCode::TransactionNotFound => Self::NotFound,
            _ => Self::Unknown {
                error_type: error.error_type.clone(),
                message: error.message.clone(),
            },
        }
    }
}

fn check_errors(response: &RawResponse) -> Result<(), TransactionError> {
    match response.errors.first() {
        Some(error) => Err(TransactionError::from_graphql(error)),
        None => Ok(()),
    }
}

/// Result alias for single-transaction operations.
pub type TransactionResult = SingleApiResult<Transaction, PartialTransaction>;
/// Result alias for transaction list operations.
pub type TransactionListResult = ListApiResult<Transaction, PartialTransaction>;

impl VirtualCardsClient {
    /// Fetch one transaction by id. `None` when it does not exist.
    pub async fn get_transaction(
        &self,
        id: &str,
    ) -> Result<Option<TransactionResult>, TransactionError> {
        let operation = GraphQlOperation::new(
            "GetTransaction",
            operations::GET_TRANSACTION,
            json!({ "id": id }),
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let Some(value) = response.field("getTransaction") else {
            return Ok(None);
        };
        let record: SealedTransactionRecord = serde_json::from_value(value.clone())
            .map_err(|e| TransactionError::MalformedResponse(e.to_string()))?;
        Ok(Some(unseal_single(&record, &self.unsealer)))
    }

    /// List transactions for one card, one page per call.
    pub async fn list_transactions_by_card_id(
        &self,
        card_id: &str,
        filters: ListFilters,
    ) -> Result<TransactionListResult, TransactionError> {
        let mut variables = filters.variables();
        if let Some(vars) = variables.as_object_mut() {
            vars.insert("cardId".to_string(), json!(card_id));
        }
        let operation = GraphQlOperation::new(
            "ListTransactionsByCardId",
            operations::LIST_TRANSACTIONS_BY_CARD_ID,
            variables,
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let Some(value) = response.field("listTransactionsByCardId") else {
            return Ok(ListApiResult::Success {
                items: Vec::new(),
                next_token: None,
            });
        };
        let page: PaginatedRecords<SealedTransactionRecord> = serde_json::from_value(value.clone())
            .map_err(|e| TransactionError::MalformedResponse(e.to_string()))?;
        Ok(aggregate_page(&page.items, page.next_token, &self.unsealer))
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Funding source operations.
//!
//! Funding sources carry no sealed attributes, so these operations never
//! touch the unsealing pipeline; results are plain entities rather than the
//! success/partial surface the card and transaction families use.

use serde_json::{json, Value};

use crate::client::VirtualCardsClient;
use crate::graphql::operations::{
    self, FundingSourceRecord, PaginatedRecords, ProvisionalFundingSourceRecord,
};
use crate::graphql::{GatewayError, GraphQlOperation, GraphQlResponseError, RawResponse};
use crate::models::{
    CompleteFundingSourceInput, FundingSource, ListFilters, ProvisionalFundingSource,
    SetupFundingSourceInput,
};

use super::error::GraphQlErrorCode;

/// Error family for funding source operations.
#[derive(Debug, thiserror::Error)]
pub enum FundingSourceError {
    #[error("funding source not found")]
    NotFound,

    #[error("provisional funding source not found")]
    ProvisionalNotFound,

    #[error("funding source state does not permit this operation")]
    InvalidState,

    #[error("funding source is not active")]
    NotActive,

    #[error("completion data was rejected by the provider")]
    CompletionDataInvalid,

    /// The provider needs the user to act (e.g. re-authenticate with their
    /// bank) before setup can continue. `interaction_data` is the opaque
    /// provider payload describing what to do.
    #[error("user interaction required to proceed")]
    UserInteractionRequired { interaction_data: Option<Value> },

    #[error("currency not supported")]
    UnsupportedCurrency,

    #[error("identity is not verified")]
    IdentityNotVerified,

    #[error("account is locked")]
    AccountLocked,

    #[error("access denied by the service")]
    Forbidden,

    #[error("funding source request failed: {0}")]
    RequestFailed(#[source] GatewayError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("service returned malformed data: {0}")]
    MalformedResponse(String),

    #[error("service error {error_type}: {message}")]
    Unknown { error_type: String, message: String },
}

impl From<GatewayError> for FundingSourceError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Cancelled => Self::Cancelled,
            GatewayError::Forbidden => Self::Forbidden,
            other => Self::RequestFailed(other),
        }
    }
}

impl FundingSourceError {
    fn from_graphql(error: &GraphQlResponseError) -> Self {
        match GraphQlErrorCode::parse(&error.error_type) {
            GraphQlErrorCode::FundingSourceNotFound => Self::NotFound,
            GraphQlErrorCode::ProvisionalFundingSourceNotFound => Self::ProvisionalNotFound,
            GraphQlErrorCode::FundingSourceState => Self::InvalidState,
            GraphQlErrorCode::FundingSourceNotActive => Self::NotActive,
            GraphQlErrorCode::FundingSourceCompletionDataInvalid => Self::CompletionDataInvalid,
            GraphQlErrorCode::UserInteractionRequired => Self::UserInteractionRequired {
                interaction_data: error.error_info.clone(),
            },
            GraphQlErrorCode::UnsupportedCurrency => Self::UnsupportedCurrency,
            GraphQlErrorCode::IdentityNotVerified => Self::IdentityNotVerified,
            GraphQlErrorCode::AccountLocked => Self::AccountLocked,
            _ => Self::Unknown {
                error_type: error.error_type.clone(),
                message: error.message.clone(),
            },
        }
    }
}

fn check_errors(response: &RawResponse) -> Result<(), FundingSourceError> {
    match response.errors.first() {
        Some(error) => Err(FundingSourceError::from_graphql(error)),
        None => Ok(()),
    }
}

/// One page of funding sources.
#[derive(Debug)]
pub struct FundingSourceList {
    pub items: Vec<FundingSource>,
    pub next_token: Option<String>,
}

impl VirtualCardsClient {
    /// Begin setting up a new funding source. The returned provisional
    /// entity carries the provider payload needed to complete setup.
    pub async fn setup_funding_source(
        &self,
        input: SetupFundingSourceInput,
    ) -> Result<ProvisionalFundingSource, FundingSourceError> {
        let variables = serde_json::to_value(&input)
            .map_err(|e| FundingSourceError::MalformedResponse(e.to_string()))?;
        let operation = GraphQlOperation::new(
            "SetupFundingSource",
            operations::SETUP_FUNDING_SOURCE,
            json!({ "input": variables }),
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let record: ProvisionalFundingSourceRecord =
            required(&response, "setupFundingSource")?;
        Ok(record.into())
    }

    /// Complete a provisional funding source with provider data.
    pub async fn complete_funding_source(
        &self,
        input: CompleteFundingSourceInput,
    ) -> Result<FundingSource, FundingSourceError> {
        let variables = serde_json::to_value(&input)
            .map_err(|e| FundingSourceError::MalformedResponse(e.to_string()))?;
        let operation = GraphQlOperation::new(
            "CompleteFundingSource",
            operations::COMPLETE_FUNDING_SOURCE,
            json!({ "input": variables }),
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let record: FundingSourceRecord = required(&response, "completeFundingSource")?;
        Ok(record.into())
    }

    /// Fetch one funding source by id. `None` when it does not exist.
    pub async fn get_funding_source(
        &self,
        id: &str,
    ) -> Result<Option<FundingSource>, FundingSourceError> {
        let operation = GraphQlOperation::new(
            "GetFundingSource",
            operations::GET_FUNDING_SOURCE,
            json!({ "id": id }),
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let Some(value) = response.field("getFundingSource") else {
            return Ok(None);
        };
        let record: FundingSourceRecord = serde_json::from_value(value.clone())
            .map_err(|e| FundingSourceError::MalformedResponse(e.to_string()))?;
        Ok(Some(record.into()))
    }

    /// List the caller's funding sources, one page per call. Only the limit
    /// and pagination token apply; funding sources have no sort or date
    /// filters.
    pub async fn list_funding_sources(
        &self,
        filters: ListFilters,
    ) -> Result<FundingSourceList, FundingSourceError> {
        let mut variables = filters.variables();
        if let Some(vars) = variables.as_object_mut() {
            vars.remove("sortOrder");
            vars.remove("startDateEpochMs");
            vars.remove("endDateEpochMs");
        }
        let operation = GraphQlOperation::new(
            "ListFundingSources",
            operations::LIST_FUNDING_SOURCES,
            variables,
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let Some(value) = response.field("listFundingSources") else {
            return Ok(FundingSourceList {
                items: Vec::new(),
                next_token: None,
            });
        };
        let page: PaginatedRecords<FundingSourceRecord> = serde_json::from_value(value.clone())
            .map_err(|e| FundingSourceError::MalformedResponse(e.to_string()))?;
        Ok(FundingSourceList {
            items: page.items.into_iter().map(FundingSource::from).collect(),
            next_token: page.next_token,
        })
    }

    /// Cancel a funding source. Cards backed by it stop authorizing.
    pub async fn cancel_funding_source(
        &self,
        id: &str,
    ) -> Result<FundingSource, FundingSourceError> {
        let operation = GraphQlOperation::new(
            "CancelFundingSource",
            operations::CANCEL_FUNDING_SOURCE,
            json!({ "input": { "id": id } }),
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let record: FundingSourceRecord = required(&response, "cancelFundingSource")?;
        Ok(record.into())
    }

    /// Refresh a funding source whose provider data has gone stale. May fail
    /// with [`FundingSourceError::UserInteractionRequired`] when the provider
    /// needs the user to re-authenticate.
    pub async fn refresh_funding_source(
        &self,
        id: &str,
        refresh_data: Value,
    ) -> Result<FundingSource, FundingSourceError> {
        let operation = GraphQlOperation::new(
            "RefreshFundingSource",
            operations::REFRESH_FUNDING_SOURCE,
            json!({ "input": { "id": id, "refreshData": refresh_data } }),
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let record: FundingSourceRecord = required(&response, "refreshFundingSource")?;
        Ok(record.into())
    }

    /// Ask the service to re-review a funding source flagged for review.
    pub async fn review_funding_source(
        &self,
        id: &str,
    ) -> Result<FundingSource, FundingSourceError> {
        let operation = GraphQlOperation::new(
            "ReviewFundingSource",
            operations::REVIEW_FUNDING_SOURCE,
            json!({ "input": { "id": id } }),
        );
        let response = self.gateway.execute(operation).await?;
        check_errors(&response)?;

        let record: FundingSourceRecord = required(&response, "reviewFundingSource")?;
        Ok(record.into())
    }
}

fn required<T: serde::de::DeserializeOwned>(
    response: &RawResponse,
    field: &str,
) -> Result<T, FundingSourceError> {
    let value = response
        .field(field)
        .ok_or_else(|| FundingSourceError::MalformedResponse(format!("missing {field} in response")))?;
    serde_json::from_value(value.clone())
        .map_err(|e| FundingSourceError::MalformedResponse(e.to_string()))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service error-type dispatch.
//!
//! The service tags GraphQL errors with an `errorType` string. Operations
//! match on the closed [`GraphQlErrorCode`] enum instead of the raw string;
//! unrecognized tags fall through to [`GraphQlErrorCode::Unknown`] so new
//! service errors degrade gracefully.

/// Known service error-type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphQlErrorCode {
    IdentityNotVerified,
    AccountLocked,
    CardNotFound,
    CardState,
    VelocityExceeded,
    EntitlementExceeded,
    UnsupportedCurrency,
    TransactionNotFound,
    FundingSourceNotFound,
    FundingSourceNotActive,
    FundingSourceState,
    FundingSourceCompletionDataInvalid,
    ProvisionalFundingSourceNotFound,
    UserInteractionRequired,
    Unknown,
}

impl GraphQlErrorCode {
    /// Parse a wire `errorType` tag.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "IdentityVerificationNotVerifiedError" => Self::IdentityNotVerified,
            "AccountLockedError" => Self::AccountLocked,
            "CardNotFoundError" => Self::CardNotFound,
            "CardStateError" => Self::CardState,
            "VelocityExceededError" => Self::VelocityExceeded,
            "EntitlementExceededError" => Self::EntitlementExceeded,
            "UnsupportedCurrencyError" => Self::UnsupportedCurrency,
            "TransactionNotFoundError" => Self::TransactionNotFound,
            "FundingSourceNotFoundError" => Self::FundingSourceNotFound,
            "FundingSourceNotActiveError" => Self::FundingSourceNotActive,
            "FundingSourceStateError" => Self::FundingSourceState,
            "FundingSourceCompletionDataInvalidError" => Self::FundingSourceCompletionDataInvalid,
            "ProvisionalFundingSourceNotFoundError" => Self::ProvisionalFundingSourceNotFound,
            "FundingSourceRequiresUserInteractionError" => Self::UserInteractionRequired,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_parse() {
        assert_eq!(
            GraphQlErrorCode::parse("AccountLockedError"),
            GraphQlErrorCode::AccountLocked
        );
        assert_eq!(
            GraphQlErrorCode::parse("CardNotFoundError"),
            GraphQlErrorCode::CardNotFound
        );
        assert_eq!(
            GraphQlErrorCode::parse("FundingSourceRequiresUserInteractionError"),
            GraphQlErrorCode::UserInteractionRequired
        );
    }

    #[test]
    fn unknown_tags_fall_back() {
        assert_eq!(
            GraphQlErrorCode::parse("BrandNewServiceError"),
            GraphQlErrorCode::Unknown
        );
        assert_eq!(GraphQlErrorCode::parse(""), GraphQlErrorCode::Unknown);
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pagination and filter parameters for list operations.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::config::DEFAULT_LIST_LIMIT;

/// Result ordering for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn wire_tag(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Inclusive creation-date range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Parameters for paginated list operations.
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    /// Page size; `None` uses [`DEFAULT_LIST_LIMIT`].
    pub limit: Option<i32>,
    /// Opaque continuation token from a previous page.
    pub next_token: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub date_range: Option<DateRange>,
}

impl ListFilters {
    /// Render these filters as GraphQL variables.
    pub fn variables(&self) -> Value {
        let mut vars = Map::new();
        vars.insert(
            "limit".to_string(),
            Value::from(self.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
        );
        if let Some(token) = &self.next_token {
            vars.insert("nextToken".to_string(), Value::from(token.clone()));
        }
        if let Some(order) = self.sort_order {
            vars.insert("sortOrder".to_string(), Value::from(order.wire_tag()));
        }
        if let Some(range) = self.date_range {
            vars.insert(
                "startDateEpochMs".to_string(),
                Value::from(range.start.timestamp_millis() as f64),
            );
            vars.insert(
                "endDateEpochMs".to_string(),
                Value::from(range.end.timestamp_millis() as f64),
            );
        }
        Value::Object(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_filters_use_default_limit_only() {
        let vars = ListFilters::default().variables();
        assert_eq!(vars["limit"], DEFAULT_LIST_LIMIT);
        assert!(vars.get("nextToken").is_none());
        assert!(vars.get("sortOrder").is_none());
        assert!(vars.get("startDateEpochMs").is_none());
    }

    #[test]
    fn full_filters_render_all_variables() {
        let filters = ListFilters {
            limit: Some(25),
            next_token: Some("token".to_string()),
            sort_order: Some(SortOrder::Desc),
            date_range: Some(DateRange {
                start: Utc.timestamp_millis_opt(1_000).unwrap(),
                end: Utc.timestamp_millis_opt(2_000).unwrap(),
            }),
        };
        let vars = filters.variables();
        assert_eq!(vars["limit"], 25);
        assert_eq!(vars["nextToken"], "token");
        assert_eq!(vars["sortOrder"], "DESC");
        assert_eq!(vars["startDateEpochMs"], 1_000.0);
        assert_eq!(vars["endDateEpochMs"], 2_000.0);
    }
}

//! Read-only insight views served by the backend

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::amount::{deserialize_amount, deserialize_optional_amount};

/// Net total per category, sorted by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub total: Decimal,
}

/// Net amount per calendar day
///
/// Rows with an unparseable date on the server come back with `date: null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySpending {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub total_spent: Decimal,
}

/// Plain-language summary sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryText {
    pub summary: String,
}

/// An uploaded transaction row as stored by the backend
///
/// Columns come from the uploaded CSV header (lower-cased, spaces replaced
/// by underscores), so anything beyond the common ones lands in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, JsonValue>,
}

/// Filters for the transactions listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<String>,
}

impl TransactionFilter {
    /// Query parameters in the backend's format (ISO dates)
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start_date {
            params.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            params.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            params.push(("category", category.to_string()));
        }
        params
    }
}

//! Summary insight snapshot

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount::{deserialize_amount, format_currency};

/// Income/expense/net aggregate computed by the backend
///
/// The backend is expected to keep `net == total_income - total_expense`,
/// but the client displays whatever it receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryData {
    #[serde(deserialize_with = "deserialize_amount")]
    pub total_income: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub total_expense: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub net: Decimal,
}

impl SummaryData {
    /// Display strings for the three values
    pub fn render(&self) -> RenderedSummary {
        RenderedSummary {
            income: format_currency(self.total_income),
            expense: format_currency(self.total_expense),
            net: format_currency(self.net),
        }
    }
}

/// Formatted summary, ready to print
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSummary {
    pub income: String,
    pub expense: String,
    pub net: String,
}

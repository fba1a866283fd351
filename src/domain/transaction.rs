use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::Identifiable;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y", "%B %d, %Y"];

/// One row of the finances ledger as delivered by the payments backend.
/// Dates and amounts arrive pre-formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceTransaction {
    pub id: String,
    pub date: String,
    pub amount: String,
    pub purpose: String,
    pub method: String,
    pub payment_id: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FinanceTransaction {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_display_date(&self.date)
    }

    pub fn parsed_amount(&self) -> Option<f64> {
        parse_display_amount(&self.amount)
    }
}

impl Identifiable for FinanceTransaction {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn parse_display_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Strips currency symbols and thousands separators, e.g. `$1,250.00`.
pub fn parse_display_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-'))
        .collect();
    cleaned.parse().ok()
}

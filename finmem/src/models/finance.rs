//! Finance models: transactions detected in text and investment directives

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a detected transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money coming in (salary, refunds, gifts)
    Income,
    /// Money going out (purchases, bills, fees)
    Expense,
    /// Money moved into an investment (directive-declared only; the
    /// message classifier never emits this variant)
    Investment,
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
            Self::Investment => write!(f, "investment"),
        }
    }
}

/// Currencies the amount extractor recognizes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indian rupee (₹, Rs., INR)
    Inr,
    /// US dollar ($, USD)
    Usd,
    /// Euro (€, EUR)
    Eur,
}

impl Default for Currency {
    fn default() -> Self {
        Self::Inr
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inr => write!(f, "INR"),
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
        }
    }
}

/// A single detected monetary transaction derived from text.
///
/// Created transiently per parsed message; persistence is the caller's
/// concern. `confidence` is always within [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinanceEntry {
    /// Income, expense, or (directives only) investment
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Positive transaction amount
    pub amount: f64,

    /// Category label (e.g. "food", "salary", "miscellaneous")
    pub category: String,

    /// Short human-readable description taken from the surrounding words
    pub description: String,

    /// Transaction date (ISO `YYYY-MM-DD` on the wire)
    pub date: NaiveDate,

    /// Heuristic confidence in [0, 1]
    pub confidence: f32,

    /// Detected currency, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,

    /// Payment method keyword match ("cash", "card", "upi", ...), if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    /// Merchant name extracted from capitalized context words, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
}

/// Aggregate result of parsing one message for transactions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedFinanceResult {
    /// Entries that survived the confidence cutoff, in text order
    pub entries: Vec<FinanceEntry>,

    /// Arithmetic mean of entry confidences, 0.0 when no entries were kept
    pub confidence: f32,

    /// The message the entries were derived from
    pub original_message: String,
}

impl ParsedFinanceResult {
    /// Build a result from kept entries, deriving the aggregate confidence.
    pub fn new(entries: Vec<FinanceEntry>, original_message: String) -> Self {
        let confidence = if entries.is_empty() {
            0.0
        } else {
            entries.iter().map(|e| e.confidence).sum::<f32>() / entries.len() as f32
        };
        Self {
            entries,
            confidence,
            original_message,
        }
    }
}

/// How an investment directive expresses the new value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// `new_value` is the absolute value of the holding
    Absolute,
    /// `new_value` is a percentage change
    Percentage,
}

impl Default for ChangeType {
    fn default() -> Self {
        Self::Absolute
    }
}

/// An AI-declared update to an investment's value.
///
/// Validation requires `new_value > 0` and at least one of
/// `investment_id` / `investment_name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvestmentUpdate {
    /// Store identifier of the investment, if the AI knows it
    #[serde(rename = "investmentId", skip_serializing_if = "Option::is_none")]
    pub investment_id: Option<String>,

    /// Human-readable name, used when no identifier is available
    #[serde(rename = "investmentName", skip_serializing_if = "Option::is_none")]
    pub investment_name: Option<String>,

    /// New value, interpreted according to `change_type`
    #[serde(rename = "newValue")]
    pub new_value: f64,

    /// Absolute value or percentage change
    #[serde(rename = "changeType", default)]
    pub change_type: ChangeType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_result_confidence_is_mean() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let entry = |confidence: f32| FinanceEntry {
            entry_type: EntryType::Expense,
            amount: 100.0,
            category: "food".to_string(),
            description: "lunch".to_string(),
            date,
            confidence,
            currency: None,
            payment_method: None,
            merchant: None,
        };
        let result =
            ParsedFinanceResult::new(vec![entry(0.6), entry(0.8)], "msg".to_string());
        assert!((result.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_parsed_result_empty_confidence_is_zero() {
        let result = ParsedFinanceResult::new(vec![], "msg".to_string());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_entry_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EntryType::Expense).unwrap(),
            "\"expense\""
        );
        let parsed: EntryType = serde_json::from_str("\"investment\"").unwrap();
        assert_eq!(parsed, EntryType::Investment);
    }

    #[test]
    fn test_change_type_defaults_to_absolute() {
        let update: InvestmentUpdate =
            serde_json::from_str(r#"{"investmentName":"Gold SIP","newValue":5000}"#).unwrap();
        assert_eq!(update.change_type, ChangeType::Absolute);
        assert_eq!(update.investment_name.as_deref(), Some("Gold SIP"));
    }
}

//! Finance parser: amount extraction + transaction classification over a
//! whole message.

use tracing::debug;

use super::{classify_transaction, extract_amounts};
use crate::models::ParsedFinanceResult;

/// Parse all monetary transactions out of one chat message.
///
/// Pure and synchronous; a message with no currency pattern yields an empty
/// entry list with confidence 0. Amounts whose classified confidence falls
/// below the cutoff are dropped silently.
pub fn parse_finance_from_message(message: &str) -> ParsedFinanceResult {
    let lowered = message.to_lowercase();
    let amounts = extract_amounts(message);

    let entries: Vec<_> = amounts
        .iter()
        .filter_map(|amount| classify_transaction(message, &lowered, amount))
        .collect();

    debug!(
        amounts = amounts.len(),
        kept = entries.len(),
        "finance parse complete"
    );

    ParsedFinanceResult::new(entries, message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;

    #[test]
    fn test_no_currency_yields_empty_result() {
        let result = parse_finance_from_message("let's talk about budgeting");
        assert!(result.entries.is_empty());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.original_message, "let's talk about budgeting");
    }

    #[test]
    fn test_single_expense() {
        let result = parse_finance_from_message("I spent ₹500 on food");
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].entry_type, EntryType::Expense);
        assert_eq!(result.entries[0].amount, 500.0);
        assert_eq!(result.entries[0].category, "food");
        assert!(result.confidence >= 0.5);
    }

    #[test]
    fn test_multiple_amounts_kept_in_order() {
        // The two amounts sit more than a context window apart, so each is
        // classified from its own surroundings.
        let message = "spent ₹200 on lunch today with my colleagues from the office, \
                       and then in the evening I paid ₹3000 rent to the landlord";
        let result = parse_finance_from_message(message);
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0].amount, 200.0);
        assert_eq!(result.entries[0].category, "food");
        assert_eq!(result.entries[1].amount, 3000.0);
        assert_eq!(result.entries[1].category, "rent");
    }

    #[test]
    fn test_confidence_is_mean_of_kept_entries() {
        let result = parse_finance_from_message("spent ₹500 on food");
        assert!((result.confidence - result.entries[0].confidence).abs() < 1e-6);
    }
}

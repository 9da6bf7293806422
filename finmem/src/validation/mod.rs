//! Pure validation predicates applied before extracted data is acted on.
//!
//! Each validator returns a plain bool so callers can filter collections
//! without error plumbing. Invalid items are dropped, not repaired.

use crate::models::{EntryType, FinanceEntry, InvestmentUpdate, MemoryUpdate};

/// Validate a transaction extracted from a user message.
///
/// Message-derived entries may only be income or expense; the investment
/// variant is reserved for AI directives.
pub fn validate_finance_entry(entry: &FinanceEntry) -> bool {
    matches!(entry.entry_type, EntryType::Income | EntryType::Expense)
        && entry.amount > 0.0
        && entry.amount.is_finite()
        && !entry.category.trim().is_empty()
        && !entry.description.trim().is_empty()
        && (0.0..=1.0).contains(&entry.confidence)
}

/// Validate a transaction declared by an AI directive.
///
/// Identical to [`validate_finance_entry`] except the investment variant
/// is also accepted.
pub fn validate_directive_finance_entry(entry: &FinanceEntry) -> bool {
    entry.amount > 0.0
        && entry.amount.is_finite()
        && !entry.category.trim().is_empty()
        && !entry.description.trim().is_empty()
        && (0.0..=1.0).contains(&entry.confidence)
}

/// Validate an AI-declared memory create/update.
pub fn validate_memory_update(update: &MemoryUpdate) -> bool {
    !update.content.trim().is_empty()
        && !update.category.trim().is_empty()
        && (1..=10).contains(&update.importance)
}

/// Validate an AI-declared investment value update.
///
/// Requires a positive new value and at least one way to address the
/// investment (identifier or name).
pub fn validate_investment_update(update: &InvestmentUpdate) -> bool {
    update.new_value > 0.0
        && update.new_value.is_finite()
        && (update
            .investment_id
            .as_deref()
            .map(|id| !id.trim().is_empty())
            .unwrap_or(false)
            || update
                .investment_name
                .as_deref()
                .map(|name| !name.trim().is_empty())
                .unwrap_or(false))
}

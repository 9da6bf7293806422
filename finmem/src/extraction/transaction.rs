//! Transaction classification around one extracted amount.
//!
//! Every decision here is driven by ordered association lists so the
//! first-match-wins tie-break order is deterministic.

use chrono::{Duration, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::{context_window, AmountMatch, CONTEXT_RADIUS, MIN_CONFIDENCE};
use crate::models::{EntryType, FinanceEntry};

const INCOME_KEYWORDS: &[&str] = &[
    "salary", "received", "got", "earned", "income", "bonus", "refund", "cashback", "credited",
];

const EXPENSE_KEYWORDS: &[&str] = &[
    "spent", "paid", "bought", "purchase", "cost", "bill", "expense", "debited", "shopping",
];

/// Ordered income category table; first category with any keyword hit wins.
const INCOME_CATEGORIES: &[(&str, &[&str])] = &[
    ("salary", &["salary", "wage", "payroll", "paycheck"]),
    ("freelance", &["freelance", "gig", "client", "contract work"]),
    ("business", &["business", "sales", "revenue", "profit"]),
    ("investment", &["dividend", "interest", "returns", "capital gain"]),
    ("rental", &["tenant", "rental", "rent received"]),
    ("bonus", &["bonus", "incentive", "commission"]),
    ("gift", &["gift", "gifted", "present"]),
];

/// Ordered expense category table; first category with any keyword hit wins.
const EXPENSE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "food",
        &[
            "food", "lunch", "dinner", "breakfast", "snack", "restaurant", "groceries",
            "grocery", "swiggy", "zomato",
        ],
    ),
    (
        "transportation",
        &[
            "uber", "ola", "taxi", "cab", "bus", "train", "metro", "fuel", "petrol", "diesel",
        ],
    ),
    (
        "entertainment",
        &["movie", "netflix", "concert", "game", "party", "outing"],
    ),
    (
        "shopping",
        &[
            "shopping", "clothes", "frock", "dress", "shirt", "shoes", "amazon", "flipkart",
            "mall",
        ],
    ),
    (
        "utilities",
        &[
            "electricity", "water bill", "internet", "wifi", "recharge", "mobile bill", "gas",
        ],
    ),
    ("rent", &["rent", "landlord"]),
    ("insurance", &["insurance", "premium", "policy"]),
    (
        "medical",
        &["doctor", "medicine", "hospital", "pharmacy", "clinic"],
    ),
    (
        "education",
        &["course", "tuition", "school", "college", "fees", "textbook"],
    ),
    (
        "household",
        &["furniture", "appliance", "repair", "maintenance", "kitchen"],
    ),
];

const ACTION_KEYWORDS: &[&str] = &["spent", "paid", "bought", "received", "got", "earned", "cost"];

/// Distinct currency/context clue tokens, 0.05 confidence each, capped at 0.2
const CLUE_TOKENS: &[&str] = &["₹", "$", "rs", "paid", "bought", "spent"];

/// Ordered payment method table
const PAYMENT_METHODS: &[(&str, &[&str])] = &[
    ("card", &["credit card", "debit card", "card"]),
    ("upi", &["upi", "gpay", "google pay", "phonepe", "paytm"]),
    (
        "net_banking",
        &["netbanking", "net banking", "bank transfer", "neft", "imps"],
    ),
    ("cheque", &["cheque", "check"]),
    ("cash", &["cash"]),
];

lazy_static! {
    /// "at/from Capitalized Words" form
    static ref MERCHANT_AT_FROM: Regex =
        Regex::new(r"\b(?:at|from)\s+([A-Z][A-Za-z]*(?:\s+[A-Z][A-Za-z]*)*)").unwrap();
    /// "Capitalized Words restaurant/store/shop/mall" form
    static ref MERCHANT_VENUE: Regex =
        Regex::new(r"\b([A-Z][A-Za-z]*(?:\s+[A-Z][A-Za-z]*)*)\s+(?:restaurant|store|shop|mall)")
            .unwrap();
}

fn keyword_count(context: &str, keywords: &[&str]) -> usize {
    keywords.iter().map(|kw| context.matches(kw).count()).sum()
}

fn any_keyword(context: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| context.contains(kw))
}

/// Decide income vs expense. Income wins only on a strict majority of
/// keyword occurrences; expense is the default and the tie-break.
fn decide_type(context: &str) -> EntryType {
    let income = keyword_count(context, INCOME_KEYWORDS);
    let expense = keyword_count(context, EXPENSE_KEYWORDS);
    if income > expense {
        EntryType::Income
    } else {
        EntryType::Expense
    }
}

/// First-match-wins category lookup, with the type-specific fallback.
fn decide_category(context: &str, entry_type: EntryType) -> (String, bool) {
    let (table, fallback) = match entry_type {
        EntryType::Income => (INCOME_CATEGORIES, "other_income"),
        _ => (EXPENSE_CATEGORIES, "miscellaneous"),
    };
    for (category, keywords) in table {
        if any_keyword(context, keywords) {
            return ((*category).to_string(), true);
        }
    }
    (fallback.to_string(), false)
}

/// Build a short description from the original-case words around the match.
///
/// Takes up to 3 words before and 3 after the matched span, drops tokens of
/// length <= 2 or containing digits, and keeps the first 5 remaining. Falls
/// back to "Transaction" when nothing usable is left.
fn build_description(message: &str, amount: &AmountMatch) -> String {
    let mut before: Vec<&str> = Vec::new();
    let mut after: Vec<&str> = Vec::new();

    for (offset, token) in message.split_whitespace().map(|tok| {
        let offset = tok.as_ptr() as usize - message.as_ptr() as usize;
        (offset, tok)
    }) {
        let token_end = offset + token.len();
        if token_end <= amount.start {
            before.push(token);
        } else if offset >= amount.end {
            after.push(token);
        }
        // Tokens overlapping the matched span are the amount itself.
    }

    let candidates = before
        .iter()
        .rev()
        .take(3)
        .rev()
        .chain(after.iter().take(3));

    let words: Vec<&str> = candidates
        .filter(|tok| tok.len() > 2 && !tok.chars().any(|c| c.is_ascii_digit()))
        .take(5)
        .copied()
        .collect();

    if words.is_empty() {
        "Transaction".to_string()
    } else {
        words.join(" ")
    }
}

/// Resolve the transaction date from relative day words in the context.
fn decide_date(context: &str) -> chrono::NaiveDate {
    let today = Utc::now().date_naive();
    if context.contains("yesterday") {
        today - Duration::days(1)
    } else if context.contains("tomorrow") {
        today + Duration::days(1)
    } else {
        today
    }
}

/// Additive confidence score, clamped to [0, 1].
fn score_confidence(context: &str, amount: f64, category_hit: bool) -> f32 {
    let mut confidence: f32 = 0.5;

    if any_keyword(context, ACTION_KEYWORDS) {
        confidence += 0.2;
    }
    if amount < 10.0 || amount > 1_000_000.0 {
        confidence -= 0.1;
    }
    if category_hit {
        confidence += 0.1;
    }

    let clue_bonus = CLUE_TOKENS
        .iter()
        .filter(|clue| context.contains(*clue))
        .count() as f32
        * 0.05;
    confidence += clue_bonus.min(0.2);

    confidence.clamp(0.0, 1.0)
}

fn decide_payment_method(context: &str) -> String {
    for (method, keywords) in PAYMENT_METHODS {
        if any_keyword(context, keywords) {
            return (*method).to_string();
        }
    }
    "unknown".to_string()
}

fn decide_merchant(original_context: &str) -> Option<String> {
    if let Some(caps) = MERCHANT_AT_FROM.captures(original_context) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = MERCHANT_VENUE.captures(original_context) {
        return Some(caps[1].to_string());
    }
    None
}

/// Classify one extracted amount into a finance entry.
///
/// Returns `None` when the derived confidence falls below the cutoff; the
/// amount is dropped silently and the parser moves on.
pub fn classify_transaction(
    message: &str,
    lowered: &str,
    amount: &AmountMatch,
) -> Option<FinanceEntry> {
    let context = context_window(lowered, amount.start, amount.end, CONTEXT_RADIUS);
    let original_context = context_window(message, amount.start, amount.end, CONTEXT_RADIUS);

    let entry_type = decide_type(context);
    let (category, category_hit) = decide_category(context, entry_type);
    let confidence = score_confidence(context, amount.amount, category_hit);

    if confidence < MIN_CONFIDENCE {
        debug!(
            amount = amount.amount,
            confidence, "dropping low-confidence transaction candidate"
        );
        return None;
    }

    Some(FinanceEntry {
        entry_type,
        amount: amount.amount,
        category,
        description: build_description(message, amount),
        date: decide_date(context),
        confidence,
        currency: Some(amount.currency),
        payment_method: Some(decide_payment_method(context)),
        merchant: decide_merchant(original_context),
    })
}

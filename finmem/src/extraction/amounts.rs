//! Currency amount extraction via ordered regex patterns.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::models::Currency;

/// A monetary amount located in a message.
///
/// `start`/`end` are byte offsets of the full pattern match in the
/// lowercased message (identical to offsets in the original message, since
/// lowercasing the supported scripts is length-preserving).
#[derive(Debug, Clone, PartialEq)]
pub struct AmountMatch {
    /// Parsed amount, always finite and positive
    pub amount: f64,
    /// Currency inferred from the matched substring
    pub currency: Currency,
    /// Start offset of the match
    pub start: usize,
    /// End offset of the match
    pub end: usize,
}

lazy_static! {
    /// Ordered currency patterns. Symbol-prefixed forms first, then the
    /// abbreviated rupee form, then bare number + currency word.
    static ref AMOUNT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"₹\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"\brs\.?\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"\$\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"€\s*([\d,]+(?:\.\d+)?)").unwrap(),
        Regex::new(r"\b([\d,]+(?:\.\d+)?)\s*(rupees|rupee|inr|dollars|dollar|usd|euros|euro|eur)\b")
            .unwrap(),
    ];
}

/// Infer the currency from the matched substring.
fn infer_currency(matched: &str) -> Currency {
    if matched.contains('₹')
        || matched.contains("rs")
        || matched.contains("inr")
        || matched.contains("rupee")
    {
        Currency::Inr
    } else if matched.contains('$') || matched.contains("usd") || matched.contains("dollar") {
        Currency::Usd
    } else if matched.contains('€') || matched.contains("eur") {
        Currency::Eur
    } else {
        Currency::Inr
    }
}

/// Find all monetary amounts in a message.
///
/// Scans the lowercased message with each pattern in order, strips thousands
/// separators, and rejects non-positive or unparseable values. Exact
/// `(amount, start)` duplicates are dropped so each distinct match position
/// is used at most once, and results come back in left-to-right order.
pub fn extract_amounts(message: &str) -> Vec<AmountMatch> {
    let lowered = message.to_lowercase();
    let mut seen: HashSet<(u64, usize)> = HashSet::new();
    let mut matches = Vec::new();

    for pattern in AMOUNT_PATTERNS.iter() {
        for caps in pattern.captures_iter(&lowered) {
            let full = caps.get(0).expect("capture group 0 always present");
            let digits = match caps.get(1) {
                Some(group) => group.as_str().replace(',', ""),
                None => continue,
            };
            let amount: f64 = match digits.parse() {
                Ok(value) => value,
                Err(_) => continue,
            };
            if !amount.is_finite() || amount <= 0.0 {
                continue;
            }
            if !seen.insert((amount.to_bits(), full.start())) {
                continue;
            }
            matches.push(AmountMatch {
                amount,
                currency: infer_currency(full.as_str()),
                start: full.start(),
                end: full.end(),
            });
        }
    }

    matches.sort_by_key(|m| m.start);
    matches
}

//! Trigger-phrase scanning for memory-worthy statements.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Whole-string greetings and acknowledgements that never produce memories
const GREETINGS: &[&str] = &["hi", "hello", "hey", "ok", "yes", "no", "thanks", "thank you"];

/// Literal trigger phrases grouped by topic, scanned over the lowercased
/// message. Multi-word phrases keep false positives down.
const MEMORY_PATTERNS: &[(&str, &[&str])] = &[
    (
        "spending",
        &[
            "big spender",
            "i spend",
            "spent too much",
            "overspent",
            "impulse buy",
            "shopping spree",
            "waste money",
        ],
    ),
    (
        "saving",
        &[
            "save money",
            "saving up",
            "savings goal",
            "emergency fund",
            "put aside",
            "cut down on",
        ],
    ),
    (
        "income",
        &[
            "my salary",
            "my income",
            "got a raise",
            "new job",
            "side hustle",
            "paycheck",
        ],
    ),
    (
        "investment",
        &[
            "invest",
            "investment plan",
            "mutual fund",
            "stocks",
            "portfolio",
            "fixed deposit",
            "crypto",
        ],
    ),
    (
        "debt",
        &["loan", "debt", "emi", "credit card bill", "owe", "borrowed"],
    ),
    (
        "goals",
        &[
            "financial goal",
            "my goal",
            "planning to buy",
            "want to buy",
            "dream of",
            "aim to",
        ],
    ),
    (
        "family",
        &[
            "my wife",
            "my husband",
            "my kids",
            "my family",
            "my parents",
            "getting married",
        ],
    ),
    (
        "housing",
        &[
            "my rent",
            "moving to",
            "new apartment",
            "buying a house",
            "home loan",
            "landlord",
        ],
    ),
];

lazy_static! {
    /// Broad finance-relatedness check used for the generic fallback match
    static ref FINANCE_HINT: Regex =
        Regex::new(r"money|financial|₹|dollar|price|cost|buy|sell|pay|spend|earn|save|invest")
            .unwrap();
}

/// A trigger phrase located in a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTrigger {
    /// The matched phrase (or the whole message for the generic fallback)
    pub pattern: String,
    /// Topic group the phrase belongs to ("generic" for the fallback)
    pub topic: String,
    /// Start offset of the match in the lowercased message
    pub start: usize,
    /// End offset of the match
    pub end: usize,
}

/// Scan a message for memory trigger phrases.
///
/// Short-circuits to empty for messages under 5 characters and for
/// whole-string greetings. When no phrase matches but the message looks
/// finance-related and is longer than 10 characters, a single generic
/// whole-message trigger is synthesized.
pub fn find_memory_triggers(message: &str) -> Vec<MemoryTrigger> {
    let trimmed = message.trim();
    if trimmed.len() < 5 {
        return Vec::new();
    }
    let lowered_trimmed = trimmed.to_lowercase();
    if GREETINGS.contains(&lowered_trimmed.as_str()) {
        return Vec::new();
    }

    let lowered = message.to_lowercase();
    let mut seen: HashSet<(String, usize)> = HashSet::new();
    let mut triggers = Vec::new();

    for (topic, phrases) in MEMORY_PATTERNS {
        for phrase in *phrases {
            let mut from = 0;
            while let Some(found) = lowered[from..].find(phrase) {
                let start = from + found;
                let end = start + phrase.len();
                if seen.insert(((*phrase).to_string(), start)) {
                    triggers.push(MemoryTrigger {
                        pattern: (*phrase).to_string(),
                        topic: (*topic).to_string(),
                        start,
                        end,
                    });
                }
                from = end;
            }
        }
    }

    triggers.sort_by_key(|t| t.start);

    if triggers.is_empty() && trimmed.len() > 10 && FINANCE_HINT.is_match(&lowered) {
        triggers.push(MemoryTrigger {
            pattern: lowered.clone(),
            topic: "generic".to_string(),
            start: 0,
            end: lowered.len(),
        });
    }

    triggers
}

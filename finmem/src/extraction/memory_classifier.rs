//! Memory classification around one trigger phrase.

use std::collections::HashSet;
use tracing::debug;

use super::{context_window, MemoryTrigger, CONTEXT_RADIUS, MIN_CONFIDENCE};
use crate::models::{memory::MAX_KEYWORDS, MemoryEntry, Sentiment};

/// Ordered category table, matched against the context window OR the
/// trigger phrase itself; first hit wins.
const MEMORY_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "spending",
        &["spend", "spender", "shopping", "purchase", "expense", "bought"],
    ),
    (
        "habits",
        &["habit", "always", "usually", "every month", "routine", "tend to"],
    ),
    (
        "income",
        &["salary", "income", "earn", "paycheck", "raise", "side hustle"],
    ),
    (
        "investments",
        &["invest", "stock", "mutual fund", "portfolio", "crypto", "deposit"],
    ),
    (
        "debts",
        &["loan", "debt", "emi", "owe", "borrow", "credit card"],
    ),
    (
        "goals",
        &["goal", "plan", "target", "aim", "dream", "want to"],
    ),
    (
        "relationships",
        &["wife", "husband", "family", "kids", "parents", "married"],
    ),
    (
        "housing",
        &["rent", "house", "apartment", "flat", "landlord", "home loan"],
    ),
];

/// Base importance per category
const IMPORTANCE_BASES: &[(&str, u8)] = &[
    ("goals", 8),
    ("investments", 8),
    ("debts", 7),
    ("spending", 7),
    ("income", 7),
    ("housing", 7),
    ("relationships", 6),
    ("habits", 6),
    ("conversation", 5),
];

/// Human-readable content prefix per category
const CONTENT_PREFIXES: &[(&str, &str)] = &[
    ("spending", "User identified their spending behavior: "),
    ("habits", "User described a financial habit: "),
    ("income", "User shared income information: "),
    ("investments", "User discussed investments: "),
    ("debts", "User mentioned debt or borrowing: "),
    ("goals", "User expressed a financial goal: "),
    ("relationships", "User shared family or relationship context: "),
    ("housing", "User discussed housing: "),
    ("conversation", "User mentioned in conversation: "),
];

const INTENSIFIERS: &[&str] = &["very", "really", "extremely"];

const INTENT_WORDS: &[&str] = &["plan", "will", "going to"];

const FINANCE_TERMS: &[&str] = &[
    "money", "spend", "save", "invest", "loan", "salary", "budget", "financial", "debt",
    "income",
];

/// Phrases that carry strong signal on their own
const STRONG_PATTERNS: &[&str] = &[
    "big spender",
    "financial goal",
    "investment plan",
    "save money",
];

/// Generic intent clue tokens, 0.05 confidence each, capped at 0.2
const INTENT_CLUES: &[&str] = &["very", "really", "plan", "will", "going to", "want to"];

const KEYWORD_STOPLIST: &[&str] = &[
    "this", "that", "with", "have", "will", "from", "they", "been", "were", "their", "would",
    "about", "there", "going", "what", "when", "your",
];

const POSITIVE_WORDS: &[&str] = &[
    "happy", "great", "good", "excited", "love", "wonderful", "achieved", "saved", "profit",
    "win",
];

const NEGATIVE_WORDS: &[&str] = &[
    "worried", "stress", "bad", "problem", "lost", "fear", "anxious", "broke", "struggle",
    "debt",
];

fn any_keyword(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

/// First-match-wins category lookup over context or pattern text.
fn decide_category(context: &str, pattern: &str) -> (String, bool) {
    for (category, keywords) in MEMORY_CATEGORIES {
        if any_keyword(context, keywords) || any_keyword(pattern, keywords) {
            return ((*category).to_string(), true);
        }
    }
    ("conversation".to_string(), false)
}

/// Base importance plus capped intensifier and intent bonuses.
fn score_importance(category: &str, context: &str) -> u8 {
    let base = IMPORTANCE_BASES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, base)| *base)
        .unwrap_or(5);

    let mut importance = base;
    if any_keyword(context, INTENSIFIERS) {
        importance = (importance + 1).min(10);
    }
    if any_keyword(context, INTENT_WORDS) {
        importance = (importance + 1).min(10);
    }
    importance
}

fn content_for(category: &str, message: &str) -> String {
    let prefix = CONTENT_PREFIXES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, prefix)| *prefix)
        .unwrap_or("User mentioned in conversation: ");
    format!("{}\"{}\"", prefix, message)
}

/// Additive confidence score, clamped to [0, 1].
fn score_confidence(context: &str, pattern: &str, category_hit: bool) -> f32 {
    let mut confidence: f32 = 0.5;

    if any_keyword(context, FINANCE_TERMS) {
        confidence += 0.2;
    }
    if STRONG_PATTERNS.iter().any(|strong| pattern.contains(strong)) {
        confidence += 0.3;
    }
    if category_hit {
        confidence += 0.1;
    }

    let clue_bonus = INTENT_CLUES
        .iter()
        .filter(|clue| context.contains(*clue))
        .count() as f32
        * 0.05;
    confidence += clue_bonus.min(0.2);

    confidence.clamp(0.0, 1.0)
}

/// Lowercased, punctuation-stripped tokens longer than 3 chars, minus the
/// stop list, deduped, capped.
fn extract_keywords(message: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    message
        .to_lowercase()
        .split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|token| token.len() > 3 && !KEYWORD_STOPLIST.contains(&token.as_str()))
        .filter(|token| seen.insert(token.clone()))
        .take(MAX_KEYWORDS)
        .collect()
}

/// Strict-majority sentiment over the whole message; tie is neutral.
fn decide_sentiment(message: &str) -> Sentiment {
    let lowered = message.to_lowercase();
    let positive = POSITIVE_WORDS
        .iter()
        .filter(|word| lowered.contains(*word))
        .count();
    let negative = NEGATIVE_WORDS
        .iter()
        .filter(|word| lowered.contains(*word))
        .count();

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Classify one trigger into a memory entry.
///
/// Returns `None` when the derived confidence falls below the cutoff.
pub fn classify_memory(message: &str, lowered: &str, trigger: &MemoryTrigger) -> Option<MemoryEntry> {
    let context = context_window(lowered, trigger.start, trigger.end, CONTEXT_RADIUS);

    let (category, category_hit) = decide_category(context, &trigger.pattern);
    let confidence = score_confidence(context, &trigger.pattern, category_hit);

    if confidence < MIN_CONFIDENCE {
        debug!(
            pattern = %trigger.pattern,
            confidence, "dropping low-confidence memory candidate"
        );
        return None;
    }

    Some(MemoryEntry {
        importance: score_importance(&category, context),
        content: content_for(&category, message),
        category,
        confidence,
        keywords: extract_keywords(message),
        sentiment: decide_sentiment(message),
    })
}

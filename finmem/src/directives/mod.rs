//! Parsing of structured directives embedded in AI-generated replies.
//!
//! The AI model is instructed to declare records inline, e.g.
//! `FINANCE_ENTRY: {"type":"expense","amount":100,...}`. This module scans
//! a reply for the three directive families, deserializes each JSON payload
//! into a schema-validated struct (malformed payloads are skipped, never
//! fatal), and strips every recognized marker-plus-payload span from the
//! text shown to the user.

use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::models::{
    ChangeType, Currency, EntryType, FinanceEntry, InvestmentUpdate, MemoryUpdate,
};

/// Finance directive markers; the `_MULTIPLE` form (JSON array payload)
/// must be scanned before the singular form it prefixes.
const FINANCE_MULTI_MARKER: &str = "FINANCE_ENTRY_MULTIPLE";
const FINANCE_MARKER: &str = "FINANCE_ENTRY";

/// Memory directive markers. The bare `MEMORY` marker is matched with word
/// boundaries so it never re-matches inside the longer forms.
const MEMORY_MARKERS: &[&str] = &["UPDATE_MEMORY", "CREATE_MEMORY", "SAVE_MEMORY", "MEMORY"];

/// Investment directive markers
const INVESTMENT_MARKERS: &[&str] =
    &["INVESTMENT_UPDATE", "UPDATE_INVESTMENT", "INVESTMENT_VALUE_UPDATE"];

/// Recognized but unused; stripped from the reply without being parsed.
const CONSOLIDATE_MARKER: &str = "CONSOLIDATE_MEMORY";

lazy_static! {
    static ref FINANCE_MULTI_RE: Regex = payload_regex(FINANCE_MULTI_MARKER, true);
    static ref FINANCE_RE: Regex = payload_regex(FINANCE_MARKER, false);
    static ref MEMORY_RES: Vec<Regex> =
        MEMORY_MARKERS.iter().map(|m| payload_regex(m, false)).collect();
    static ref INVESTMENT_RES: Vec<Regex> =
        INVESTMENT_MARKERS.iter().map(|m| payload_regex(m, false)).collect();
    static ref STRIP_RES: Vec<Regex> = {
        let mut markers: Vec<(&str, bool)> = vec![
            (FINANCE_MULTI_MARKER, true),
            (FINANCE_MARKER, false),
            (CONSOLIDATE_MARKER, false),
        ];
        markers.extend(MEMORY_MARKERS.iter().map(|m| (*m, false)));
        markers.extend(INVESTMENT_MARKERS.iter().map(|m| (*m, false)));
        markers.iter().map(|(m, array)| payload_regex(m, *array)).collect()
    };
    static ref BLANK_LINES: Regex = Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").unwrap();
}

/// Build the marker-plus-payload regex: the literal marker (word-bounded),
/// an optional colon, then a non-greedy brace (or bracket) span.
fn payload_regex(marker: &str, array: bool) -> Regex {
    let payload = if array {
        r"(\[(?s:.*?)\]|\{(?s:.*?)\})"
    } else {
        r"(\{(?s:.*?)\})"
    };
    Regex::new(&format!(r"\b{}\b\s*:?\s*{}", regex::escape(marker), payload)).unwrap()
}

/// Wire shape of a finance directive payload
#[derive(Debug, Deserialize)]
struct FinanceDirective {
    #[serde(rename = "type")]
    entry_type: EntryType,
    amount: f64,
    category: String,
    description: String,
    date: Option<NaiveDate>,
    #[serde(default = "default_confidence")]
    confidence: f32,
    currency: Option<Currency>,
    #[serde(rename = "paymentMethod")]
    payment_method: Option<String>,
    merchant: Option<String>,
}

fn default_confidence() -> f32 {
    0.8
}

impl From<FinanceDirective> for FinanceEntry {
    fn from(directive: FinanceDirective) -> Self {
        FinanceEntry {
            entry_type: directive.entry_type,
            amount: directive.amount,
            category: directive.category,
            description: directive.description,
            date: directive.date.unwrap_or_else(|| Utc::now().date_naive()),
            confidence: directive.confidence.clamp(0.0, 1.0),
            currency: directive.currency,
            payment_method: directive.payment_method,
            merchant: directive.merchant,
        }
    }
}

/// Wire shape of a memory directive payload
#[derive(Debug, Deserialize)]
struct MemoryDirective {
    content: String,
    category: String,
    importance: Option<u8>,
    confidence: Option<f32>,
}

impl From<MemoryDirective> for MemoryUpdate {
    fn from(directive: MemoryDirective) -> Self {
        MemoryUpdate {
            content: directive.content,
            category: directive.category,
            importance: directive.importance.unwrap_or(5).clamp(1, 10),
            confidence: directive.confidence.unwrap_or(0.8).clamp(0.0, 1.0),
        }
    }
}

/// Wire shape of an investment directive payload
#[derive(Debug, Deserialize)]
struct InvestmentDirective {
    #[serde(rename = "investmentId")]
    investment_id: Option<String>,
    #[serde(rename = "investmentName")]
    investment_name: Option<String>,
    #[serde(rename = "newValue")]
    new_value: f64,
    #[serde(rename = "changeType", default)]
    change_type: ChangeType,
}

impl From<InvestmentDirective> for InvestmentUpdate {
    fn from(directive: InvestmentDirective) -> Self {
        InvestmentUpdate {
            investment_id: directive.investment_id,
            investment_name: directive.investment_name,
            new_value: directive.new_value,
            change_type: directive.change_type,
        }
    }
}

/// Everything declared by one AI reply, plus the cleaned reply text
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAiResponse {
    /// Reply with every directive span removed, blank runs collapsed, trimmed
    pub reply: String,
    /// Finance entries declared by the reply
    pub finance_entries: Vec<FinanceEntry>,
    /// Memory creates/updates declared by the reply
    pub memory_updates: Vec<MemoryUpdate>,
    /// Investment value updates declared by the reply
    pub investment_updates: Vec<InvestmentUpdate>,
    /// Composite confidence over the three directive families
    pub confidence: f32,
}

fn parse_payload<T: serde::de::DeserializeOwned>(payload: &str) -> Option<T> {
    match serde_json::from_str(payload) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(%err, "skipping unparseable directive payload");
            None
        }
    }
}

fn collect_finance(text: &str) -> Vec<FinanceEntry> {
    let mut entries = Vec::new();

    for caps in FINANCE_MULTI_RE.captures_iter(text) {
        let payload = &caps[1];
        if payload.starts_with('[') {
            if let Some(directives) = parse_payload::<Vec<FinanceDirective>>(payload) {
                entries.extend(directives.into_iter().map(FinanceEntry::from));
            }
        } else if let Some(directive) = parse_payload::<FinanceDirective>(payload) {
            entries.push(directive.into());
        }
    }

    // The leading word boundary keeps the singular marker from matching
    // inside FINANCE_ENTRY_MULTIPLE.
    for caps in FINANCE_RE.captures_iter(text) {
        if let Some(directive) = parse_payload::<FinanceDirective>(&caps[1]) {
            entries.push(directive.into());
        }
    }

    entries
}

fn collect_memory(text: &str) -> Vec<MemoryUpdate> {
    let mut updates = Vec::new();
    for re in MEMORY_RES.iter() {
        for caps in re.captures_iter(text) {
            if let Some(directive) = parse_payload::<MemoryDirective>(&caps[1]) {
                updates.push(directive.into());
            }
        }
    }
    updates
}

fn collect_investment(text: &str) -> Vec<InvestmentUpdate> {
    let mut updates = Vec::new();
    for re in INVESTMENT_RES.iter() {
        for caps in re.captures_iter(text) {
            if let Some(directive) = parse_payload::<InvestmentDirective>(&caps[1]) {
                updates.push(directive.into());
            }
        }
    }
    updates
}

/// Strip every recognized marker-plus-payload span, collapse runs of blank
/// lines to a single one, and trim.
fn clean_reply(text: &str) -> String {
    let mut cleaned = text.to_string();
    for re in STRIP_RES.iter() {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }
    let cleaned = BLANK_LINES.replace_all(&cleaned, "\n\n");
    cleaned.trim().to_string()
}

/// Composite confidence: mean of the three family components, where each
/// empty family contributes 1.0, finance contributes its entries' mean
/// confidence, memory contributes mean importance/10, and any investment
/// updates contribute a flat 0.9.
fn aggregate_confidence(
    finance: &[FinanceEntry],
    memory: &[MemoryUpdate],
    investment: &[InvestmentUpdate],
) -> f32 {
    let finance_component = if finance.is_empty() {
        1.0
    } else {
        finance.iter().map(|e| e.confidence).sum::<f32>() / finance.len() as f32
    };
    let memory_component = if memory.is_empty() {
        1.0
    } else {
        memory.iter().map(|u| u.importance as f32 / 10.0).sum::<f32>() / memory.len() as f32
    };
    let investment_component = if investment.is_empty() { 1.0 } else { 0.9 };

    (finance_component + memory_component + investment_component) / 3.0
}

/// Parse all directives out of an AI reply and clean the reply text.
pub fn parse_ai_response(reply: &str) -> ParsedAiResponse {
    let finance_entries = collect_finance(reply);
    let memory_updates = collect_memory(reply);
    let investment_updates = collect_investment(reply);
    let confidence =
        aggregate_confidence(&finance_entries, &memory_updates, &investment_updates);

    debug!(
        finance = finance_entries.len(),
        memory = memory_updates.len(),
        investment = investment_updates.len(),
        "parsed AI reply directives"
    );

    ParsedAiResponse {
        reply: clean_reply(reply),
        finance_entries,
        memory_updates,
        investment_updates,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finance_directive_round_trip() {
        let reply = "Noted your lunch!\n\nFINANCE_ENTRY: {\"type\":\"expense\",\"amount\":100,\
                     \"category\":\"food\",\"description\":\"lunch\",\"confidence\":0.9}\n\nKeep it up.";
        let parsed = parse_ai_response(reply);
        assert_eq!(parsed.finance_entries.len(), 1);
        let entry = &parsed.finance_entries[0];
        assert_eq!(entry.entry_type, EntryType::Expense);
        assert_eq!(entry.amount, 100.0);
        assert_eq!(entry.category, "food");
        assert_eq!(entry.description, "lunch");
        assert!((entry.confidence - 0.9).abs() < 1e-6);
        assert!(!parsed.reply.contains("FINANCE_ENTRY"));
        assert!(parsed.reply.contains("Noted your lunch!"));
        assert!(parsed.reply.contains("Keep it up."));
    }

    #[test]
    fn test_finance_multiple_array_payload() {
        let reply = r#"FINANCE_ENTRY_MULTIPLE: [
            {"type":"expense","amount":100,"category":"food","description":"lunch"},
            {"type":"income","amount":5000,"category":"salary","description":"pay"}
        ]"#;
        let parsed = parse_ai_response(reply);
        assert_eq!(parsed.finance_entries.len(), 2);
        assert_eq!(parsed.finance_entries[1].entry_type, EntryType::Income);
        // Missing confidence defaults to 0.8.
        assert!((parsed.finance_entries[0].confidence - 0.8).abs() < 1e-6);
        assert!(parsed.reply.is_empty());
    }

    #[test]
    fn test_multiple_marker_not_double_counted() {
        let reply = r#"FINANCE_ENTRY_MULTIPLE: [{"type":"expense","amount":10,"category":"food","description":"tea"}]"#;
        let parsed = parse_ai_response(reply);
        assert_eq!(parsed.finance_entries.len(), 1);
    }

    #[test]
    fn test_memory_directive_variants() {
        for marker in ["UPDATE_MEMORY", "MEMORY", "CREATE_MEMORY", "SAVE_MEMORY"] {
            let reply = format!(
                "{}: {{\"content\":\"User saves regularly\",\"category\":\"habits\",\"importance\":6}}",
                marker
            );
            let parsed = parse_ai_response(&reply);
            assert_eq!(parsed.memory_updates.len(), 1, "marker {marker}");
            assert_eq!(parsed.memory_updates[0].category, "habits");
            assert_eq!(parsed.memory_updates[0].importance, 6);
            assert!(!parsed.reply.contains(marker));
        }
    }

    #[test]
    fn test_bare_memory_marker_does_not_rematch_longer_forms() {
        let reply = r#"UPDATE_MEMORY: {"content":"fact","category":"habits"}"#;
        let parsed = parse_ai_response(reply);
        assert_eq!(parsed.memory_updates.len(), 1);
    }

    #[test]
    fn test_investment_directive_defaults() {
        let reply = r#"INVESTMENT_UPDATE: {"investmentName":"Gold SIP","newValue":52000}"#;
        let parsed = parse_ai_response(reply);
        assert_eq!(parsed.investment_updates.len(), 1);
        assert_eq!(parsed.investment_updates[0].change_type, ChangeType::Absolute);
        assert_eq!(
            parsed.investment_updates[0].investment_name.as_deref(),
            Some("Gold SIP")
        );
    }

    #[test]
    fn test_malformed_payload_skipped() {
        let reply = "FINANCE_ENTRY: {not valid json} but the advice still stands";
        let parsed = parse_ai_response(reply);
        assert!(parsed.finance_entries.is_empty());
        // The malformed span is still stripped from the reply.
        assert!(!parsed.reply.contains("FINANCE_ENTRY"));
        assert!(parsed.reply.contains("advice still stands"));
    }

    #[test]
    fn test_consolidate_marker_stripped_but_not_parsed() {
        let reply = r#"CONSOLIDATE_MEMORY: {"ids":["a","b"]} Done."#;
        let parsed = parse_ai_response(reply);
        assert!(parsed.memory_updates.is_empty());
        assert!(!parsed.reply.contains("CONSOLIDATE_MEMORY"));
        assert_eq!(parsed.reply, "Done.");
    }

    #[test]
    fn test_blank_lines_collapsed_and_trimmed() {
        let reply = "Advice first.\n\nUPDATE_MEMORY: {\"content\":\"x\",\"category\":\"habits\"}\n\n\n\nAdvice last.";
        let parsed = parse_ai_response(reply);
        assert!(!parsed.reply.contains("\n\n\n"));
        assert!(parsed.reply.starts_with("Advice first."));
        assert!(parsed.reply.ends_with("Advice last."));
    }

    #[test]
    fn test_confidence_all_empty_is_one() {
        let parsed = parse_ai_response("Just friendly advice, nothing structured.");
        assert!((parsed.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_confidence_composite() {
        let reply = "FINANCE_ENTRY: {\"type\":\"expense\",\"amount\":100,\"category\":\"food\",\
                     \"description\":\"lunch\",\"confidence\":0.6}\n\
                     UPDATE_MEMORY: {\"content\":\"x\",\"category\":\"habits\",\"importance\":5}\n\
                     INVESTMENT_UPDATE: {\"investmentName\":\"SIP\",\"newValue\":100}";
        let parsed = parse_ai_response(reply);
        // (0.6 + 0.5 + 0.9) / 3
        assert!((parsed.confidence - (0.6 + 0.5 + 0.9) / 3.0).abs() < 1e-6);
    }
}

//! Per-turn orchestration: run every extractor over one chat exchange.

use tracing::info;

use crate::config::ExtractionConfig;
use crate::directives::{parse_ai_response, ParsedAiResponse};
use crate::extraction::{parse_finance_from_message, parse_memory_from_message};
use crate::models::{FinanceEntry, InvestmentUpdate, MemoryUpdate, ParsedFinanceResult, ParsedMemoryResult};
use crate::validation::{
    validate_directive_finance_entry, validate_finance_entry, validate_investment_update,
    validate_memory_update,
};

/// Everything extracted from one user message / AI reply exchange.
///
/// `finance` and `memory` come from the user's message; the directive
/// fields come from the AI reply when one was supplied. All collections
/// hold only entries that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnExtraction {
    /// Transactions detected in the user message
    pub finance: ParsedFinanceResult,
    /// Memory-worthy statements detected in the user message
    pub memory: ParsedMemoryResult,
    /// Cleaned AI reply text, when a reply was supplied
    pub reply: Option<String>,
    /// Validated finance entries declared by the AI reply
    pub directive_finance: Vec<FinanceEntry>,
    /// Validated memory updates declared by the AI reply
    pub directive_memories: Vec<MemoryUpdate>,
    /// Validated investment updates declared by the AI reply
    pub investment_updates: Vec<InvestmentUpdate>,
}

impl TurnExtraction {
    /// All validated transactions for the turn: message-derived first,
    /// then directive-declared.
    pub fn all_finance_entries(&self) -> Vec<FinanceEntry> {
        let mut entries = self.finance.entries.clone();
        entries.extend(self.directive_finance.iter().cloned());
        entries
    }
}

/// Runs the message extractors and the directive parser for each turn.
#[derive(Debug, Clone, Default)]
pub struct ExtractionPipeline {
    config: ExtractionConfig,
}

impl ExtractionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Process one chat exchange.
    ///
    /// The user message always goes through the finance and memory parsers.
    /// When the AI reply is supplied its directives are parsed too; invalid
    /// entries from either source are dropped.
    pub fn process_turn(&self, message: &str, ai_reply: Option<&str>) -> TurnExtraction {
        let min_confidence = self.config.min_confidence;

        let mut finance = parse_finance_from_message(message);
        finance.entries.retain(|entry| {
            validate_finance_entry(entry) && entry.confidence >= min_confidence
        });
        let finance = ParsedFinanceResult::new(finance.entries, finance.original_message);

        let mut memory = parse_memory_from_message(message);
        memory.entries.retain(|entry| entry.confidence >= min_confidence);
        let memory = ParsedMemoryResult::new(memory.entries, memory.original_message);

        let parsed_reply: Option<ParsedAiResponse> = ai_reply.map(parse_ai_response);
        let (reply, directive_finance, directive_memories, investment_updates) =
            match parsed_reply {
                Some(parsed) => {
                    let finance_entries: Vec<FinanceEntry> = parsed
                        .finance_entries
                        .into_iter()
                        .filter(validate_directive_finance_entry)
                        .collect();
                    let memory_updates: Vec<MemoryUpdate> = parsed
                        .memory_updates
                        .into_iter()
                        .filter(validate_memory_update)
                        .collect();
                    let investments: Vec<InvestmentUpdate> = parsed
                        .investment_updates
                        .into_iter()
                        .filter(validate_investment_update)
                        .collect();
                    (Some(parsed.reply), finance_entries, memory_updates, investments)
                }
                None => (None, Vec::new(), Vec::new(), Vec::new()),
            };

        info!(
            message_finance = finance.entries.len(),
            message_memory = memory.entries.len(),
            directive_finance = directive_finance.len(),
            directive_memories = directive_memories.len(),
            investments = investment_updates.len(),
            "turn extraction complete"
        );

        TurnExtraction {
            finance,
            memory,
            reply,
            directive_finance,
            directive_memories,
            investment_updates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;

    #[test]
    fn test_message_only_turn() {
        let pipeline = ExtractionPipeline::new();
        let turn = pipeline.process_turn("I spent ₹500 on food yesterday", None);
        assert_eq!(turn.finance.entries.len(), 1);
        assert_eq!(turn.finance.entries[0].entry_type, EntryType::Expense);
        assert!(turn.reply.is_none());
        assert!(turn.directive_finance.is_empty());
    }

    #[test]
    fn test_reply_directives_merge_into_turn() {
        let pipeline = ExtractionPipeline::new();
        let reply = "Logged!\n\nFINANCE_ENTRY: {\"type\":\"expense\",\"amount\":250,\
                     \"category\":\"transportation\",\"description\":\"cab\"}";
        let turn = pipeline.process_turn("I spent ₹500 on food yesterday", Some(reply));
        assert_eq!(turn.finance.entries.len(), 1);
        assert_eq!(turn.directive_finance.len(), 1);
        assert_eq!(turn.all_finance_entries().len(), 2);
        assert_eq!(turn.reply.as_deref(), Some("Logged!"));
    }

    #[test]
    fn test_invalid_directive_entries_dropped() {
        let pipeline = ExtractionPipeline::new();
        let reply = "FINANCE_ENTRY: {\"type\":\"expense\",\"amount\":-5,\
                     \"category\":\"food\",\"description\":\"bad\"}";
        let turn = pipeline.process_turn("hello there friend", Some(reply));
        assert!(turn.directive_finance.is_empty());
    }

    #[test]
    fn test_raised_min_confidence_tightens_results() {
        let strict = ExtractionPipeline::with_config(ExtractionConfig {
            min_confidence: 0.95,
        });
        // "spent ₹500 on food" scores 0.9, under the raised bar.
        let turn = strict.process_turn("spent ₹500 on food", None);
        assert!(turn.finance.entries.is_empty());
        assert_eq!(turn.finance.confidence, 0.0);
    }

    #[test]
    fn test_memory_and_finance_extracted_from_same_message() {
        let pipeline = ExtractionPipeline::new();
        let turn =
            pipeline.process_turn("I am a big spender, just spent ₹2000 on shopping", None);
        assert!(!turn.finance.entries.is_empty());
        assert!(!turn.memory.entries.is_empty());
    }
}

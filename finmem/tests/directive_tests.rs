//! Integration tests for AI reply directive parsing
//!
//! These tests cover the directive surface as a whole:
//! - Extraction and reply cleaning working together
//! - Validation applied to directive-declared records
//! - Mixed replies carrying several directive families at once

use finmem::prelude::*;

#[test]
fn test_round_trip_extraction_and_cleaning() {
    let reply = "Here's my advice.\n\nFINANCE_ENTRY: {\"type\":\"expense\",\"amount\":100,\
                 \"category\":\"food\",\"description\":\"lunch\",\"confidence\":0.9}\n\nEat well!";
    let parsed = parse_ai_response(reply);

    assert_eq!(parsed.finance_entries.len(), 1);
    let entry = &parsed.finance_entries[0];
    assert_eq!(entry.entry_type, EntryType::Expense);
    assert_eq!(entry.amount, 100.0);
    assert_eq!(entry.category, "food");
    assert_eq!(entry.description, "lunch");
    assert!((entry.confidence - 0.9).abs() < 1e-6);

    assert!(!parsed.reply.contains("FINANCE_ENTRY"));
    assert!(!parsed.reply.contains("lunch"));
    assert!(parsed.reply.contains("Here's my advice."));
    assert!(parsed.reply.contains("Eat well!"));
}

#[test]
fn test_memory_update_with_trailing_prose() {
    let reply = "UPDATE_MEMORY: {\"content\":\"User saves regularly\",\"category\":\"habits\",\
                 \"importance\":6}\n\nThat's a great habit to keep up.";
    let parsed = parse_ai_response(reply);

    assert_eq!(parsed.memory_updates.len(), 1);
    assert_eq!(parsed.memory_updates[0].category, "habits");
    assert_eq!(parsed.memory_updates[0].importance, 6);
    assert!(!parsed.reply.contains("UPDATE_MEMORY"));
    assert_eq!(parsed.reply, "That's a great habit to keep up.");
}

#[test]
fn test_mixed_directive_families() {
    let reply = "Summary of your day:\n\
        FINANCE_ENTRY: {\"type\":\"expense\",\"amount\":450,\"category\":\"food\",\"description\":\"dinner\"}\n\
        UPDATE_MEMORY: {\"content\":\"User eats out on Fridays\",\"category\":\"habits\"}\n\
        INVESTMENT_UPDATE: {\"investmentName\":\"Index Fund\",\"newValue\":120000}\n\
        All recorded.";
    let parsed = parse_ai_response(reply);

    assert_eq!(parsed.finance_entries.len(), 1);
    assert_eq!(parsed.memory_updates.len(), 1);
    assert_eq!(parsed.investment_updates.len(), 1);
    assert!(parsed.reply.contains("Summary of your day:"));
    assert!(parsed.reply.contains("All recorded."));
    for marker in ["FINANCE_ENTRY", "UPDATE_MEMORY", "INVESTMENT_UPDATE"] {
        assert!(!parsed.reply.contains(marker), "{marker} left in reply");
    }
}

#[test]
fn test_array_and_singular_finance_together() {
    let reply = "FINANCE_ENTRY_MULTIPLE: [\
        {\"type\":\"expense\",\"amount\":100,\"category\":\"food\",\"description\":\"tea\"},\
        {\"type\":\"expense\",\"amount\":50,\"category\":\"food\",\"description\":\"snack\"}]\n\
        FINANCE_ENTRY: {\"type\":\"income\",\"amount\":7000,\"category\":\"freelance\",\"description\":\"gig\"}";
    let parsed = parse_ai_response(reply);

    assert_eq!(parsed.finance_entries.len(), 3);
    assert_eq!(parsed.finance_entries[2].entry_type, EntryType::Income);
    assert!(parsed.reply.is_empty());
}

#[test]
fn test_malformed_payload_never_panics_or_leaks() {
    for reply in [
        "FINANCE_ENTRY: {\"amount\": }",
        "UPDATE_MEMORY: {\"content\": 42}",
        "INVESTMENT_UPDATE: {}",
        "FINANCE_ENTRY: {\"type\":\"teleport\",\"amount\":1,\"category\":\"x\",\"description\":\"y\"}",
    ] {
        let parsed = parse_ai_response(reply);
        assert!(parsed.finance_entries.is_empty(), "{reply}");
        assert!(parsed.memory_updates.is_empty(), "{reply}");
        assert!(parsed.investment_updates.is_empty(), "{reply}");
    }
}

#[test]
fn test_directive_validation_pipeline() {
    // One valid and one invalid entry in the same reply: the pipeline keeps
    // only the valid one.
    let reply = "FINANCE_ENTRY_MULTIPLE: [\
        {\"type\":\"expense\",\"amount\":100,\"category\":\"food\",\"description\":\"tea\"},\
        {\"type\":\"expense\",\"amount\":0,\"category\":\"food\",\"description\":\"free?\"}]";
    let pipeline = ExtractionPipeline::new();
    let turn = pipeline.process_turn("thanks for the help", Some(reply));

    assert_eq!(turn.directive_finance.len(), 1);
    assert_eq!(turn.directive_finance[0].amount, 100.0);
}

#[test]
fn test_investment_update_validation() {
    let valid = InvestmentUpdate {
        investment_id: None,
        investment_name: Some("Gold SIP".to_string()),
        new_value: 52000.0,
        change_type: ChangeType::Absolute,
    };
    assert!(validate_investment_update(&valid));

    let percentage = InvestmentUpdate {
        change_type: ChangeType::Percentage,
        new_value: 12.5,
        ..valid.clone()
    };
    assert!(validate_investment_update(&percentage));

    let nameless = InvestmentUpdate {
        investment_name: None,
        ..valid
    };
    assert!(!validate_investment_update(&nameless));
}

#[test]
fn test_reply_with_no_directives_passes_through() {
    let reply = "You're doing great, keep saving a little every month.";
    let parsed = parse_ai_response(reply);
    assert_eq!(parsed.reply, reply);
    assert!((parsed.confidence - 1.0).abs() < 1e-6);
}

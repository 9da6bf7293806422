//! Memory parser: trigger scanning + memory classification over a whole
//! message.

use tracing::debug;

use super::{classify_memory, find_memory_triggers};
use crate::models::ParsedMemoryResult;

/// Parse all memory-worthy statements out of one chat message.
///
/// Pure and synchronous. Greetings, very short messages, and messages with
/// no trigger phrase (and no finance relatedness) yield an empty entry list
/// with confidence 0.
pub fn parse_memory_from_message(message: &str) -> ParsedMemoryResult {
    let lowered = message.to_lowercase();
    let triggers = find_memory_triggers(message);

    let entries: Vec<_> = triggers
        .iter()
        .filter_map(|trigger| classify_memory(message, &lowered, trigger))
        .collect();

    debug!(
        triggers = triggers.len(),
        kept = entries.len(),
        "memory parse complete"
    );

    ParsedMemoryResult::new(entries, message.to_string())
}

//! Heuristic extraction pipeline for chat messages.
//!
//! Two independent parsers run over every incoming message: the finance
//! parser (currency amounts + transaction classification) and the memory
//! parser (trigger phrases + memory classification). Both are pure functions
//! over the message string and share no state, so they can run concurrently
//! per request.

mod amounts;
mod finance;
mod memory;
mod memory_classifier;
mod memory_patterns;
mod transaction;

pub use amounts::{extract_amounts, AmountMatch};
pub use finance::parse_finance_from_message;
pub use memory::parse_memory_from_message;
pub use memory_classifier::classify_memory;
pub use memory_patterns::{find_memory_triggers, MemoryTrigger};
pub use transaction::classify_transaction;

/// Radius, in characters, of the context window around a match
pub const CONTEXT_RADIUS: usize = 50;

/// Confidence cutoff below which candidates are silently dropped
pub const MIN_CONFIDENCE: f32 = 0.5;

/// Slice a ±`radius`-character window around `[start, end)` out of `text`.
///
/// Offsets are byte positions from regex matches; the window edges are
/// walked back to char boundaries so multibyte currency symbols (₹, €)
/// never split a code point.
pub(crate) fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let mut lo = start;
    let mut steps = radius;
    while lo > 0 && steps > 0 {
        lo -= 1;
        if text.is_char_boundary(lo) {
            steps -= 1;
        }
    }
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }

    let mut hi = end.min(text.len());
    let mut steps = radius;
    while hi < text.len() && steps > 0 {
        hi += 1;
        if text.is_char_boundary(hi) {
            steps -= 1;
        }
    }
    while hi < text.len() && !text.is_char_boundary(hi) {
        hi += 1;
    }

    &text[lo..hi]
}

//! Relevance scoring between stored memories and a conversation topic.
//!
//! One pure scorer, two call-site policies. The context-building policy and
//! the user-facing listing policy deliberately differ (auto-include clause
//! and threshold strictness) and must not be unified.

use chrono::{Duration, Utc};

use crate::models::Memory;

/// Minimum relevance for a memory to enter the AI context (inclusive)
pub const CONTEXT_THRESHOLD: f32 = 0.3;

/// Minimum relevance for a memory to appear in a user listing (exclusive)
pub const LISTING_THRESHOLD: f32 = 0.3;

/// Days within which an access counts as "recent" for auto-inclusion
const RECENT_ACCESS_DAYS: i64 = 7;

/// Importance above which a memory is always included in context
const AUTO_INCLUDE_IMPORTANCE: u8 = 7;

/// Compute the topical relevance of a memory to a conversation topic.
///
/// Pure and idempotent: identical inputs always produce identical output
/// (modulo the recency term, which reads the memory's own timestamps against
/// the current instant). The score accumulates:
///
/// - +0.4 when any memory category appears in the topic, or the topic's
///   first word appears in a category
/// - +0.1 per memory keyword found in the topic
/// - +0.3 when any memory theme appears in the topic
/// - +0.2 for an access within 7 days, else +0.1 within 30 days
/// - + importance/10 × 0.2
///
/// clamped to [0, 1].
pub fn calculate_relevance_score(memory: &Memory, topic: &str) -> f32 {
    let topic = topic.to_lowercase();
    let mut score = 0.0f32;

    let first_word = topic.split_whitespace().next().unwrap_or("");
    let category_hit = memory.categories.iter().any(|category| {
        let category = category.to_lowercase();
        topic.contains(&category) || (!first_word.is_empty() && category.contains(first_word))
    });
    if category_hit {
        score += 0.4;
    }

    let keyword_hits = memory
        .keywords
        .iter()
        .filter(|keyword| topic.contains(&keyword.to_lowercase()))
        .count();
    score += 0.1 * keyword_hits as f32;

    if memory
        .themes
        .iter()
        .any(|theme| topic.contains(&theme.to_lowercase()))
    {
        score += 0.3;
    }

    if let Some(last_accessed) = memory.last_accessed {
        let age = Utc::now().signed_duration_since(last_accessed);
        if age <= Duration::days(7) {
            score += 0.2;
        } else if age <= Duration::days(30) {
            score += 0.1;
        }
    }

    score += (memory.importance_score as f32 / 10.0) * 0.2;

    score.clamp(0.0, 1.0)
}

fn accessed_within(memory: &Memory, days: i64) -> bool {
    memory
        .last_accessed
        .map(|at| Utc::now().signed_duration_since(at) <= Duration::days(days))
        .unwrap_or(false)
}

/// Context-building policy: rank a user's memories against a topic and take
/// the top `limit`.
///
/// A memory accessed within the last 7 days, or with importance above 7, is
/// always a candidate regardless of score; everything else must reach the
/// context threshold. Candidates are ordered by descending score.
pub fn select_memories_for_context(
    memories: &[Memory],
    topic: &str,
    limit: usize,
) -> Vec<(Memory, f32)> {
    let mut scored: Vec<(Memory, f32)> = memories
        .iter()
        .map(|memory| (memory.clone(), calculate_relevance_score(memory, topic)))
        .filter(|(memory, score)| {
            accessed_within(memory, RECENT_ACCESS_DAYS)
                || memory.importance_score > AUTO_INCLUDE_IMPORTANCE
                || *score >= CONTEXT_THRESHOLD
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}

/// Listing policy: keep memories scoring strictly above the listing
/// threshold. No auto-include clause, no access-metadata side effects.
pub fn filter_memories_for_listing(memories: &[Memory], topic: &str) -> Vec<Memory> {
    memories
        .iter()
        .filter(|memory| calculate_relevance_score(memory, topic) > LISTING_THRESHOLD)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemoryBuilder;

    fn memory(categories: &[&str], keywords: &[&str], importance: u8) -> Memory {
        MemoryBuilder::new("test memory")
            .categories(categories.iter().map(|s| s.to_string()).collect())
            .keywords(keywords.iter().map(|s| s.to_string()).collect())
            .importance(importance)
            .build()
    }

    #[test]
    fn test_category_match_scores() {
        let m = memory(&["spending"], &[], 5);
        let score = calculate_relevance_score(&m, "my spending this month");
        // 0.4 category + 0.1 importance term (5/10 * 0.2).
        assert!((score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_topic_first_word_matches_category() {
        let m = memory(&["spending habits"], &[], 5);
        let score = calculate_relevance_score(&m, "spending");
        assert!(score >= 0.4);
    }

    #[test]
    fn test_keyword_hits_accumulate() {
        let m = memory(&[], &["rent", "landlord"], 5);
        let with_both = calculate_relevance_score(&m, "rent talk with my landlord");
        let with_one = calculate_relevance_score(&m, "rent is due");
        assert!(with_both > with_one);
        assert!((with_both - with_one - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_recent_access_boost() {
        let mut m = memory(&[], &[], 5);
        let base = calculate_relevance_score(&m, "anything");
        m.record_access();
        let boosted = calculate_relevance_score(&m, "anything");
        assert!((boosted - base - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_stale_access_boost() {
        let mut m = memory(&[], &[], 5);
        m.last_accessed = Some(Utc::now() - Duration::days(20));
        let score = calculate_relevance_score(&m, "anything");
        // 0.1 stale-access + 0.1 importance term.
        assert!((score - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_score_clamped_to_one() {
        let mut m = memory(
            &["spending"],
            &["rent", "food", "loan", "salary", "budget", "goal", "save"],
            10,
        );
        m.record_access();
        m.themes = vec!["spending".to_string()];
        let score =
            calculate_relevance_score(&m, "spending rent food loan salary budget goal save");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_idempotent() {
        let m = memory(&["goals"], &["vacation"], 8);
        let topic = "saving for a vacation";
        assert_eq!(
            calculate_relevance_score(&m, topic),
            calculate_relevance_score(&m, topic)
        );
    }

    #[test]
    fn test_context_policy_auto_includes_important_memories() {
        let important = memory(&["unrelated"], &[], 9);
        let irrelevant = memory(&["unrelated"], &[], 5);
        let selected = select_memories_for_context(
            &[important.clone(), irrelevant],
            "completely different topic",
            10,
        );
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].0.importance_score, 9);
    }

    #[test]
    fn test_context_policy_auto_includes_recently_accessed() {
        let mut recent = memory(&["unrelated"], &[], 5);
        recent.record_access();
        let selected =
            select_memories_for_context(&[recent], "completely different topic", 10);
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_context_policy_orders_and_truncates() {
        let strong = memory(&["spending"], &["spending"], 9);
        let weak = memory(&["spending"], &[], 8);
        let selected =
            select_memories_for_context(&[weak, strong], "spending review", 1);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].0.importance_score, 9);
    }

    #[test]
    fn test_listing_policy_is_strict() {
        // Importance 10 alone contributes exactly 0.2; a bare category hit
        // plus low importance sits exactly at the boundary region.
        let exactly_low = memory(&[], &[], 10);
        assert!(filter_memories_for_listing(&[exactly_low], "topic").is_empty());

        let relevant = memory(&["spending"], &[], 5);
        let kept = filter_memories_for_listing(&[relevant], "spending review");
        assert_eq!(kept.len(), 1);
    }
}

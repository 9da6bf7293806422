//! Memory models: transient parse output and the persisted memory record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of keywords carried on a memory
pub const MAX_KEYWORDS: usize = 10;

/// Sentiment of a memory-worthy statement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// More positive than negative word hits
    Positive,
    /// More negative than positive word hits
    Negative,
    /// Tie or no hits
    Neutral,
}

impl Default for Sentiment {
    fn default() -> Self {
        Self::Neutral
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Where a persisted memory originally came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MemorySourceType {
    /// Extracted from a chat message
    Conversation,
    /// Derived from analyzing stored transactions
    TransactionAnalysis,
    /// Derived from the user's onboarding profile
    ProfileData,
    /// Imported from an external system
    ExternalData,
}

impl Default for MemorySourceType {
    fn default() -> Self {
        Self::Conversation
    }
}

/// A memory-worthy statement extracted from one message.
///
/// Transient value object; callers promote kept entries to [`Memory`]
/// records for persistence. `importance` is within [1, 10] and
/// `confidence` within [0, 1] for every entry the classifier emits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryEntry {
    /// Category label ("spending", "goals", "conversation", ...)
    pub category: String,

    /// Human-readable content: per-category prefix plus the quoted message
    pub content: String,

    /// Importance in [1, 10]
    pub importance: u8,

    /// Heuristic confidence in [0, 1]
    pub confidence: f32,

    /// Lowercased content keywords, deduped, at most [`MAX_KEYWORDS`]
    pub keywords: Vec<String>,

    /// Sentiment of the whole source message
    pub sentiment: Sentiment,
}

/// Aggregate result of parsing one message for memories
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedMemoryResult {
    /// Entries that survived the confidence cutoff, in text order
    pub entries: Vec<MemoryEntry>,

    /// Arithmetic mean of entry confidences, 0.0 when no entries were kept
    pub confidence: f32,

    /// The message the entries were derived from
    pub original_message: String,
}

impl ParsedMemoryResult {
    /// Build a result from kept entries, deriving the aggregate confidence.
    pub fn new(entries: Vec<MemoryEntry>, original_message: String) -> Self {
        let confidence = if entries.is_empty() {
            0.0
        } else {
            entries.iter().map(|e| e.confidence).sum::<f32>() / entries.len() as f32
        };
        Self {
            entries,
            confidence,
            original_message,
        }
    }
}

/// An AI-declared memory create/update, parsed from a reply directive
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryUpdate {
    /// The fact to remember
    pub content: String,

    /// Category label
    pub category: String,

    /// Importance in [1, 10], defaulting to mid-scale when omitted
    #[serde(default = "default_importance")]
    pub importance: u8,

    /// Confidence in [0, 1], defaulting to 0.8 when omitted
    #[serde(default = "default_directive_confidence")]
    pub confidence: f32,
}

fn default_importance() -> u8 {
    5
}

fn default_directive_confidence() -> f32 {
    0.8
}

/// Persisted memory record about the user's financial behavior.
///
/// The external store owns the lifecycle; this crate only constructs,
/// scores, and updates these records. Invariants: `importance_score` is
/// always within [1, 10] and `confidence_score` within [0, 1] (both are
/// clamped on construction and mutation); [`Memory::record_access`]
/// increments `access_count` exactly once and refreshes `last_accessed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Memory {
    /// Unique identifier for the memory
    pub id: String,

    /// The actual content of the memory
    pub content: String,

    /// Category labels, ordered; a single-element list when built from a
    /// [`MemoryEntry`]
    pub categories: Vec<String>,

    /// Importance in [1, 10]
    pub importance_score: u8,

    /// Confidence in [0, 1]
    pub confidence_score: f32,

    /// Lowercased keywords, deduped, at most [`MAX_KEYWORDS`]
    pub keywords: Vec<String>,

    /// Sentiment at extraction time
    pub sentiment: Sentiment,

    /// Broader themes used by the relevance scorer
    pub themes: Vec<String>,

    /// Where the memory came from
    pub source_type: MemorySourceType,

    /// The message the memory was extracted from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_message: Option<String>,

    /// When the memory was last accessed
    pub last_accessed: Option<DateTime<Utc>>,

    /// How many times the memory has been accessed
    pub access_count: u32,

    /// Whether the memory is only valid for a window of time
    pub is_temporal: bool,

    /// Start of the validity window (temporal memories only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,

    /// End of the validity window (temporal memories only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,

    /// When the memory was created
    pub created_at: DateTime<Utc>,

    /// When the memory was last modified
    pub updated_at: DateTime<Utc>,
}

impl Memory {
    /// Create a new memory with minimal information.
    pub fn new(id: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            content,
            categories: Vec::new(),
            importance_score: 5,
            confidence_score: 0.5,
            keywords: Vec::new(),
            sentiment: Sentiment::Neutral,
            themes: Vec::new(),
            source_type: MemorySourceType::Conversation,
            source_message: None,
            last_accessed: None,
            access_count: 0,
            is_temporal: false,
            valid_from: None,
            valid_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a builder for more complex memory creation
    pub fn builder<S: Into<String>>(content: S) -> MemoryBuilder {
        MemoryBuilder::new(content)
    }

    /// Promote a transient parse entry to a persistable record.
    ///
    /// The entry-level `category` becomes a one-element `categories` list
    /// and the source message is kept for provenance.
    pub fn from_entry(entry: &MemoryEntry, source_message: &str) -> Self {
        MemoryBuilder::new(entry.content.clone())
            .category(entry.category.clone())
            .importance(entry.importance)
            .confidence(entry.confidence)
            .keywords(entry.keywords.clone())
            .sentiment(entry.sentiment)
            .source_message(source_message)
            .build()
    }

    /// Record an access to this memory.
    ///
    /// Increments `access_count` exactly once and refreshes `last_accessed`.
    pub fn record_access(&mut self) {
        self.last_accessed = Some(Utc::now());
        self.access_count += 1;
    }

    /// Refresh `updated_at` after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Set the importance, clamped to [1, 10].
    pub fn set_importance(&mut self, importance: u8) {
        self.importance_score = importance.clamp(1, 10);
    }

    /// Set the confidence, clamped to [0, 1].
    pub fn set_confidence(&mut self, confidence: f32) {
        self.confidence_score = confidence.clamp(0.0, 1.0);
    }
}

/// Builder for creating Memory instances
pub struct MemoryBuilder {
    memory: Memory,
}

impl MemoryBuilder {
    /// Create a new memory builder with an auto-generated UUID.
    pub fn new<S: Into<String>>(content: S) -> Self {
        Self {
            memory: Memory::new(Uuid::new_v4().to_string(), content.into()),
        }
    }

    /// Create a builder with an explicit identifier (store round-trips).
    pub fn with_id<S: Into<String>>(id: S, content: S) -> Self {
        Self {
            memory: Memory::new(id.into(), content.into()),
        }
    }

    /// Add a single category label.
    pub fn category<S: Into<String>>(mut self, category: S) -> Self {
        self.memory.categories.push(category.into());
        self
    }

    /// Replace the category list.
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.memory.categories = categories;
        self
    }

    /// Set the importance score, clamped to [1, 10].
    pub fn importance(mut self, importance: u8) -> Self {
        self.memory.importance_score = importance.clamp(1, 10);
        self
    }

    /// Set the confidence score, clamped to [0, 1].
    pub fn confidence(mut self, confidence: f32) -> Self {
        self.memory.confidence_score = confidence.clamp(0.0, 1.0);
        self
    }

    /// Set the keywords, deduped and capped at [`MAX_KEYWORDS`].
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.memory.keywords = keywords
            .into_iter()
            .filter(|k| seen.insert(k.clone()))
            .take(MAX_KEYWORDS)
            .collect();
        self
    }

    /// Set the sentiment.
    pub fn sentiment(mut self, sentiment: Sentiment) -> Self {
        self.memory.sentiment = sentiment;
        self
    }

    /// Set the themes.
    pub fn themes(mut self, themes: Vec<String>) -> Self {
        self.memory.themes = themes;
        self
    }

    /// Set the source type.
    pub fn source_type(mut self, source_type: MemorySourceType) -> Self {
        self.memory.source_type = source_type;
        self
    }

    /// Keep the message the memory was extracted from.
    pub fn source_message<S: Into<String>>(mut self, message: S) -> Self {
        self.memory.source_message = Some(message.into());
        self
    }

    /// Mark the memory as temporal with a validity window.
    pub fn temporal(
        mut self,
        valid_from: Option<DateTime<Utc>>,
        valid_until: Option<DateTime<Utc>>,
    ) -> Self {
        self.memory.is_temporal = true;
        self.memory.valid_from = valid_from;
        self.memory.valid_until = valid_until;
        self
    }

    /// Build the final Memory instance
    pub fn build(self) -> Memory {
        self.memory
    }
}

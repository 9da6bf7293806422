//! # Finmem
//!
//! Heuristic natural-language extraction pipeline for personal-finance chat
//! assistants. Finmem takes free-text chat messages and AI-generated replies
//! and produces structured, confidence-scored records:
//!
//! - **Finance entries**: monetary transactions (income/expense) detected in
//!   user messages via ordered currency patterns and keyword classification.
//! - **Memory entries**: memory-worthy personal/financial statements with
//!   category, importance, sentiment, and keywords.
//! - **Directives**: structured JSON payloads embedded in AI replies
//!   (`FINANCE_ENTRY: {...}`, `UPDATE_MEMORY: {...}`, ...), parsed and
//!   stripped from the user-visible reply.
//! - **Relevance scores**: topical closeness between stored memories and a
//!   conversation topic, used to rank memories for AI context building.
//!
//! ## Quick Start
//!
//! ```rust
//! use finmem::prelude::*;
//!
//! let finance = parse_finance_from_message("I spent ₹500 on food yesterday");
//! assert_eq!(finance.entries.len(), 1);
//! assert_eq!(finance.entries[0].entry_type, EntryType::Expense);
//!
//! let memory = parse_memory_from_message("I am a big spender");
//! assert_eq!(memory.entries[0].category, "spending");
//! ```
//!
//! ## Architecture
//!
//! All parsers are pure, synchronous functions over immutable input strings:
//! no shared state, no I/O, safe to run concurrently per request. Persistence
//! and the AI model are external collaborators reached through explicit
//! handles (see [`storage::MemoryStore`]), never ambient singletons. Failure
//! inside the pipeline is always expressed as "produced nothing" or a
//! lower-confidence result, never as an error.

pub mod config;
pub mod context;
pub mod directives;
pub mod extraction;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod relevance;
pub mod storage;
pub mod validation;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    // Re-export the top-level parsing entry points
    pub use crate::directives::{parse_ai_response, ParsedAiResponse};
    pub use crate::extraction::{parse_finance_from_message, parse_memory_from_message};
    pub use crate::pipeline::{ExtractionPipeline, TurnExtraction};
    pub use crate::context::{build_memory_context, MemoryContext};

    // Re-export config types
    pub use crate::config::{
        ConfigBuilder, ExtractionConfig, FinmemConfig, LogFormat, LogLevel, LoggingConfig,
        RelevanceConfig,
    };

    // Re-export model types
    pub use crate::models::{
        ChangeType, Currency, EntryType, FinanceEntry, InvestmentUpdate, Memory, MemoryBuilder,
        MemoryEntry, MemorySourceType, MemoryUpdate, ParsedFinanceResult, ParsedMemoryResult,
        Sentiment,
    };

    // Re-export relevance scoring
    pub use crate::relevance::{
        calculate_relevance_score, filter_memories_for_listing, select_memories_for_context,
    };

    // Re-export validators
    pub use crate::validation::{
        validate_directive_finance_entry, validate_finance_entry, validate_investment_update,
        validate_memory_update,
    };

    // Re-export collaborator traits
    pub use crate::storage::{InMemoryStore, MemoryStore};

    // Re-export essential result type
    pub use crate::{FinmemError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for Finmem operations
#[derive(Debug, thiserror::Error)]
pub enum FinmemError {
    /// Error during storage operations (external collaborator)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LogError),

    /// Errors related to memory record operations
    #[error("Memory error: {0}")]
    Memory(String),

    /// Other unclassified errors
    #[error("{0}")]
    Other(String),
}

impl From<crate::config::ConfigError> for FinmemError {
    fn from(err: crate::config::ConfigError) -> Self {
        FinmemError::Configuration(err.to_string())
    }
}

/// Result type for Finmem operations
pub type Result<T> = std::result::Result<T, FinmemError>;

//! Data models for extracted records and persisted memories

pub mod finance;
pub mod memory;

pub use finance::{
    ChangeType, Currency, EntryType, FinanceEntry, InvestmentUpdate, ParsedFinanceResult,
};
pub use memory::{
    Memory, MemoryBuilder, MemoryEntry, MemorySourceType, MemoryUpdate, ParsedMemoryResult,
    Sentiment,
};

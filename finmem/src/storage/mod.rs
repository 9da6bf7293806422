//! Storage seam for persisted memories.
//!
//! The crate never owns a database; callers hand in any [`MemoryStore`]
//! implementation. An in-memory store is provided for tests and for
//! embedding without a backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::Memory;
use crate::{FinmemError, Result};

/// Persistence operations the context builder needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Fetch every memory belonging to a user.
    async fn memories_for_user(&self, user_id: &str) -> Result<Vec<Memory>>;

    /// Persist a new memory for a user, returning the stored record.
    async fn save_memory(&self, user_id: &str, memory: Memory) -> Result<Memory>;

    /// Persist changed fields of an existing memory.
    async fn update_memory(&self, user_id: &str, memory: &Memory) -> Result<()>;
}

/// Keeps memories in a `RwLock`ed map, keyed by user.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    memories: RwLock<HashMap<String, Vec<Memory>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn memories_for_user(&self, user_id: &str) -> Result<Vec<Memory>> {
        let memories = self.memories.read().await;
        Ok(memories.get(user_id).cloned().unwrap_or_default())
    }

    async fn save_memory(&self, user_id: &str, memory: Memory) -> Result<Memory> {
        let mut memories = self.memories.write().await;
        memories
            .entry(user_id.to_string())
            .or_default()
            .push(memory.clone());
        Ok(memory)
    }

    async fn update_memory(&self, user_id: &str, memory: &Memory) -> Result<()> {
        let mut memories = self.memories.write().await;
        let user_memories = memories
            .get_mut(user_id)
            .ok_or_else(|| FinmemError::Storage(format!("no memories for user {user_id}")))?;
        let slot = user_memories
            .iter_mut()
            .find(|existing| existing.id == memory.id)
            .ok_or_else(|| FinmemError::Storage(format!("memory {} not found", memory.id)))?;
        *slot = memory.clone();
        Ok(())
    }
}

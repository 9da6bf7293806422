//! Builds the memory block injected into the AI prompt for one turn.

use tracing::debug;

use crate::models::Memory;
use crate::relevance::select_memories_for_context;
use crate::storage::MemoryStore;
use crate::Result;

/// Memories chosen for one prompt, plus their rendered text block.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryContext {
    /// Ready-to-inject prompt section; empty when nothing was selected
    pub text: String,
    /// The selected memories, most relevant first
    pub memories: Vec<Memory>,
}

impl MemoryContext {
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }
}

fn render(memories: &[(Memory, f32)]) -> String {
    if memories.is_empty() {
        return String::new();
    }
    let mut text = String::from("What you remember about the user:\n");
    for (memory, _) in memories {
        let category = memory
            .categories
            .first()
            .map(String::as_str)
            .unwrap_or("general");
        text.push_str(&format!("- [{}] {}\n", category, memory.content));
    }
    text
}

/// Select the memories most relevant to `topic` and render them for the
/// prompt.
///
/// Every selected memory has its access recorded exactly once and the
/// change is written back to the store before this returns. A user with no
/// relevant memories gets an empty context, not an error.
pub async fn build_memory_context(
    store: &dyn MemoryStore,
    user_id: &str,
    topic: &str,
    limit: usize,
) -> Result<MemoryContext> {
    let all = store.memories_for_user(user_id).await?;
    let selected = select_memories_for_context(&all, topic, limit);

    debug!(
        user_id,
        total = all.len(),
        selected = selected.len(),
        "memory context assembled"
    );

    let mut memories = Vec::with_capacity(selected.len());
    let text = render(&selected);
    for (mut memory, _) in selected {
        memory.record_access();
        store.update_memory(user_id, &memory).await?;
        memories.push(memory);
    }

    Ok(MemoryContext { text, memories })
}

//! # Conversation Context
//!
//! The bounded per-conversation transcript store with least-recently-used
//! eviction, and the set of conversations the dispatcher must stay silent
//! in. Both are process-wide singletons constructed at startup and passed
//! by reference into the dispatcher and handlers.

use lru::LruCache;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;

use crate::domain::errors::ConfigError;
use crate::domain::types::{ConversationId, TranscriptEntry};

/// Bounded mapping from conversation identifier to an ordered transcript.
/// Capacity bounds the number of tracked conversations, not the total
/// entry count; the least recently read-or-written conversation is evicted
/// whole when capacity is exceeded.
pub struct ContextCache {
    transcripts: Mutex<LruCache<ConversationId, Vec<TranscriptEntry>>>,
}

impl ContextCache {
    /// A capacity of zero is a configuration error: it would degenerate to
    /// "no context retained", which is never what a deployment wants.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(ConfigError::InvalidCapacity)?;
        Ok(Self {
            transcripts: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Snapshot of the transcript, creating an empty one on first
    /// reference. Marks the conversation most-recently-used. Callers get a
    /// clone, so no lock is held while they work with it.
    pub async fn transcript(&self, id: &ConversationId) -> Vec<TranscriptEntry> {
        let mut guard = self.transcripts.lock().await;
        guard.get_or_insert(id.clone(), Vec::new).clone()
    }

    /// Appends one turn, creating the transcript if absent and marking it
    /// most-recently-used. Eviction runs synchronously inside this call
    /// when the tracked-conversation count would exceed capacity.
    pub async fn append(&self, id: &ConversationId, entry: TranscriptEntry) {
        let mut guard = self.transcripts.lock().await;
        guard.get_or_insert_mut(id.clone(), Vec::new).push(entry);
    }

    /// Number of conversations currently tracked.
    pub async fn tracked(&self) -> usize {
        self.transcripts.lock().await.len()
    }
}

/// Conversations the dispatcher suppresses context-bearing handling for.
/// Unbounded; membership lasts for the process lifetime unless toggled
/// off.
#[derive(Default)]
pub struct IgnoredConversations {
    members: Mutex<HashSet<ConversationId>>,
}

impl IgnoredConversations {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, id: &ConversationId) {
        self.members.lock().await.insert(id.clone());
    }

    pub async fn remove(&self, id: &ConversationId) {
        self.members.lock().await.remove(id);
    }

    pub async fn contains(&self, id: &ConversationId) -> bool {
        self.members.lock().await.contains(id)
    }

    /// Flips membership; returns true when the conversation is now
    /// ignored.
    pub async fn toggle(&self, id: &ConversationId) -> bool {
        let mut guard = self.members.lock().await;
        if guard.remove(id) {
            false
        } else {
            guard.insert(id.clone());
            true
        }
    }
}

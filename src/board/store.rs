//! Append-only message store.
//!
//! Readers get an `Arc` snapshot of the whole list; an append publishes a
//! new list atomically, so a reader never sees a half-finished append.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::board::types::{Message, NewPost};
use crate::observability::metrics;

/// Ordered in-memory messages for one session.
#[derive(Debug)]
pub struct MessageStore {
    messages: ArcSwap<Vec<Message>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            messages: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Append `post` with the next sequence number and return it.
    pub fn append(&self, post: NewPost) -> Message {
        // Ids are positions + 1; with no removal this keeps them gapless.
        // Every append copies the list, so a session costs O(n^2) clones.
        // Fine for a terminal session; a persistent vector would remove it.
        let previous = self.messages.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(post.clone().into_message(current.len() as u64 + 1));
            next
        });

        let message = post.into_message(previous.len() as u64 + 1);
        metrics::record_store_size(previous.len() + 1);
        message
    }

    /// Snapshot of every message in order.
    pub fn list(&self) -> Arc<Vec<Message>> {
        self.messages.load_full()
    }

    pub fn len(&self) -> usize {
        self.messages.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

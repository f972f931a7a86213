//! Pending queue state.

use std::collections::VecDeque;

/// FIFO of finalized messages awaiting submission.
#[derive(Debug, Default, Clone)]
pub struct PendingQueue {
    messages: VecDeque<String>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message at the tail. Unbounded.
    pub fn enqueue(&mut self, message: String) {
        self.messages.push_back(message);
    }

    /// Removes the head without waiting; `None` when empty.
    pub fn try_dequeue(&mut self) -> Option<String> {
        self.messages.pop_front()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drops every queued message, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.messages.len();
        self.messages.clear();
        dropped
    }

    /// First line of up to `max_items` queued messages, head first.
    ///
    /// Truncation to the display width happens at render time.
    pub fn summaries(&self, max_items: usize) -> Vec<String> {
        self.messages
            .iter()
            .take(max_items)
            .map(|item| item.lines().next().unwrap_or("").to_string())
            .collect()
    }
}

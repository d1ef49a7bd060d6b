//! Bounded rolling conversation history.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used when rendering a turn into a prompt.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Self::User => "Utente",
            Self::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Some(Utc::now()),
        }
    }
}

/// FIFO history holding at most `max_len` turns; the oldest turns are dropped first.
#[derive(Debug, Clone)]
pub struct History {
    turns: VecDeque<ConversationTurn>,
    max_len: usize,
}

impl History {
    /// `max_len` is raised to 1 if zero.
    pub fn new(max_len: usize) -> Self {
        let max_len = max_len.max(1);
        Self {
            turns: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push_back(ConversationTurn::new(role, content));
        while self.turns.len() > self.max_len {
            self.turns.pop_front();
        }
    }

    /// The most recent `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter().skip(self.turns.len().saturating_sub(n))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn to_vec(&self) -> Vec<ConversationTurn> {
        self.turns.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

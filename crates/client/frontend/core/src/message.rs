//! Shared message log primitives and transient notices.
use std::collections::VecDeque;
use std::time::Duration;

/// Severity level for UI messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Snapshot of a single message entry.
#[derive(Clone, Debug)]
pub struct MessageEntry {
    pub text: String,
    /// Ply the message refers to, when it describes a move.
    pub ply: Option<u32>,
    pub level: MessageLevel,
}

impl MessageEntry {
    pub fn new(text: impl Into<String>, ply: Option<u32>, level: MessageLevel) -> Self {
        Self {
            text: text.into(),
            ply,
            level,
        }
    }
}

/// Circular buffer of messages displayed to the player.
#[derive(Clone, Debug)]
pub struct MessageLog {
    entries: VecDeque<MessageEntry>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let bounded_capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(bounded_capacity),
            capacity: bounded_capacity,
        }
    }

    pub fn push(&mut self, entry: MessageEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn push_text(&mut self, message: impl Into<String>) {
        self.push(MessageEntry::new(message, None, MessageLevel::Info));
    }

    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter().rev().take(limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A short-lived banner, e.g. an engine rejection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub level: MessageLevel,
    remaining: Duration,
}

impl Notice {
    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

/// Holds at most one notice; a new one replaces the old. Expiry is driven by
/// [`NoticeBoard::tick`] so it follows the frame clock.
#[derive(Clone, Debug)]
pub struct NoticeBoard {
    current: Option<Notice>,
    ttl: Duration,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn post(&mut self, text: impl Into<String>, level: MessageLevel) {
        self.current = Some(Notice {
            text: text.into(),
            level,
            remaining: self.ttl,
        });
    }

    pub fn tick(&mut self, dt: Duration) {
        if let Some(notice) = &mut self.current {
            notice.remaining = notice.remaining.saturating_sub(dt);
            if notice.remaining.is_zero() {
                self.current = None;
            }
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

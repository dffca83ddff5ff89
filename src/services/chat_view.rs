// src/services/chat_view.rs
use std::sync::{Arc, Mutex};

use crate::services::chat_driver::SendTrigger;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Bot,
}

/// Handle to one rendered message, used to take the interim placeholder back out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryId(pub u64);

/// The scrolling message log.
pub trait ChatLog: Send {
    fn append(&mut self, role: MessageRole, text: &str) -> EntryId;
    fn remove(&mut self, entry: EntryId);
    fn scroll_to_latest(&mut self);
}

/// The text box the user types into.
pub trait InputField: Send {
    fn value(&self) -> String;
    fn clear(&mut self);
}

/// The send button / Enter key wiring of whatever hosts the driver.
pub trait SendControl {
    fn register_send_trigger(&mut self, trigger: SendTrigger);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: EntryId,
    pub role: MessageRole,
    pub text: String,
}

#[derive(Debug, Default)]
struct LogInner {
    next_id: u64,
    entries: Vec<LogEntry>,
    scrolls: usize,
}

/// In-memory log. Clones share the same entries, so a harness can keep one
/// clone for inspection while the driver owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryChatLog {
    inner: Arc<Mutex<LogInner>>,
}

impl MemoryChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().entries.clone()
    }

    pub fn texts(&self) -> Vec<(MessageRole, String)> {
        self.lock()
            .entries
            .iter()
            .map(|entry| (entry.role, entry.text.clone()))
            .collect()
    }

    pub fn scroll_count(&self) -> usize {
        self.lock().scrolls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LogInner> {
        // A panic while holding the lock leaves plain data behind; keep using it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ChatLog for MemoryChatLog {
    fn append(&mut self, role: MessageRole, text: &str) -> EntryId {
        let mut inner = self.lock();
        let id = EntryId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push(LogEntry {
            id,
            role,
            text: text.to_string(),
        });
        id
    }

    fn remove(&mut self, entry: EntryId) {
        self.lock().entries.retain(|e| e.id != entry);
    }

    fn scroll_to_latest(&mut self) {
        self.lock().scrolls += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryInput {
    value: Arc<Mutex<String>>,
}

impl MemoryInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.lock() = text.into();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, String> {
        self.value.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl InputField for MemoryInput {
    fn value(&self) -> String {
        self.lock().clone()
    }

    fn clear(&mut self) {
        self.lock().clear();
    }
}

/// Stand-in for a send button: holds whatever trigger the driver registered.
#[derive(Debug, Default)]
pub struct MemorySendControl {
    trigger: Option<SendTrigger>,
}

impl MemorySendControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_trigger(&mut self) -> Option<SendTrigger> {
        self.trigger.take()
    }
}

impl SendControl for MemorySendControl {
    fn register_send_trigger(&mut self, trigger: SendTrigger) {
        self.trigger = Some(trigger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_targets_only_the_given_entry() {
        let mut log = MemoryChatLog::new();
        let first = log.append(MessageRole::User, "one");
        let second = log.append(MessageRole::Bot, "two");
        log.append(MessageRole::Bot, "three");

        log.remove(second);

        assert_eq!(
            log.texts(),
            vec![
                (MessageRole::User, "one".to_string()),
                (MessageRole::Bot, "three".to_string()),
            ]
        );
        assert_ne!(first, second);
    }

    #[test]
    fn input_clones_share_value() {
        let input = MemoryInput::new();
        let mut handle = input.clone();
        input.set("halo");
        assert_eq!(handle.value(), "halo");
        handle.clear();
        assert_eq!(input.value(), "");
    }
}

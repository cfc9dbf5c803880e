use crate::models::chat::{ Display, MessageEntry, Role };
use std::sync::atomic::{ AtomicU64, Ordering };

static NEXT_LOG_ID: AtomicU64 = AtomicU64::new(1);

/// Proof that a placeholder entry is still waiting for its reply. Not
/// cloneable: replacing consumes it, so each placeholder changes once. Only
/// the log that issued it will accept it.
#[derive(Debug, PartialEq, Eq)]
pub struct PlaceholderHandle {
    log_id: u64,
    ordinal: usize,
}

impl PlaceholderHandle {
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// Append-only conversation record. The only in-place mutation is the
/// one-time replacement of a placeholder's content.
#[derive(Debug)]
pub struct MessageLog {
    id: u64,
    entries: Vec<MessageEntry>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            id: NEXT_LOG_ID.fetch_add(1, Ordering::Relaxed),
            entries: Vec::new(),
        }
    }

    pub fn append(
        &mut self,
        role: Role,
        text: impl Into<String>,
        render_as_markdown: bool,
        display: Display
    ) -> &MessageEntry {
        let ordinal = self.entries.len();
        self.entries.push(MessageEntry {
            role,
            text: text.into(),
            render_as_markdown,
            ordinal,
            display,
        });
        &self.entries[ordinal]
    }

    pub fn append_placeholder(&mut self, text: &str) -> PlaceholderHandle {
        let ordinal = self.append(
            Role::Assistant,
            text,
            false,
            Display::Plain(text.to_string())
        ).ordinal;
        PlaceholderHandle { log_id: self.id, ordinal }
    }

    /// Swaps the placeholder's content for its reply. Role and ordinal stay.
    /// Returns `None` for a handle issued by another log.
    pub fn replace_placeholder(
        &mut self,
        handle: PlaceholderHandle,
        text: impl Into<String>,
        display: Display
    ) -> Option<&MessageEntry> {
        if handle.log_id != self.id {
            return None;
        }
        let entry = self.entries.get_mut(handle.ordinal)?;
        entry.text = text.into();
        entry.render_as_markdown = matches!(display, Display::Markup(_));
        entry.display = display;
        Some(&*entry)
    }

    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    pub fn get(&self, ordinal: usize) -> Option<&MessageEntry> {
        self.entries.get(ordinal)
    }

    pub fn last(&self) -> Option<&MessageEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

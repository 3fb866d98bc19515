//! Append-only conversation transcript

use crate::chat::entities::Message;

/// Ordered sequence of transcript messages
///
/// The transcript only grows: there is no API to edit or remove an entry,
/// so indices held by readers stay valid for the life of the session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.entries.push(message);
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }
}

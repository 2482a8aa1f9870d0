use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

/// One visible entry of the chat.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub author: Author,
    pub timestamp: DateTime<Local>,
    pub is_loading: bool,
}

/// Append-only list of chat messages.
///
/// At most one loading placeholder exists at a time and it is always the
/// last entry.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting(greeting: &str) -> Self {
        let mut transcript = Self::new();
        transcript.push(Author::Assistant, greeting);
        transcript
    }

    fn allocate_id(&mut self) -> MessageId {
        self.next_id += 1;
        MessageId(self.next_id)
    }

    /// Appends a finished message. Returns `None` while a placeholder is
    /// pending, since nothing may follow it.
    pub fn push(&mut self, author: Author, text: &str) -> Option<&ChatMessage> {
        if self.loading().is_some() {
            return None;
        }
        let id = self.allocate_id();
        self.messages.push(ChatMessage {
            id,
            text: text.to_string(),
            author,
            timestamp: Local::now(),
            is_loading: false,
        });
        self.messages.last()
    }

    /// Appends the assistant placeholder, or `None` if one already exists.
    pub fn begin_loading(&mut self) -> Option<&ChatMessage> {
        if self.loading().is_some() {
            return None;
        }
        let id = self.allocate_id();
        self.messages.push(ChatMessage {
            id,
            text: String::new(),
            author: Author::Assistant,
            timestamp: Local::now(),
            is_loading: true,
        });
        self.messages.last()
    }

    /// Removes the placeholder entirely.
    pub fn remove_loading(&mut self) -> Option<ChatMessage> {
        if self.loading().is_some() {
            self.messages.pop()
        } else {
            None
        }
    }

    pub fn loading(&self) -> Option<&ChatMessage> {
        self.messages.last().filter(|m| m.is_loading)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut transcript = Transcript::with_greeting("hello");
        transcript.push(Author::User, "hi");
        transcript.begin_loading();
        transcript.remove_loading();
        transcript.push(Author::Assistant, "hey");

        let ids: Vec<_> = transcript.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn only_one_placeholder_at_a_time() {
        let mut transcript = Transcript::with_greeting("hello");
        assert!(transcript.begin_loading().is_some());
        assert!(transcript.begin_loading().is_none());
        assert!(transcript.push(Author::User, "blocked").is_none());
        assert_eq!(transcript.len(), 2);

        let placeholder = transcript.loading().unwrap();
        assert_eq!(placeholder.author, Author::Assistant);
        assert!(placeholder.text.is_empty());
    }

    #[test]
    fn removing_placeholder_drops_the_record() {
        let mut transcript = Transcript::with_greeting("hello");
        transcript.begin_loading();
        let removed = transcript.remove_loading().unwrap();
        assert!(removed.is_loading);
        assert_eq!(transcript.len(), 1);
        assert!(transcript.messages().iter().all(|m| !m.is_loading));
        assert!(transcript.remove_loading().is_none());
        assert_eq!(transcript.len(), 1);
    }
}

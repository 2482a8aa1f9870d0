//! Conversation state sent to the model.
//!
//! The exchange history only ever holds completed turns: a user entry and the
//! model's reply are committed together once the call succeeds. A failed or
//! abandoned turn leaves no trace here, so the model never sees error text as
//! context.

use crate::core::error::ChatError;
use crate::providers::{LLMProvider, Message};

/// How much of the history is replayed with each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    max_turns: Option<usize>,
}

impl ContextWindow {
    pub fn unbounded() -> Self {
        Self { max_turns: None }
    }

    pub fn last_turns(turns: usize) -> Self {
        Self {
            max_turns: Some(turns),
        }
    }

    /// Trailing slice of `history` covering at most `max_turns` turns.
    fn select<'a>(&self, history: &'a [Message]) -> &'a [Message] {
        match self.max_turns {
            // History holds whole (user, model) pairs, so an even offset
            // always lands on a user entry.
            Some(turns) => {
                let keep = turns.saturating_mul(2).min(history.len());
                &history[history.len() - keep..]
            }
            None => history,
        }
    }
}

pub struct ConversationClient {
    provider: Box<dyn LLMProvider>,
    history: Vec<Message>,
    window: ContextWindow,
}

impl ConversationClient {
    pub fn new(provider: Box<dyn LLMProvider>, window: ContextWindow) -> Self {
        Self {
            provider,
            history: Vec::new(),
            window,
        }
    }

    /// Sends `user_text` with the windowed history and returns the reply.
    ///
    /// Callers trim and reject blank input beforehand.
    pub async fn send_turn(&mut self, user_text: &str) -> Result<String, ChatError> {
        let user = Message::user(user_text);

        let context = self.window.select(&self.history);
        let mut request = Vec::with_capacity(context.len() + 1);
        request.extend_from_slice(context);
        request.push(user.clone());

        tracing::debug!(
            history = self.history.len(),
            sent = request.len(),
            "dispatching turn"
        );

        match self.provider.get_response(&request).await {
            Ok(reply) => {
                self.history.push(user);
                self.history.push(Message::model(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                tracing::warn!(error = %e, "turn failed");
                Err(e)
            }
        }
    }

    pub fn clear_context(&mut self) {
        tracing::info!(dropped = self.history.len(), "conversation context cleared");
        self.history.clear();
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn completed_turns(&self) -> usize {
        self.history.len() / 2
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn set_model(&mut self, model: &str) {
        tracing::info!(model, "switching model");
        self.provider.set_model(model);
    }
}

//! Per-turn orchestration between the transcript and the conversation client.

use crate::conversation::ConversationClient;
use crate::core::error::ChatError;
use crate::transcript::{Author, ChatMessage, Transcript};
use std::future::Future;

pub const FALLBACK_REPLY: &str = "I'm sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingResponse,
}

/// Ephemeral failure report shown outside the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

#[derive(Debug)]
pub struct TurnOutcome {
    pub reply: ChatMessage,
    pub notice: Option<Notice>,
}

pub struct ChatController {
    transcript: Transcript,
    client: ConversationClient,
    state: TurnState,
}

impl ChatController {
    pub fn new(client: ConversationClient, greeting: &str) -> Self {
        Self {
            transcript: Transcript::with_greeting(greeting),
            client,
            state: TurnState::Idle,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn client(&self) -> &ConversationClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut ConversationClient {
        &mut self.client
    }

    /// Accepts a submission: records the user message and the placeholder and
    /// returns the trimmed text to send. Blank input, or input while a turn
    /// is outstanding, is refused without touching the transcript.
    pub fn begin_turn(&mut self, raw: &str) -> Option<String> {
        if self.state == TurnState::AwaitingResponse {
            return None;
        }
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.push(Author::User, text)?;
        self.transcript.begin_loading()?;
        self.state = TurnState::AwaitingResponse;
        Some(text.to_string())
    }

    /// Performs the remote call for a turn opened by [`begin_turn`].
    ///
    /// [`begin_turn`]: ChatController::begin_turn
    pub async fn request_reply(&mut self, text: &str) -> Result<String, ChatError> {
        self.client.send_turn(text).await
    }

    /// Like [`request_reply`], but gives up with [`ChatError::Cancelled`]
    /// as soon as `cancel` resolves. Nothing is committed for an abandoned
    /// request.
    ///
    /// [`request_reply`]: ChatController::request_reply
    pub async fn request_reply_until<F>(&mut self, text: &str, cancel: F) -> Result<String, ChatError>
    where
        F: Future,
    {
        tokio::select! {
            result = self.client.send_turn(text) => result,
            _ = cancel => Err(ChatError::Cancelled),
        }
    }

    /// Swaps the placeholder for the reply, or for the fallback text plus a
    /// notice when the call failed.
    pub fn finish_turn(&mut self, result: Result<String, ChatError>) -> Option<TurnOutcome> {
        if self.state != TurnState::AwaitingResponse {
            return None;
        }
        self.transcript.remove_loading();
        self.state = TurnState::Idle;

        let (text, notice) = match result {
            Ok(reply) => (reply, None),
            Err(e) => (
                FALLBACK_REPLY.to_string(),
                Some(Notice {
                    title: "Error".to_string(),
                    message: e.to_string(),
                }),
            ),
        };

        let reply = self.transcript.push(Author::Assistant, &text)?.clone();
        Some(TurnOutcome { reply, notice })
    }

    /// Runs one whole turn. `None` means the submission was refused.
    pub async fn submit(&mut self, raw: &str) -> Option<TurnOutcome> {
        let text = self.begin_turn(raw)?;
        let result = self.request_reply(&text).await;
        self.finish_turn(result)
    }
}

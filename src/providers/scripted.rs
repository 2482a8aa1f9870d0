//! A provider that replays canned results and records every request.

use crate::core::error::ChatError;
use crate::providers::{LLMProvider, Message};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

enum Step {
    Answer(Result<String, ChatError>),
    /// Never resolves, like a server that stops answering
    Stall,
}

#[derive(Clone, Default)]
pub struct ScriptedProvider {
    replies: Arc<Mutex<VecDeque<Step>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
    model: String,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            model: "scripted".to_string(),
            ..Self::default()
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Step::Answer(Ok(text.to_string())));
        self
    }

    pub fn fail(self, err: ChatError) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Step::Answer(Err(err)));
        self
    }

    pub fn stall(self) -> Self {
        self.replies.lock().unwrap().push_back(Step::Stall);
        self
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, ChatError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let step = self.replies.lock().unwrap().pop_front();
        match step {
            Some(Step::Answer(result)) => result,
            Some(Step::Stall) => std::future::pending().await,
            None => Err(ChatError::Network("script exhausted".to_string())),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn set_model(&mut self, model: &str) {
        self.model = model.to_string();
    }
}

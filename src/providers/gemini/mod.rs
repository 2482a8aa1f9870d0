use crate::config::Settings;
use crate::core::error::ChatError;
use crate::providers::{LLMProvider, Message};
use async_trait::async_trait;

mod client;
mod types;

use client::GeminiClient;

#[derive(Clone)]
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(settings: &Settings) -> Result<Self, ChatError> {
        let client = GeminiClient::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            settings.model.clone(),
            settings.generation.clone(),
            settings.request_timeout,
        )?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, ChatError> {
        self.client.generate_content(messages).await
    }

    fn model(&self) -> &str {
        &self.client.model
    }

    fn set_model(&mut self, model: &str) {
        self.client.model = model.to_string();
    }
}

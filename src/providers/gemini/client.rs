use crate::config::GenerationSettings;
use crate::core::error::ChatError;
use crate::providers::Message;
use crate::providers::base_client::HttpClient;
use crate::providers::gemini::types::*;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::time::Duration;

pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response format from Gemini API";

#[derive(Clone)]
pub struct GeminiClient {
    pub model: String,
    generation: GenerationSettings,
    client: HttpClient,
}

impl GeminiClient {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        generation: GenerationSettings,
        timeout: Option<Duration>,
    ) -> Result<Self, ChatError> {
        // Sent as a header so the key never shows up in request URLs
        let headers = HashMap::from([("x-goog-api-key".to_string(), api_key)]);
        let client = HttpClient::new(base_url, timeout, Some(headers))?;

        Ok(Self {
            client,
            model,
            generation,
        })
    }

    pub async fn generate_content(&self, messages: &[Message]) -> Result<String, ChatError> {
        let payload = self.build_payload(messages);
        tracing::debug!(
            model = %self.model,
            contents = payload.contents.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(
                &format!("v1beta/models/{}:generateContent", self.model),
                &payload,
            )
            .await?;

        let status = response.status();
        let body = response.text().await?;
        interpret_response(status, &body)
    }

    pub fn build_payload(&self, messages: &[Message]) -> GeminiRequest {
        let contents = messages
            .iter()
            .map(|message| GeminiContentPart {
                role: message.role,
                parts: vec![GeminiPart {
                    text: message.content.clone(),
                }],
            })
            .collect();

        let safety_settings = HarmCategory::ALL
            .iter()
            .map(|&category| SafetySetting {
                category,
                threshold: HarmBlockThreshold::BlockMediumAndAbove,
            })
            .collect();

        GeminiRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: self.generation.temperature,
                top_k: self.generation.top_k,
                top_p: self.generation.top_p,
                max_output_tokens: self.generation.max_output_tokens,
            },
            safety_settings,
        }
    }
}

/// Maps a raw status and body to the reply text or a classified error.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<String, ChatError> {
    if !status.is_success() {
        let message = serde_json::from_str::<GeminiErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .and_then(|error| error.message)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
        return Err(ChatError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let parsed: GeminiResponse = serde_json::from_str(body)
        .map_err(|_| ChatError::InvalidResponse(INVALID_RESPONSE_MESSAGE.to_string()))?;

    parsed
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| ChatError::InvalidResponse(INVALID_RESPONSE_MESSAGE.to_string()))
}

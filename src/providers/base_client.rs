use crate::core::error::ChatError;
use reqwest::{Client, Response};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Thin JSON-over-HTTP client shared by providers.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(
        base_url: String,
        timeout: Option<Duration>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Result<Self, ChatError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            extra_headers: extra_headers.unwrap_or_default(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POSTs `payload` as JSON. Any status is returned as-is; interpreting it
    /// is up to the caller.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, ChatError> {
        let mut request = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json");

        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        let response = request.json(payload).send().await?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let client = HttpClient::new("http://localhost:9/".to_string(), None, None).unwrap();
        assert_eq!(
            client.url("/v1beta/models/m:generateContent"),
            "http://localhost:9/v1beta/models/m:generateContent"
        );
    }
}

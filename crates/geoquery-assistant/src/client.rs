//! HTTP client for an OpenAI-compatible chat-completions endpoint.
//!
//! Wraps `reqwest` with deployment/API-version handling and extraction of the
//! generated text from the completion envelope. Failures here are never fatal
//! to a query: the orchestrator falls back to the raw input text.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;

use geoquery_core::AssistantConfig;

use crate::error::AssistantError;

/// System prompt instructing the model to emit JSON with exactly the keys
/// `content`, `location`, `bbox`. Taken verbatim from the deployed prompt;
/// the downstream parser depends on these key names.
const SYSTEM_PROMPT: &str = "You are a strict parser. Given a user's search string which may \
contain both a search query and a human location, return a JSON object ONLY with keys: content, \
location, bbox. content: concise search keywords (string). location: the human readable location \
(string). bbox: the rough min max coordinates of the location, a list [minx, miny, maxx, maxy] \
representing lon/lat coordinates in WGS84. Respond with JSON only, no explanation.";

const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f64 = 0.0;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f64,
    stream: bool,
}

/// Client for the assistant's chat-completions API.
///
/// Use [`AssistantClient::new`] with loaded credentials, or
/// [`AssistantClient::with_base_url`] to point at a mock server in tests.
pub struct AssistantClient {
    client: Client,
    completions_url: Url,
    api_key: String,
}

impl AssistantClient {
    /// Creates a client from the loaded assistant configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AssistantError::InvalidEndpoint`] if the
    /// configured endpoint is not a valid URL.
    pub fn new(config: &AssistantConfig, user_agent: &str) -> Result<Self, AssistantError> {
        Self::with_base_url(
            &config.endpoint,
            &config.api_key,
            &config.deployment,
            &config.api_version,
            config.timeout_secs,
            user_agent,
        )
    }

    /// Creates a client with an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AssistantError::InvalidEndpoint`] if the
    /// resulting completions URL is not parseable.
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        deployment: &str,
        api_version: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent.to_owned())
            .build()?;

        let raw = format!(
            "{}/openai/deployments/{deployment}/chat/completions?api-version={api_version}",
            base_url.trim_end_matches('/')
        );
        let completions_url =
            Url::parse(&raw).map_err(|_| AssistantError::InvalidEndpoint(base_url.to_string()))?;

        Ok(Self {
            client,
            completions_url,
            api_key: api_key.to_owned(),
        })
    }

    /// Asks the model to parse `query` into structured search parameters and
    /// returns the raw generated text.
    ///
    /// # Errors
    ///
    /// - [`AssistantError::Http`] on network failure or timeout.
    /// - [`AssistantError::Status`] on a non-2xx response.
    /// - [`AssistantError::InvalidResponse`] if the completion envelope does
    ///   not carry `choices[0].message.content`.
    pub async fn parse_query(&self, query: &str) -> Result<String, AssistantError> {
        let user_prompt = format!("User input: {query}\nRespond with JSON only.");
        self.chat_completion(SYSTEM_PROMPT, &user_prompt, MAX_TOKENS, TEMPERATURE)
            .await
    }

    /// Performs one chat completion and returns the generated text.
    ///
    /// # Errors
    ///
    /// Same as [`AssistantClient::parse_query`].
    pub async fn chat_completion(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, AssistantError> {
        let request = ChatCompletionRequest {
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens,
            temperature,
            stream: false,
        };

        let response = self
            .client
            .post(self.completions_url.clone())
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body: truncate(&body, 500),
            });
        }

        let envelope: Value =
            serde_json::from_str(&body).map_err(|e| AssistantError::InvalidResponse {
                context: self.completions_url.to_string(),
                reason: format!("body is not JSON: {e}"),
            })?;

        completion_text(&envelope).ok_or_else(|| AssistantError::InvalidResponse {
            context: self.completions_url.to_string(),
            reason: "no choices[0].message.content in completion".to_string(),
        })
    }
}

/// Pulls the generated text out of a chat-completion envelope.
fn completion_text(envelope: &Value) -> Option<String> {
    envelope
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

fn truncate(body: &str, limit: usize) -> String {
    if body.len() <= limit {
        body.to_string()
    } else {
        let mut end = limit;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completions_url_embeds_deployment_and_api_version() {
        let client = AssistantClient::with_base_url(
            "https://example.openai.azure.com/",
            "key",
            "gpt-4o-mini",
            "2025-01-01-preview",
            10,
            "geoquery-test/0.1",
        )
        .expect("client construction should not fail");

        assert_eq!(
            client.completions_url.as_str(),
            "https://example.openai.azure.com/openai/deployments/gpt-4o-mini/chat/completions?api-version=2025-01-01-preview"
        );
    }

    #[test]
    fn completion_text_reads_first_choice() {
        let envelope = json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"content\": \"parks\"}"}}]
        });
        assert_eq!(
            completion_text(&envelope).as_deref(),
            Some("{\"content\": \"parks\"}")
        );
    }

    #[test]
    fn completion_text_rejects_missing_content() {
        assert!(completion_text(&json!({"choices": []})).is_none());
        assert!(completion_text(&json!({"choices": [{"message": {}}]})).is_none());
        assert!(completion_text(&json!({})).is_none());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let truncated = truncate("héllo wörld", 2);
        assert!(truncated.starts_with('h'));
    }
}

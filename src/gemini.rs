//! Gemini `generateContent` client.
//!
//! One POST per call, bounded by the configured timeout. The caller gets the
//! upstream status and raw body back untouched; interpreting the body is the
//! job of [`crate::extract`].

use crate::config::GeminiSettings;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const TEMPERATURE: f64 = 0.8;
pub const MAX_OUTPUT_TOKENS: u32 = 2000;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upstream request failed: {}", error_chain(.0))]
    Transport(reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
}

/// Status and raw body of a completed upstream exchange.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(UpstreamError::ClientBuild)?;

        Ok(Self {
            http,
            url: format!(
                "{}/models/{}:generateContent",
                settings.api_base, settings.model
            ),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            timeout: settings.timeout,
        })
    }

    pub async fn generate(&self, prompt: &str) -> Result<UpstreamReply, UpstreamError> {
        let payload = GenerateContentRequest::for_prompt(prompt);

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "sending request to Gemini"
        );

        let res = self
            .http
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.transport_error(e))?;

        tracing::debug!(%status, body_len = body.len(), "Gemini responded");
        Ok(UpstreamReply { status, body })
    }

    fn transport_error(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout)
        } else {
            UpstreamError::Transport(err.without_url())
        }
    }
}

/// Joins an error with its `source()` chain. reqwest's own `Display` stops at
/// "error sending request", which hides the cause from the client.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

// -------------------------------------------------------------------
// Wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    pub fn for_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if there is one.
    pub fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Error)]
    #[error("error sending request")]
    struct Outer(#[source] Middle);

    #[derive(Debug, Error)]
    #[error("tcp connect error")]
    struct Middle(#[source] std::io::Error);

    #[test]
    fn error_chain_includes_every_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "Connection refused");
        let err = Outer(Middle(io));
        assert_eq!(
            error_chain(&err),
            "error sending request: tcp connect error: Connection refused"
        );
    }

    #[test]
    fn payload_matches_wire_shape() {
        let payload = GenerateContentRequest::for_prompt("hello");
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{"parts": [{"text": "hello"}]}],
                "generationConfig": {"temperature": 0.8, "maxOutputTokens": 2000}
            })
        );
    }

    #[test]
    fn first_text_is_found() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "first"}, {"text": "second"}], "role": "model"},
                 "finishReason": "STOP"},
                {"content": {"parts": [{"text": "other"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 10}
        });
        let parsed: GenerateContentResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.into_first_text().as_deref(), Some("first"));
    }

    #[test]
    fn missing_text_yields_none() {
        for body in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
            json!({"candidates": [{"content": {"parts": []}}]}),
            json!({"candidates": [{"content": {"parts": [{"inlineData": {}}]}}]}),
        ] {
            let parsed: GenerateContentResponse = serde_json::from_value(body.clone()).unwrap();
            assert!(parsed.into_first_text().is_none(), "{body}");
        }
    }
}

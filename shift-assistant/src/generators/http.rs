/// Generator backed by a `generateContent` REST endpoint
///
/// Sends the prompt as a single user turn and returns the text of the first
/// candidate. Request shape:
///
/// ```json
/// { "contents": [ { "role": "user", "parts": [ { "text": "..." } ] } ] }
/// ```

use super::{GeneratorError, GeneratorResult, TextGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone)]
pub struct HttpGeneratorConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,

    /// Transport-level timeout; the suggester applies its own on top
    pub request_timeout: Duration,
}

impl HttpGeneratorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

pub struct HttpTextGenerator {
    client: reqwest::Client,
    config: HttpGeneratorConfig,
}

impl HttpTextGenerator {
    pub fn new(config: HttpGeneratorConfig) -> GeneratorResult<Self> {
        if config.api_key.is_empty() {
            return Err(GeneratorError::NotConfigured("missing API key".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GeneratorError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> GeneratorResult<String> {
        let body = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Requesting generation");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Generator returned an error status");
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Transport(e.without_url().to_string()))?;

        parsed.first_text().ok_or(GeneratorError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: "hi" }],
            }],
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"contents": [{"role": "user", "parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn test_first_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\":"}, {"text": " 1}"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();

        assert_eq!(response.first_text().as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_first_text_empty() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(response.first_text().is_none());

        let blocked: GenerateResponse =
            serde_json::from_value(serde_json::json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        assert!(blocked.first_text().is_none());
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let result = HttpTextGenerator::new(HttpGeneratorConfig::new(""));
        assert!(matches!(result, Err(GeneratorError::NotConfigured(_))));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let generator = HttpTextGenerator::new(HttpGeneratorConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..HttpGeneratorConfig::new("key")
        })
        .unwrap();

        assert_eq!(
            generator.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let generator = HttpTextGenerator::new(HttpGeneratorConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout: Duration::from_secs(2),
            ..HttpGeneratorConfig::new("key")
        })
        .unwrap();

        let result = generator.generate("hello").await;
        assert!(matches!(result, Err(GeneratorError::Transport(_))));
    }
}

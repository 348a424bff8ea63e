//! Google Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use scribe_core::ports::{AiError, TextGenerator, TextStream};

use super::sse::relay_data_lines;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `None` disables the client; the AI endpoints then answer with placeholders.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(60),
            temperature: 0.3,
            max_output_tokens: 1024,
        }
    }
}

impl GeminiConfig {
    /// Load configuration from `GEMINI_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            ..defaults
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, trimmed.
    fn first_text(self) -> Result<String, AiError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(AiError::EmptyResponse)?;

        let text = candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default();

        Ok(text.trim().to_string())
    }
}

/// Gemini-backed [`TextGenerator`].
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Build a client, or `None` when no API key is configured.
    pub fn from_config(config: GeminiConfig) -> Result<Option<Self>, AiError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Transport(e.to_string()))?;

        tracing::info!(model = %config.model, "Gemini client configured");

        Ok(Some(Self {
            http,
            api_key,
            config,
        }))
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    fn request(&self, method: &str, prompt: &str) -> reqwest::RequestBuilder {
        let body = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        self.http
            .post(self.endpoint(method))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
    }
}

/// Turn a non-success status into the matching [`AiError`].
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(AiError::ModelUnavailable);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "Gemini request failed");

    Err(AiError::Upstream {
        status: status.as_u16(),
        body,
    })
}

fn transport(err: reqwest::Error) -> AiError {
    AiError::Transport(err.without_url().to_string())
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let response = self
            .request("generateContent", prompt)
            .send()
            .await
            .map_err(transport)?;

        let body: GenerateContentResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(transport)?;

        body.first_text()
    }

    async fn generate_stream(&self, prompt: &str) -> Result<TextStream, AiError> {
        let response = self
            .request("streamGenerateContent", prompt)
            .query(&[("alt", "sse")])
            .send()
            .await
            .map_err(transport)?;

        let response = check_status(response).await?;
        Ok(relay_data_lines(response.bytes_stream()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::from_config(GeminiConfig {
            api_key: Some("test-key".to_string()),
            model: "gemini-test".to_string(),
            base_url: server.uri(),
            ..GeminiConfig::default()
        })
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_no_key_means_no_client() {
        let client = GeminiClient::from_config(GeminiConfig::default()).unwrap();
        assert!(client.is_none());
    }

    #[tokio::test]
    async fn test_generate_extracts_first_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .and(header(API_KEY_HEADER, "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"parts": [{"text": "prompt text"}]}],
                "generationConfig": {"maxOutputTokens": 1024}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [
                    {"content": {"parts": [{"text": "  first answer \n"}]}},
                    {"content": {"parts": [{"text": "second"}]}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).await.generate("prompt text").await.unwrap();

        assert_eq!(text, "first answer");
    }

    #[tokio::test]
    async fn test_not_found_is_model_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such model"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.generate("p").await.unwrap_err();

        assert!(matches!(err, AiError::ModelUnavailable));
    }

    #[tokio::test]
    async fn test_other_errors_keep_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.generate("p").await.unwrap_err();

        assert!(
            matches!(err, AiError::Upstream { status: 429, ref body } if body == "quota exceeded")
        );
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).await.generate("p").await.unwrap_err();

        assert!(matches!(err, AiError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_stream_passes_events_through() {
        let server = MockServer::start().await;
        let sse = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hel\"}]}}]}\r\n\r\n\
                   data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"lo\"}]}}]}\r\n\r\n";
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:streamGenerateContent"))
            .and(query_param("alt", "sse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse),
            )
            .mount(&server)
            .await;

        let events: Vec<String> = client_for(&server)
            .await
            .generate_stream("p")
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(events.len(), 2);
        assert!(events[0].contains("\"Hel\""));
        assert!(events[1].contains("\"lo\""));
        assert!(events.iter().all(|e| e.starts_with("data: ") && e.ends_with("\n\n")));
    }

    #[tokio::test]
    async fn test_stream_error_status_before_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = client_for(&server).await.generate_stream("p").await;

        assert!(matches!(result, Err(AiError::Upstream { status: 500, .. })));
    }
}

//! Text transforms through the language model, with a demo fallback.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;

use crate::domain::AiAction;
use crate::ports::{AiError, TextGenerator, TextStream};

/// Prefix of the placeholder returned when no API key is configured.
pub const MOCK_MARKER: &str = "[Set GEMINI_API_KEY to enable AI] ";

/// Prefix of the placeholder returned when the model is not available.
pub const UNAVAILABLE_MARKER: &str = "[AI model not available for this key right now] ";

/// Text of the single event streamed when no API key is configured.
pub const STREAM_MOCK_TEXT: &str = "[Set GEMINI_API_KEY to enable streaming]";

const PREVIEW_CHARS: usize = 100;

pub struct AiService {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AiService {
    /// `None` puts the service in demo mode: no network calls are made.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn transform(&self, text: &str, action: AiAction) -> Result<String, AiError> {
        let Some(generator) = &self.generator else {
            return Ok(placeholder(MOCK_MARKER, text));
        };

        match generator.generate(&action.prompt(text)).await {
            Err(AiError::ModelUnavailable) => {
                tracing::warn!(action = action.as_str(), "Model unavailable, returning placeholder");
                Ok(placeholder(UNAVAILABLE_MARKER, text))
            }
            other => other,
        }
    }

    pub async fn transform_stream(&self, text: &str, action: AiAction) -> Result<TextStream, AiError> {
        let Some(generator) = &self.generator else {
            return Ok(single_event(STREAM_MOCK_TEXT));
        };

        match generator.generate_stream(&action.prompt(text)).await {
            Err(AiError::ModelUnavailable) => {
                tracing::warn!(action = action.as_str(), "Model unavailable, streaming placeholder");
                Ok(single_event(&placeholder(UNAVAILABLE_MARKER, text)))
            }
            other => other,
        }
    }
}

fn placeholder(marker: &str, text: &str) -> String {
    let preview: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{marker}{preview}...")
}

fn single_event(text: &str) -> TextStream {
    let event = format!("data: {}\n\n", serde_json::json!({ "text": text }));
    stream::iter([event]).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::ScriptedGenerator;

    #[tokio::test]
    async fn test_demo_mode_returns_marked_placeholder() {
        let ai = AiService::new(None);
        let result = ai.transform("hello world", AiAction::Summary).await.unwrap();

        assert!(result.starts_with(MOCK_MARKER));
        assert_eq!(result, format!("{MOCK_MARKER}hello world..."));
    }

    #[tokio::test]
    async fn test_placeholder_preview_is_char_bounded() {
        let text = "é".repeat(150);
        let result = AiService::new(None)
            .transform(&text, AiAction::Expand)
            .await
            .unwrap();

        let preview = result
            .strip_prefix(MOCK_MARKER)
            .and_then(|r| r.strip_suffix("..."))
            .unwrap();
        assert_eq!(preview.chars().count(), 100);
    }

    #[tokio::test]
    async fn test_transform_sends_action_prompt() {
        let generator = Arc::new(ScriptedGenerator::reply("Short summary."));
        let ai = AiService::new(Some(generator.clone()));

        let result = ai.transform("long text", AiAction::Summary).await.unwrap();

        assert_eq!(result, "Short summary.");
        assert_eq!(
            generator.last_prompt().as_deref(),
            Some(AiAction::Summary.prompt("long text").as_str())
        );
    }

    #[tokio::test]
    async fn test_model_unavailable_falls_back() {
        let ai = AiService::new(Some(Arc::new(ScriptedGenerator::unavailable())));
        let result = ai.transform("text", AiAction::FixGrammar).await.unwrap();

        assert_eq!(result, format!("{UNAVAILABLE_MARKER}text..."));
    }

    #[tokio::test]
    async fn test_upstream_errors_propagate() {
        let ai = AiService::new(Some(Arc::new(ScriptedGenerator::failing(403, "denied"))));
        let err = ai.transform("text", AiAction::Expand).await.unwrap_err();

        assert!(matches!(err, AiError::Upstream { status: 403, ref body } if body == "denied"));
    }

    #[tokio::test]
    async fn test_stream_model_unavailable_falls_back() {
        let ai = AiService::new(Some(Arc::new(ScriptedGenerator::unavailable())));
        let events: Vec<String> = ai
            .transform_stream("draft text", AiAction::Summary)
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(events.len(), 1);
        let payload: serde_json::Value =
            serde_json::from_str(events[0].strip_prefix("data: ").unwrap().trim_end()).unwrap();
        assert_eq!(payload["text"], format!("{UNAVAILABLE_MARKER}draft text..."));
    }

    #[tokio::test]
    async fn test_demo_stream_emits_single_event() {
        let ai = AiService::new(None);
        let events: Vec<String> = ai
            .transform_stream("text", AiAction::Summary)
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(events.len(), 1);
        assert!(events[0].starts_with("data: "));
        assert!(events[0].ends_with("\n\n"));
        assert!(events[0].contains(STREAM_MOCK_TEXT));
    }

    #[tokio::test]
    async fn test_stream_relays_generator_events() {
        let ai = AiService::new(Some(Arc::new(ScriptedGenerator::reply("ignored"))));
        let events: Vec<String> = ai
            .transform_stream("text", AiAction::Summary)
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(events, vec!["data: {\"n\":1}\n\n", "data: {\"n\":2}\n\n"]);
    }
}

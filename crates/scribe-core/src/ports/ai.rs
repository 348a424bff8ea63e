//! Generative text port.

use async_trait::async_trait;
use futures::stream::BoxStream;

/// Server-sent event blocks relayed verbatim, each already terminated by a
/// blank line. Dropping the stream releases the upstream connection.
pub type TextStream = BoxStream<'static, String>;

/// A remote language model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run `prompt` and return the first candidate's text, trimmed.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;

    /// Run `prompt` in streaming mode.
    async fn generate_stream(&self, prompt: &str) -> Result<TextStream, AiError>;
}

/// Failures talking to the language model.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The configured model or route does not exist for this key.
    #[error("Model not available")]
    ModelUnavailable,

    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("No response from AI")]
    EmptyResponse,

    #[error("Request to AI provider failed: {0}")]
    Transport(String),
}

//! Language model clients.

mod gemini;
mod sse;

pub use gemini::{GeminiClient, GeminiConfig};

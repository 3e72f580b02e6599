//! Prompt composition and hosted-model generation

pub mod client;
pub mod gemini;
pub mod openai;
pub mod prompt;
pub mod structured;

pub use client::{build_client, GenerationClient, GenerationError, GenerationRequest};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use prompt::PromptBuilder;

//! Gemini provider abstraction and wire types

mod gemini;
mod proxy;

pub use gemini::GeminiProvider;
pub use proxy::ProxyProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when requesting a generation
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Upstream response did not contain generated text")]
    MissingText,
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,

    #[serde(
        rename = "generationConfig",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerateRequest {
    /// Wrap a prompt in the single-part shape the API expects.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
            generation_config: None,
        }
    }

    pub fn with_generation(mut self, temperature: f32, max_output_tokens: u32) -> Self {
        self.generation_config = Some(GenerationConfig {
            temperature,
            max_output_tokens,
        });
        self
    }
}

/// Response body; only the fields the app reads.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateResponse {
    /// `candidates[0].content.parts[0].text`, if present.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
            .map(|p| p.text.as_str())
    }
}

/// Trait for text-generation backends
#[async_trait]
pub trait GenerateProvider: Send + Sync {
    /// Provider name for logging/identification
    fn name(&self) -> &str;

    /// Model being used
    fn model(&self) -> &str;

    /// Send a generation request and return the generated text
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError>;
}

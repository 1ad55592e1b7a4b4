//! haemong - dream interpretation service backed by the Gemini API
//!
//! This crate provides:
//! - A prompt/parse pipeline turning free-form dream text into an eastern
//!   interpretation, a western interpretation, and five lottery number sets
//!   (parsing never fails; it degrades to placeholders and random sets)
//! - A credential-hiding pass-through proxy for the Gemini API
//! - An axum web frontend with a staged, ad-gated number reveal

pub mod ads;
pub mod api;
pub mod lotto;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod session;

pub use orchestrator::Orchestrator;
pub use parser::Interpretation;
pub use provider::{GenerateProvider, GenerateRequest};

/// Configuration for the service
#[derive(Debug, Clone, serde::Deserialize)]
pub struct HaemongConfig {
    /// Port the server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Gemini model used for interpretations
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the upstream Gemini API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Generation cap in tokens; one call carries both interpretations
    /// plus five number sets
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Simulated advertisement length in seconds
    #[serde(default = "default_ad_wait_secs")]
    pub ad_wait_secs: u64,
}

fn default_port() -> u16 {
    8080
}
fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_temperature() -> f32 {
    0.8
}
fn default_max_output_tokens() -> u32 {
    2048
}
fn default_ad_wait_secs() -> u64 {
    3
}

impl Default for HaemongConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            model: default_model(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            ad_wait_secs: default_ad_wait_secs(),
        }
    }
}

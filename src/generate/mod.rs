//! Generative rendering with a deterministic fallback.

pub mod gemini;
pub mod orchestrator;
pub mod prompt;
pub mod quality;

use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;

pub use gemini::GeminiGenerator;
pub use orchestrator::{CloneOutput, FallbackReason, HtmlSource, Orchestrator};

/// Sampling parameters for a single generation request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl From<&GenerationConfig> for GenerationOptions {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

/// Opaque text-to-HTML capability
#[async_trait]
pub trait Generator: Send + Sync {
    /// Whether the capability can be called at all
    fn available(&self) -> bool;

    /// Generate text for `prompt`; transport and quota problems are errors
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;
}

/// A generator that is never available
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableGenerator;

#[async_trait]
impl Generator for UnavailableGenerator {
    fn available(&self) -> bool {
        false
    }

    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
        Err(Error::Generation("generation is disabled".into()))
    }
}

//! Ollama adapter, via Ollama's OpenAI-compatible endpoint.

use crate::options::ProviderSettings;
use crate::providers::openai_compatible::OpenAiCompatibleProvider;
use crate::providers::{Capabilities, Vendor};

const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

pub struct Ollama;

impl Vendor for Ollama {
    type Provider = OpenAiCompatibleProvider;

    const ID: &'static str = "ollama";
    const DESCRIPTION: &'static str = "Local models served by Ollama";

    /// Ollama ignores the API key, so settings without one are fine.
    fn create(settings: ProviderSettings) -> Self::Provider {
        OpenAiCompatibleProvider::new(
            Self::ID,
            "Ollama",
            &settings,
            DEFAULT_BASE_URL,
            Capabilities::CHAT.with_embedding(),
        )
    }
}

//! OpenAI adapter.

use crate::options::ProviderSettings;
use crate::providers::openai_compatible::{OpenAiCompatibleProvider, DEFAULT_BASE_URL};
use crate::providers::{Capabilities, Vendor};

/// OpenAI offers every capability except reranking.
pub const CAPABILITIES: Capabilities = Capabilities::CHAT
    .with_embedding()
    .with_image()
    .with_speech()
    .with_transcription()
    .with_moderation();

pub struct OpenAi;

impl Vendor for OpenAi {
    type Provider = OpenAiCompatibleProvider;

    const ID: &'static str = "openai";
    const DESCRIPTION: &'static str = "OpenAI (GPT, DALL-E, Whisper, TTS, moderation)";

    fn create(settings: ProviderSettings) -> Self::Provider {
        OpenAiCompatibleProvider::new(Self::ID, "OpenAI", &settings, DEFAULT_BASE_URL, CAPABILITIES)
    }
}

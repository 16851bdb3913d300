//! Provider adapters.
//!
//! Each vendor is a unit type implementing [`Vendor`], which knows the
//! vendor's id and how to build a live [`AiProvider`] from settings. Most
//! vendors speak the OpenAI dialect and share [`OpenAiCompatibleProvider`];
//! they differ only in id, default base URL and the capabilities they expose.

use crate::capabilities::AiProvider;
use crate::options::ProviderSettings;

/// A known vendor that can build adapters.
pub trait Vendor {
    /// The adapter type produced by this vendor.
    type Provider: AiProvider + 'static;

    /// Stable registry id.
    const ID: &'static str;

    /// One-line description shown by [`crate::registry::ProviderRegistry::list`].
    const DESCRIPTION: &'static str;

    /// Create a new adapter. Never performs network I/O.
    fn create(settings: ProviderSettings) -> Self::Provider;
}

/// The set of capabilities an OpenAI-dialect vendor exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub language: bool,
    pub embedding: bool,
    pub image: bool,
    pub speech: bool,
    pub transcription: bool,
    pub moderation: bool,
    pub rerank: bool,
}

impl Capabilities {
    /// Chat only.
    pub const CHAT: Self = Self {
        language: true,
        embedding: false,
        image: false,
        speech: false,
        transcription: false,
        moderation: false,
        rerank: false,
    };

    pub const ALL: Self = Self {
        language: true,
        embedding: true,
        image: true,
        speech: true,
        transcription: true,
        moderation: true,
        rerank: true,
    };

    pub const fn with_embedding(mut self) -> Self {
        self.embedding = true;
        self
    }

    pub const fn with_image(mut self) -> Self {
        self.image = true;
        self
    }

    pub const fn with_speech(mut self) -> Self {
        self.speech = true;
        self
    }

    pub const fn with_transcription(mut self) -> Self {
        self.transcription = true;
        self
    }

    pub const fn with_moderation(mut self) -> Self {
        self.moderation = true;
        self
    }

    pub const fn with_rerank(mut self) -> Self {
        self.rerank = true;
        self
    }
}

pub mod anthropic;
pub mod azure;
pub mod google;
pub mod hosted;
pub mod ollama;
pub mod openai;
pub mod openai_compatible;
pub mod openrouter;

// Re-export for convenience
pub use anthropic::{Anthropic, AnthropicProvider};
pub use azure::Azure;
pub use google::{Google, GoogleProvider};
pub use hosted::{
    DeepSeek, Fireworks, Groq, Hyperbolic, Mistral, Moonshot, Perplexity, SiliconFlow, Together,
    XAi,
};
pub use ollama::Ollama;
pub use openai::OpenAi;
pub use openai_compatible::{OpenAiCompatible, OpenAiCompatibleProvider};
pub use openrouter::OpenRouter;

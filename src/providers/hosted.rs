//! Hosted vendors that differ from OpenAI only in endpoint and capability set.

use crate::options::ProviderSettings;
use crate::providers::openai_compatible::OpenAiCompatibleProvider;
use crate::providers::{Capabilities, Vendor};

macro_rules! hosted_vendor {
    ($(#[$meta:meta])* $ty:ident, $id:literal, $name:literal, $base_url:literal, $caps:expr) => {
        $(#[$meta])*
        pub struct $ty;

        impl Vendor for $ty {
            type Provider = OpenAiCompatibleProvider;

            const ID: &'static str = $id;
            const DESCRIPTION: &'static str = $name;

            fn create(settings: ProviderSettings) -> Self::Provider {
                OpenAiCompatibleProvider::new($id, $name, &settings, $base_url, $caps)
            }
        }
    };
}

hosted_vendor!(DeepSeek, "deepseek", "DeepSeek", "https://api.deepseek.com/v1", Capabilities::CHAT);

hosted_vendor!(
    /// Groq also hosts Whisper for transcription.
    Groq,
    "groq",
    "Groq",
    "https://api.groq.com/openai/v1",
    Capabilities::CHAT.with_transcription()
);

hosted_vendor!(
    Mistral,
    "mistral",
    "Mistral AI",
    "https://api.mistral.ai/v1",
    Capabilities::CHAT.with_embedding()
);

hosted_vendor!(
    Together,
    "together",
    "Together AI",
    "https://api.together.xyz/v1",
    Capabilities::CHAT.with_embedding().with_image().with_rerank()
);

hosted_vendor!(XAi, "xai", "xAI", "https://api.x.ai/v1", Capabilities::CHAT.with_image());

hosted_vendor!(
    Moonshot,
    "moonshot",
    "Moonshot AI",
    "https://api.moonshot.cn/v1",
    Capabilities::CHAT
);

hosted_vendor!(
    Fireworks,
    "fireworks",
    "Fireworks AI",
    "https://api.fireworks.ai/inference/v1",
    Capabilities::CHAT.with_embedding()
);

hosted_vendor!(
    Perplexity,
    "perplexity",
    "Perplexity",
    "https://api.perplexity.ai",
    Capabilities::CHAT
);

hosted_vendor!(
    Hyperbolic,
    "hyperbolic",
    "Hyperbolic",
    "https://api.hyperbolic.xyz/v1",
    Capabilities::CHAT
);

hosted_vendor!(
    SiliconFlow,
    "siliconflow",
    "SiliconFlow",
    "https://api.siliconflow.cn/v1",
    Capabilities::CHAT
        .with_embedding()
        .with_image()
        .with_speech()
        .with_transcription()
        .with_rerank()
);

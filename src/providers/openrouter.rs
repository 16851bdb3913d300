//! OpenRouter adapter.
//!
//! App attribution headers (`HTTP-Referer`, `X-Title`) are passed through
//! `ProviderSettings::headers`.

use crate::options::ProviderSettings;
use crate::providers::openai_compatible::OpenAiCompatibleProvider;
use crate::providers::{Capabilities, Vendor};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub struct OpenRouter;

impl Vendor for OpenRouter {
    type Provider = OpenAiCompatibleProvider;

    const ID: &'static str = "openrouter";
    const DESCRIPTION: &'static str = "OpenRouter model marketplace";

    fn create(settings: ProviderSettings) -> Self::Provider {
        OpenAiCompatibleProvider::new(
            Self::ID,
            "OpenRouter",
            &settings,
            DEFAULT_BASE_URL,
            Capabilities::CHAT,
        )
    }
}

//! Anthropic adapter.

use std::sync::Arc;

use crate::api::anthropic::{AnthropicChatModel, ANTHROPIC_VERSION};
use crate::capabilities::{AiProvider, LanguageModel};
use crate::http::{Auth, Endpoint};
use crate::options::ProviderSettings;
use crate::providers::Vendor;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Claude models over the Messages API. Language generation only.
#[derive(Debug)]
pub struct AnthropicProvider {
    endpoint: Arc<Endpoint>,
}

impl AnthropicProvider {
    pub fn new(settings: &ProviderSettings) -> Self {
        // anthropic-version is mandatory; a caller-supplied header takes precedence.
        let mut settings = settings.clone();
        if !settings
            .headers
            .keys()
            .any(|k| k.eq_ignore_ascii_case("anthropic-version"))
        {
            settings
                .headers
                .insert("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string());
        }

        Self {
            endpoint: Endpoint::new(&settings, DEFAULT_BASE_URL, Auth::Header("x-api-key"))
                .shared(),
        }
    }
}

impl AiProvider for AnthropicProvider {
    fn id(&self) -> &str {
        Anthropic::ID
    }

    fn name(&self) -> &str {
        "Anthropic"
    }

    fn language_model(&self, model_id: &str) -> Option<Arc<dyn LanguageModel>> {
        Some(Arc::new(AnthropicChatModel::new(
            Anthropic::ID,
            self.endpoint.clone(),
            model_id,
        )))
    }
}

pub struct Anthropic;

impl Vendor for Anthropic {
    type Provider = AnthropicProvider;

    const ID: &'static str = "anthropic";
    const DESCRIPTION: &'static str = "Anthropic Claude (Messages API)";

    fn create(settings: ProviderSettings) -> Self::Provider {
        AnthropicProvider::new(&settings)
    }
}

//! Google Gemini adapter.

use std::sync::Arc;

use crate::api::gemini::{GeminiChatModel, GeminiEmbeddingModel};
use crate::capabilities::{AiProvider, EmbeddingModel, LanguageModel};
use crate::http::{Auth, Endpoint};
use crate::options::ProviderSettings;
use crate::providers::Vendor;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug)]
pub struct GoogleProvider {
    endpoint: Arc<Endpoint>,
}

impl GoogleProvider {
    pub fn new(settings: &ProviderSettings) -> Self {
        Self {
            endpoint: Endpoint::new(settings, DEFAULT_BASE_URL, Auth::Header("x-goog-api-key"))
                .shared(),
        }
    }
}

impl AiProvider for GoogleProvider {
    fn id(&self) -> &str {
        Google::ID
    }

    fn name(&self) -> &str {
        "Google Gemini"
    }

    fn language_model(&self, model_id: &str) -> Option<Arc<dyn LanguageModel>> {
        Some(Arc::new(GeminiChatModel::new(
            Google::ID,
            self.endpoint.clone(),
            model_id,
        )))
    }

    fn embedding_model(&self, model_id: &str) -> Option<Arc<dyn EmbeddingModel>> {
        Some(Arc::new(GeminiEmbeddingModel::new(
            Google::ID,
            self.endpoint.clone(),
            model_id,
        )))
    }
}

pub struct Google;

impl Vendor for Google {
    type Provider = GoogleProvider;

    const ID: &'static str = "google";
    const DESCRIPTION: &'static str = "Google Gemini (generateContent, embeddings)";

    fn create(settings: ProviderSettings) -> Self::Provider {
        GoogleProvider::new(&settings)
    }
}

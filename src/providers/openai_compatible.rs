//! Generic adapter for any vendor speaking the OpenAI REST dialect.
//!
//! Also the registry's fallback for unknown provider ids.

use std::sync::Arc;

use crate::api::openai::{
    OpenAiApi, OpenAiChatModel, OpenAiEmbeddingModel, OpenAiImageModel, OpenAiModerationModel,
    OpenAiRerankModel, OpenAiSpeechModel, OpenAiTranscriptionModel,
};
use crate::capabilities::{
    AiProvider, EmbeddingModel, ImageModel, LanguageModel, ModerationModel, RerankModel,
    SpeechModel, TranscriptionModel,
};
use crate::http::{Auth, Endpoint};
use crate::options::ProviderSettings;
use crate::providers::{Capabilities, Vendor};

/// Base URL used when an OpenAI-compatible adapter is given none.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// An OpenAI-dialect adapter parameterized by id, name, endpoint and capabilities.
#[derive(Debug)]
pub struct OpenAiCompatibleProvider {
    id: String,
    name: String,
    api: Arc<OpenAiApi>,
    capabilities: Capabilities,
}

impl OpenAiCompatibleProvider {
    /// Build an adapter that authenticates with a bearer token.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        settings: &ProviderSettings,
        default_base_url: &str,
        capabilities: Capabilities,
    ) -> Self {
        let endpoint = Endpoint::new(settings, default_base_url, Auth::Bearer).shared();
        let id = id.into();
        Self::from_api(id.clone(), name, OpenAiApi::new(id, endpoint), capabilities)
    }

    /// Build an adapter over a prepared [`OpenAiApi`], e.g. one using deployment routing.
    pub fn from_api(
        id: impl Into<String>,
        name: impl Into<String>,
        api: OpenAiApi,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            api: Arc::new(api),
            capabilities,
        }
    }

    /// Adapter for an id nobody registered: the id doubles as display name and
    /// every capability is exposed, leaving the vendor to reject what it lacks.
    pub fn generic(id: impl Into<String>, settings: &ProviderSettings) -> Self {
        let id = id.into();
        Self::new(id.clone(), id, settings, DEFAULT_BASE_URL, Capabilities::ALL)
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn base_url(&self) -> &str {
        self.api.endpoint().base_url()
    }
}

impl AiProvider for OpenAiCompatibleProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn language_model(&self, model_id: &str) -> Option<Arc<dyn LanguageModel>> {
        self.capabilities
            .language
            .then(|| Arc::new(OpenAiChatModel::new(self.api.clone(), model_id)) as _)
    }

    fn embedding_model(&self, model_id: &str) -> Option<Arc<dyn EmbeddingModel>> {
        self.capabilities
            .embedding
            .then(|| Arc::new(OpenAiEmbeddingModel::new(self.api.clone(), model_id)) as _)
    }

    fn image_model(&self, model_id: &str) -> Option<Arc<dyn ImageModel>> {
        self.capabilities
            .image
            .then(|| Arc::new(OpenAiImageModel::new(self.api.clone(), model_id)) as _)
    }

    fn speech_model(&self, model_id: &str) -> Option<Arc<dyn SpeechModel>> {
        self.capabilities
            .speech
            .then(|| Arc::new(OpenAiSpeechModel::new(self.api.clone(), model_id)) as _)
    }

    fn transcription_model(&self, model_id: &str) -> Option<Arc<dyn TranscriptionModel>> {
        self.capabilities
            .transcription
            .then(|| Arc::new(OpenAiTranscriptionModel::new(self.api.clone(), model_id)) as _)
    }

    fn moderation_model(&self, model_id: &str) -> Option<Arc<dyn ModerationModel>> {
        self.capabilities
            .moderation
            .then(|| Arc::new(OpenAiModerationModel::new(self.api.clone(), model_id)) as _)
    }

    fn rerank_model(&self, model_id: &str) -> Option<Arc<dyn RerankModel>> {
        self.capabilities
            .rerank
            .then(|| Arc::new(OpenAiRerankModel::new(self.api.clone(), model_id)) as _)
    }
}

/// Registry entry for self-hosted or unlisted OpenAI-compatible servers.
/// Point it at the server with `base_url`.
pub struct OpenAiCompatible;

impl Vendor for OpenAiCompatible {
    type Provider = OpenAiCompatibleProvider;

    const ID: &'static str = "openai-compatible";
    const DESCRIPTION: &'static str = "Any server exposing the OpenAI REST API";

    fn create(settings: ProviderSettings) -> Self::Provider {
        OpenAiCompatibleProvider::new(
            Self::ID,
            "OpenAI Compatible",
            &settings,
            DEFAULT_BASE_URL,
            Capabilities::ALL,
        )
    }
}

//! Capability contracts.
//!
//! Each AI capability is its own trait so an adapter only implements what the
//! vendor really offers. [`AiProvider`] ties them together: its accessors bind a
//! model id to a client without touching the network, and return `None` for
//! capabilities the vendor lacks.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::ClientError;
use crate::model::{
    EmbedParams, EmbedResult, GenerateTextParams, GenerateTextResult, ImageGenerateParams,
    ImageGenerateResult, ModerationParams, ModerationResult, RerankParams, RerankResult,
    SpeechParams, SpeechResult, TextStream, TranscriptionParams, TranscriptionResult,
};

/// Chat/language generation.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Id of the provider that produced this model.
    fn provider(&self) -> &str;
    fn model_id(&self) -> &str;

    async fn do_generate(&self, params: GenerateTextParams)
        -> Result<GenerateTextResult, ClientError>;

    /// Stream the completion as it is produced.
    async fn do_stream(&self, params: GenerateTextParams) -> Result<TextStream, ClientError>;
}

#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    fn provider(&self) -> &str;
    fn model_id(&self) -> &str;

    async fn do_embed(&self, params: EmbedParams) -> Result<EmbedResult, ClientError>;
}

#[async_trait]
pub trait ImageModel: Send + Sync {
    fn provider(&self) -> &str;
    fn model_id(&self) -> &str;

    async fn do_generate(
        &self,
        params: ImageGenerateParams,
    ) -> Result<ImageGenerateResult, ClientError>;
}

/// Text-to-speech.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    fn provider(&self) -> &str;
    fn model_id(&self) -> &str;

    async fn do_generate(&self, params: SpeechParams) -> Result<SpeechResult, ClientError>;
}

/// Speech-to-text.
#[async_trait]
pub trait TranscriptionModel: Send + Sync {
    fn provider(&self) -> &str;
    fn model_id(&self) -> &str;

    async fn do_transcribe(
        &self,
        params: TranscriptionParams,
    ) -> Result<TranscriptionResult, ClientError>;
}

#[async_trait]
pub trait ModerationModel: Send + Sync {
    fn provider(&self) -> &str;
    fn model_id(&self) -> &str;

    async fn do_moderate(&self, params: ModerationParams)
        -> Result<ModerationResult, ClientError>;
}

#[async_trait]
pub trait RerankModel: Send + Sync {
    fn provider(&self) -> &str;
    fn model_id(&self) -> &str;

    async fn do_rerank(&self, params: RerankParams) -> Result<RerankResult, ClientError>;
}

/// A vendor, seen through the capabilities it supports.
///
/// Every accessor defaults to `None`; adapters override the ones their vendor
/// implements. Calling a model returned from here is the first point at which
/// network I/O happens.
pub trait AiProvider: Send + Sync {
    /// Stable vendor key, e.g. `"openai"`.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    fn language_model(&self, _model_id: &str) -> Option<Arc<dyn LanguageModel>> {
        None
    }

    fn embedding_model(&self, _model_id: &str) -> Option<Arc<dyn EmbeddingModel>> {
        None
    }

    fn image_model(&self, _model_id: &str) -> Option<Arc<dyn ImageModel>> {
        None
    }

    fn speech_model(&self, _model_id: &str) -> Option<Arc<dyn SpeechModel>> {
        None
    }

    fn transcription_model(&self, _model_id: &str) -> Option<Arc<dyn TranscriptionModel>> {
        None
    }

    fn moderation_model(&self, _model_id: &str) -> Option<Arc<dyn ModerationModel>> {
        None
    }

    fn rerank_model(&self, _model_id: &str) -> Option<Arc<dyn RerankModel>> {
        None
    }
}

impl std::fmt::Debug for dyn AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiProvider")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish()
    }
}

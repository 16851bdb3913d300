//! Capability invocation functions.
//!
//! One uniform call surface per capability, independent of which adapter
//! produced the model. Each function marshals its options into the
//! capability's request type, calls the model once, and hands back the result
//! or error untouched.

use bytes::Bytes;

use crate::capabilities::{
    EmbeddingModel, ImageModel, LanguageModel, ModerationModel, RerankModel, SpeechModel,
    TranscriptionModel,
};
use crate::client::ClientError;
use crate::model::{
    EmbedParams, EmbedResult, GenerateTextParams, GenerateTextResult, ImageGenerateParams,
    ImageGenerateResult, ImageResponseFormat, Message, ModerationParams, ModerationResult,
    RerankParams, RerankResult, SpeechParams, SpeechResult, TextStream, TranscriptionParams,
    TranscriptionResult, Usage,
};

pub struct GenerateTextOptions<'a> {
    pub model: &'a dyn LanguageModel,
    pub messages: Vec<Message>,
    pub system: Option<String>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
    pub stop: Vec<String>,
}

impl<'a> GenerateTextOptions<'a> {
    pub fn new(model: &'a dyn LanguageModel, messages: Vec<Message>) -> Self {
        Self {
            model,
            messages,
            system: None,
            temperature: None,
            top_p: None,
            max_tokens: None,
            stop: Vec::new(),
        }
    }

    fn split(self) -> (&'a dyn LanguageModel, GenerateTextParams) {
        let GenerateTextOptions {
            model,
            messages,
            system,
            temperature,
            top_p,
            max_tokens,
            stop,
        } = self;
        let params = GenerateTextParams {
            messages,
            system,
            temperature,
            top_p,
            max_tokens,
            stop,
        };
        (model, params)
    }
}

pub async fn generate_text(
    options: GenerateTextOptions<'_>,
) -> Result<GenerateTextResult, ClientError> {
    let (model, params) = options.split();
    tracing::debug!("generate_text via {}/{}", model.provider(), model.model_id());
    model.do_generate(params).await
}

pub async fn stream_text(options: GenerateTextOptions<'_>) -> Result<TextStream, ClientError> {
    let (model, params) = options.split();
    tracing::debug!("stream_text via {}/{}", model.provider(), model.model_id());
    model.do_stream(params).await
}

pub struct EmbedOptions<'a> {
    pub model: &'a dyn EmbeddingModel,
    pub value: String,
    pub dimensions: Option<u32>,
}

/// Result of embedding a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedOneResult {
    pub embedding: Vec<f32>,
    pub usage: Usage,
}

/// Embed one value.
pub async fn embed(options: EmbedOptions<'_>) -> Result<EmbedOneResult, ClientError> {
    let EmbedOptions {
        model,
        value,
        dimensions,
    } = options;
    tracing::debug!("embed via {}/{}", model.provider(), model.model_id());

    let result = model
        .do_embed(EmbedParams {
            values: vec![value],
            dimensions,
        })
        .await?;
    let embedding = result
        .embeddings
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::Provider("no embedding returned".to_string()))?;

    Ok(EmbedOneResult {
        embedding,
        usage: result.usage,
    })
}

pub struct EmbedManyOptions<'a> {
    pub model: &'a dyn EmbeddingModel,
    pub values: Vec<String>,
    pub dimensions: Option<u32>,
}

/// Embed several values in one call; vectors come back in input order.
pub async fn embed_many(options: EmbedManyOptions<'_>) -> Result<EmbedResult, ClientError> {
    let EmbedManyOptions {
        model,
        values,
        dimensions,
    } = options;
    tracing::debug!("embed_many via {}/{}", model.provider(), model.model_id());
    model.do_embed(EmbedParams { values, dimensions }).await
}

pub struct GenerateImageOptions<'a> {
    pub model: &'a dyn ImageModel,
    pub prompt: String,
    pub n: Option<u32>,
    pub size: Option<String>,
    pub quality: Option<String>,
    pub style: Option<String>,
    pub response_format: Option<ImageResponseFormat>,
}

impl<'a> GenerateImageOptions<'a> {
    pub fn new(model: &'a dyn ImageModel, prompt: impl Into<String>) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            n: None,
            size: None,
            quality: None,
            style: None,
            response_format: None,
        }
    }
}

pub async fn generate_image(
    options: GenerateImageOptions<'_>,
) -> Result<ImageGenerateResult, ClientError> {
    let GenerateImageOptions {
        model,
        prompt,
        n,
        size,
        quality,
        style,
        response_format,
    } = options;
    tracing::debug!("generate_image via {}/{}", model.provider(), model.model_id());
    model
        .do_generate(ImageGenerateParams {
            prompt,
            n,
            size,
            quality,
            style,
            response_format,
        })
        .await
}

pub struct GenerateSpeechOptions<'a> {
    pub model: &'a dyn SpeechModel,
    pub text: String,
    pub voice: Option<String>,
    pub format: Option<String>,
    pub speed: Option<f32>,
    pub instructions: Option<String>,
}

impl<'a> GenerateSpeechOptions<'a> {
    pub fn new(model: &'a dyn SpeechModel, text: impl Into<String>) -> Self {
        Self {
            model,
            text: text.into(),
            voice: None,
            format: None,
            speed: None,
            instructions: None,
        }
    }
}

pub async fn generate_speech(
    options: GenerateSpeechOptions<'_>,
) -> Result<SpeechResult, ClientError> {
    let GenerateSpeechOptions {
        model,
        text,
        voice,
        format,
        speed,
        instructions,
    } = options;
    tracing::debug!("generate_speech via {}/{}", model.provider(), model.model_id());
    model
        .do_generate(SpeechParams {
            text,
            voice,
            format,
            speed,
            instructions,
        })
        .await
}

pub struct TranscriptionOptions<'a> {
    pub model: &'a dyn TranscriptionModel,
    pub audio: Bytes,
    pub media_type: String,
    pub file_name: Option<String>,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub temperature: Option<f32>,
}

impl<'a> TranscriptionOptions<'a> {
    pub fn new(
        model: &'a dyn TranscriptionModel,
        audio: impl Into<Bytes>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            model,
            audio: audio.into(),
            media_type: media_type.into(),
            file_name: None,
            language: None,
            prompt: None,
            temperature: None,
        }
    }
}

pub async fn generate_transcription(
    options: TranscriptionOptions<'_>,
) -> Result<TranscriptionResult, ClientError> {
    let TranscriptionOptions {
        model,
        audio,
        media_type,
        file_name,
        language,
        prompt,
        temperature,
    } = options;
    tracing::debug!(
        "generate_transcription via {}/{}",
        model.provider(),
        model.model_id()
    );
    model
        .do_transcribe(TranscriptionParams {
            audio,
            media_type,
            file_name,
            language,
            prompt,
            temperature,
        })
        .await
}

pub struct ModerateOptions<'a> {
    pub model: &'a dyn ModerationModel,
    pub input: Vec<String>,
}

pub async fn moderate(options: ModerateOptions<'_>) -> Result<ModerationResult, ClientError> {
    let ModerateOptions { model, input } = options;
    tracing::debug!("moderate via {}/{}", model.provider(), model.model_id());
    model.do_moderate(ModerationParams { input }).await
}

pub struct RerankOptions<'a> {
    pub model: &'a dyn RerankModel,
    pub query: String,
    pub documents: Vec<String>,
    pub top_n: Option<u32>,
    pub return_documents: Option<bool>,
}

impl<'a> RerankOptions<'a> {
    pub fn new(
        model: &'a dyn RerankModel,
        query: impl Into<String>,
        documents: Vec<String>,
    ) -> Self {
        Self {
            model,
            query: query.into(),
            documents,
            top_n: None,
            return_documents: None,
        }
    }
}

pub async fn rerank(options: RerankOptions<'_>) -> Result<RerankResult, ClientError> {
    let RerankOptions {
        model,
        query,
        documents,
        top_n,
        return_documents,
    } = options;
    tracing::debug!("rerank via {}/{}", model.provider(), model.model_id());
    model
        .do_rerank(RerankParams {
            query,
            documents,
            top_n,
            return_documents,
        })
        .await
}

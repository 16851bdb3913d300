//! Google Gemini API.
//! See: <https://ai.google.dev/api/rest>

use std::sync::Arc;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::capabilities::{EmbeddingModel, LanguageModel};
use crate::client::ClientError;
use crate::http::{error_for_status, Endpoint, RequestBuilderExt, ResponseExt};
use crate::model::{
    EmbedParams, EmbedResult, FinishReason, GenerateTextParams, GenerateTextResult, Role,
    TextStream, TextStreamPart, Usage,
};
use crate::sse::SseResponseExt;

/// Gemini model ids may arrive with or without the `models/` prefix.
fn model_path(model_id: &str) -> String {
    if model_id.starts_with("models/") || model_id.starts_with("tunedModels/") {
        model_id.to_string()
    } else {
        format!("models/{model_id}")
    }
}

async fn send(req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
    let response = req.send().await?;
    if !response.status().is_success() {
        return Err(error_for_status(response, error_message).await);
    }
    Ok(response)
}

fn error_message(body: &str) -> Option<String> {
    let resp = serde_json::from_str::<GeminiErrorResponse>(body).ok()?;
    Some(resp.error.into_message())
}

pub struct GeminiChatModel {
    provider: String,
    endpoint: Arc<Endpoint>,
    model_id: String,
}

impl GeminiChatModel {
    pub fn new(
        provider: impl Into<String>,
        endpoint: Arc<Endpoint>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            endpoint,
            model_id: model_id.into(),
        }
    }

    /// Process streaming response from Gemini.
    fn process_stream(response: reqwest::Response) -> TextStream {
        let parts = response.sse().flat_map(|line| {
            let parts = match line
                .and_then(|l| serde_json::from_str::<GeminiResponse>(&l).map_err(ClientError::from))
            {
                Ok(chunk) => chunk.into_stream_parts(),
                Err(e) => vec![Err(e)],
            };
            stream::iter(parts)
        });
        Box::pin(parts)
    }
}

#[async_trait]
impl LanguageModel for GeminiChatModel {
    fn provider(&self) -> &str {
        &self.provider
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_generate(
        &self,
        params: GenerateTextParams,
    ) -> Result<GenerateTextResult, ClientError> {
        let path = format!("{}:generateContent", model_path(&self.model_id));
        let req = self
            .endpoint
            .post(&path)?
            .json_logged(&GeminiRequest::from(params));
        let response: GeminiResponse = send(req).await?.json_logged().await?;
        response.try_into()
    }

    async fn do_stream(&self, params: GenerateTextParams) -> Result<TextStream, ClientError> {
        let path = format!("{}:streamGenerateContent", model_path(&self.model_id));
        let req = self
            .endpoint
            .post(&path)?
            .query(&[("alt", "sse")])
            .json_logged(&GeminiRequest::from(params));
        let response = send(req).await?;
        Ok(Self::process_stream(response))
    }
}

pub struct GeminiEmbeddingModel {
    provider: String,
    endpoint: Arc<Endpoint>,
    model_id: String,
}

impl GeminiEmbeddingModel {
    pub fn new(
        provider: impl Into<String>,
        endpoint: Arc<Endpoint>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            endpoint,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl EmbeddingModel for GeminiEmbeddingModel {
    fn provider(&self) -> &str {
        &self.provider
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_embed(&self, params: EmbedParams) -> Result<EmbedResult, ClientError> {
        let model = model_path(&self.model_id);
        let body = BatchEmbedRequest {
            requests: params
                .values
                .into_iter()
                .map(|text| EmbedContentRequest {
                    model: model.clone(),
                    content: GeminiContent::text(None, text),
                    output_dimensionality: params.dimensions,
                })
                .collect(),
        };
        let req = self
            .endpoint
            .post(&format!("{model}:batchEmbedContents"))?
            .json_logged(&body);
        let response: BatchEmbedResponse = send(req).await?.json_logged().await?;

        Ok(EmbedResult {
            embeddings: response.embeddings.into_iter().map(|e| e.values).collect(),
            usage: Usage::default(),
        })
    }
}

// --- Request Types ---

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    system_instruction: Option<GeminiContent>,
    generation_config: Option<GenerationConfig>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn text(role: Option<&str>, text: String) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![GeminiPart {
                text: Some(text),
                thought: None,
            }],
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: Option<String>,
    thought: Option<bool>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: Option<f32>,
    top_p: Option<f32>,
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
}

impl From<GenerateTextParams> for GeminiRequest {
    fn from(params: GenerateTextParams) -> Self {
        let mut system = params.system.into_iter().collect::<Vec<_>>();
        let mut contents = Vec::new();

        for msg in params.messages {
            match msg.role {
                Role::System => system.push(msg.content),
                Role::User => contents.push(GeminiContent::text(Some("user"), msg.content)),
                Role::Assistant => contents.push(GeminiContent::text(Some("model"), msg.content)),
            }
        }

        GeminiRequest {
            contents,
            system_instruction: (!system.is_empty())
                .then(|| GeminiContent::text(None, system.join("\n"))),
            generation_config: Some(GenerationConfig {
                temperature: params.temperature,
                top_p: params.top_p,
                max_output_tokens: params.max_tokens,
                stop_sequences: params.stop,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    model: String,
    content: GeminiContent,
    output_dimensionality: Option<u32>,
}

// --- Response Types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<UsageMetadata>,
    /// Set when the stream fails after the response has started.
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    thoughts_token_count: Option<u32>,
}

impl From<UsageMetadata> for Usage {
    fn from(u: UsageMetadata) -> Self {
        let completion = match (u.candidates_token_count, u.thoughts_token_count) {
            (None, None) => None,
            (c, t) => Some(c.unwrap_or(0) + t.unwrap_or(0)),
        };
        Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: completion,
        }
    }
}

fn finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            FinishReason::ContentFilter
        }
        _ => FinishReason::Other,
    }
}

impl GeminiCandidate {
    /// Visible text only; thought summaries are dropped.
    fn text(&self) -> String {
        self.content
            .iter()
            .flat_map(|c| &c.parts)
            .filter(|p| p.thought != Some(true))
            .filter_map(|p| p.text.as_deref())
            .join("")
    }
}

impl TryFrom<GeminiResponse> for GenerateTextResult {
    type Error = ClientError;

    fn try_from(resp: GeminiResponse) -> Result<Self, Self::Error> {
        if let Some(error) = resp.error {
            return Err(ClientError::Provider(error.into_message()));
        }
        let candidate = resp
            .candidates
            .first()
            .ok_or_else(|| ClientError::Provider("response contained no candidates".to_string()))?;

        Ok(GenerateTextResult {
            text: candidate.text(),
            finish_reason: candidate
                .finish_reason
                .as_deref()
                .map(finish_reason)
                .unwrap_or(FinishReason::Stop),
            usage: resp.usage_metadata.map(Usage::from).unwrap_or_default(),
        })
    }
}

impl GeminiResponse {
    fn into_stream_parts(self) -> Vec<Result<TextStreamPart, ClientError>> {
        if let Some(error) = self.error {
            return vec![Err(ClientError::Provider(error.into_message()))];
        }

        let mut parts = Vec::new();

        if let Some(candidate) = self.candidates.first() {
            let text = candidate.text();
            if !text.is_empty() {
                parts.push(Ok(TextStreamPart::Delta(text)));
            }
            if let Some(reason) = candidate.finish_reason.as_deref() {
                parts.push(Ok(TextStreamPart::Finish(finish_reason(reason))));
            }
        }

        if let Some(usage) = self.usage_metadata {
            parts.push(Ok(TextStreamPart::Usage(usage.into())));
        }

        parts
    }
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
    status: Option<String>,
}

impl GeminiError {
    fn into_message(self) -> String {
        match self.status {
            Some(status) => format!("{status}: {}", self.message),
            None => self.message,
        }
    }
}

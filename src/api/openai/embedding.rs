use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{ApiUsage, OpenAiApi};
use crate::capabilities::EmbeddingModel;
use crate::client::ClientError;
use crate::http::RequestBuilderExt;
use crate::model::{EmbedParams, EmbedResult, Usage};

pub struct OpenAiEmbeddingModel {
    api: Arc<OpenAiApi>,
    model_id: String,
}

impl OpenAiEmbeddingModel {
    pub fn new(api: Arc<OpenAiApi>, model_id: impl Into<String>) -> Self {
        Self {
            api,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl EmbeddingModel for OpenAiEmbeddingModel {
    fn provider(&self) -> &str {
        self.api.provider()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_embed(&self, params: EmbedParams) -> Result<EmbedResult, ClientError> {
        let body = EmbeddingRequest {
            model: &self.model_id,
            input: &params.values,
            dimensions: params.dimensions,
            encoding_format: "float",
        };
        let req = self.api.post(&self.model_id, "embeddings")?.json_logged(&body);
        let mut response: EmbeddingResponse = self.api.send_json(req).await?;

        // Vendors are allowed to return entries out of order.
        response.data.sort_by_key(|d| d.index);

        Ok(EmbedResult {
            embeddings: response.data.into_iter().map(|d| d.embedding).collect(),
            usage: response.usage.map(Usage::from).unwrap_or_default(),
        })
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: Option<u32>,
    encoding_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

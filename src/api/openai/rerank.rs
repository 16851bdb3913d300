//! Reranking, in the `/rerank` shape shared by Jina, Cohere-compatible hosts
//! and SiliconFlow.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::OpenAiApi;
use crate::capabilities::RerankModel;
use crate::client::ClientError;
use crate::http::RequestBuilderExt;
use crate::model::{RerankHit, RerankParams, RerankResult, Usage};

pub struct OpenAiRerankModel {
    api: Arc<OpenAiApi>,
    model_id: String,
}

impl OpenAiRerankModel {
    pub fn new(api: Arc<OpenAiApi>, model_id: impl Into<String>) -> Self {
        Self {
            api,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl RerankModel for OpenAiRerankModel {
    fn provider(&self) -> &str {
        self.api.provider()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_rerank(&self, params: RerankParams) -> Result<RerankResult, ClientError> {
        let body = RerankRequest {
            model: &self.model_id,
            query: &params.query,
            documents: &params.documents,
            top_n: params.top_n,
            return_documents: params.return_documents,
        };
        let req = self.api.post(&self.model_id, "rerank")?.json_logged(&body);
        let response: RerankResponse = self.api.send_json(req).await?;

        let usage = response.usage().map(|tokens| Usage {
            prompt_tokens: Some(tokens),
            completion_tokens: None,
        });
        Ok(RerankResult {
            results: response
                .results
                .into_iter()
                .map(|r| RerankHit {
                    index: r.index,
                    relevance_score: r.relevance_score,
                    document: r.document.map(RerankDocument::into_text),
                })
                .collect(),
            usage,
        })
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: &'a [String],
    top_n: Option<u32>,
    return_documents: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    results: Vec<RerankEntry>,
    usage: Option<RerankUsage>,
    meta: Option<RerankMeta>,
}

impl RerankResponse {
    /// Token count, from `usage.total_tokens` or SiliconFlow's `meta.tokens`.
    fn usage(&self) -> Option<u32> {
        self.usage
            .as_ref()
            .and_then(|u| u.total_tokens.or(u.prompt_tokens))
            .or_else(|| {
                self.meta
                    .as_ref()
                    .and_then(|m| m.tokens.as_ref())
                    .and_then(|t| t.input_tokens)
            })
    }
}

#[derive(Debug, Deserialize)]
struct RerankEntry {
    index: usize,
    relevance_score: f64,
    document: Option<RerankDocument>,
}

/// Some hosts echo the document as a string, others as `{"text": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RerankDocument {
    Text(String),
    Object { text: String },
}

impl RerankDocument {
    fn into_text(self) -> String {
        match self {
            RerankDocument::Text(text) | RerankDocument::Object { text } => text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RerankUsage {
    total_tokens: Option<u32>,
    prompt_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RerankMeta {
    tokens: Option<RerankTokens>,
}

#[derive(Debug, Deserialize)]
struct RerankTokens {
    input_tokens: Option<u32>,
}

//! OpenAI REST API and the many vendors that speak its dialect.
//!
//! One [`OpenAiApi`] per adapter instance; every model bound from it shares the
//! endpoint. Azure-style deployment routing is a flag on the same type since the
//! payloads are identical and only the URL shape differs.
//! See: <https://platform.openai.com/docs/api-reference>

use std::sync::Arc;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::client::ClientError;
use crate::http::{error_for_status, Endpoint, ResponseExt};

mod audio;
mod chat;
mod embedding;
mod image;
mod moderation;
mod rerank;

pub use audio::{OpenAiSpeechModel, OpenAiTranscriptionModel};
pub use chat::OpenAiChatModel;
pub use embedding::OpenAiEmbeddingModel;
pub use image::OpenAiImageModel;
pub use moderation::OpenAiModerationModel;
pub use rerank::OpenAiRerankModel;

/// Shared connection state for OpenAI-style models.
#[derive(Debug)]
pub struct OpenAiApi {
    provider: String,
    endpoint: Arc<Endpoint>,
    deployment_routing: bool,
}

impl OpenAiApi {
    pub fn new(provider: impl Into<String>, endpoint: Arc<Endpoint>) -> Self {
        Self {
            provider: provider.into(),
            endpoint,
            deployment_routing: false,
        }
    }

    /// Route requests through `deployments/{model_id}/...`, as Azure does.
    pub fn with_deployment_routing(mut self) -> Self {
        self.deployment_routing = true;
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn post(&self, model_id: &str, operation: &str) -> Result<RequestBuilder, ClientError> {
        if self.deployment_routing {
            self.endpoint
                .post(&format!("deployments/{model_id}/{operation}"))
        } else {
            self.endpoint.post(operation)
        }
    }

    /// Send a request and decode a JSON body, mapping non-success statuses.
    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(req).await?;
        response.json_logged().await
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = req.send().await?;
        if !response.status().is_success() {
            return Err(error_for_status(response, error_message).await);
        }
        Ok(response)
    }
}

/// Error envelopes seen across OpenAI-compatible vendors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    Nested { error: ErrorBody },
    Flat { error: String },
    Message { message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> String {
        match self.error_type {
            Some(kind) => format!("{kind}: {}", self.message),
            None => self.message,
        }
    }
}

pub(crate) fn error_message(body: &str) -> Option<String> {
    match serde_json::from_str::<ErrorEnvelope>(body).ok()? {
        ErrorEnvelope::Nested { error } => Some(error.into_message()),
        ErrorEnvelope::Flat { error } => Some(error),
        ErrorEnvelope::Message { message } => Some(message),
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
}

impl From<ApiUsage> for crate::model::Usage {
    fn from(u: ApiUsage) -> Self {
        Self {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_handles_envelopes() {
        assert_eq!(
            error_message(r#"{"error":{"message":"bad key","type":"invalid_request_error"}}"#),
            Some("invalid_request_error: bad key".to_string())
        );
        assert_eq!(
            error_message(r#"{"error":"model not found"}"#),
            Some("model not found".to_string())
        );
        assert_eq!(
            error_message(r#"{"code":20015,"message":"length exceeded"}"#),
            Some("length exceeded".to_string())
        );
        assert_eq!(error_message("<html>bad gateway</html>"), None);
    }
}

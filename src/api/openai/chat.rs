//! Chat Completions.
//! See: <https://platform.openai.com/docs/api-reference/chat>

use std::sync::Arc;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{ApiUsage, ErrorBody, OpenAiApi};
use crate::capabilities::LanguageModel;
use crate::client::ClientError;
use crate::http::RequestBuilderExt;
use crate::model::{
    FinishReason, GenerateTextParams, GenerateTextResult, Message, Role, TextStream,
    TextStreamPart, Usage,
};
use crate::sse::SseResponseExt;

pub struct OpenAiChatModel {
    api: Arc<OpenAiApi>,
    model_id: String,
}

impl OpenAiChatModel {
    pub fn new(api: Arc<OpenAiApi>, model_id: impl Into<String>) -> Self {
        Self {
            api,
            model_id: model_id.into(),
        }
    }

    fn process_stream(response: reqwest::Response) -> TextStream {
        let parts = response.sse().flat_map(|line| {
            let parts = match line
                .and_then(|l| serde_json::from_str::<ChatStreamChunk>(&l).map_err(ClientError::from))
            {
                Ok(chunk) => chunk.into_parts(),
                Err(e) => vec![Err(e)],
            };
            stream::iter(parts)
        });
        Box::pin(parts)
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    fn provider(&self) -> &str {
        self.api.provider()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_generate(
        &self,
        params: GenerateTextParams,
    ) -> Result<GenerateTextResult, ClientError> {
        let body = ChatRequest::new(&self.model_id, params, false);
        let req = self.api.post(&self.model_id, "chat/completions")?.json_logged(&body);
        let response: ChatResponse = self.api.send_json(req).await?;
        response.try_into()
    }

    async fn do_stream(&self, params: GenerateTextParams) -> Result<TextStream, ClientError> {
        let body = ChatRequest::new(&self.model_id, params, true);
        let req = self.api.post(&self.model_id, "chat/completions")?.json_logged(&body);
        let response = self.api.send(req).await?;
        Ok(Self::process_stream(response))
    }
}

// --- Wire types ---

#[skip_serializing_none]
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
    stream: Option<bool>,
    stream_options: Option<StreamOptions>,
}

#[derive(Debug, Serialize)]
struct StreamOptions {
    include_usage: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

impl From<Message> for ChatMessage {
    fn from(msg: Message) -> Self {
        let role = match msg.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role: role.to_string(),
            content: Some(msg.content),
        }
    }
}

impl ChatRequest {
    fn new(model: &str, params: GenerateTextParams, stream: bool) -> Self {
        let system = params.system.map(Message::system);
        let messages = system
            .into_iter()
            .chain(params.messages)
            .map(ChatMessage::from)
            .collect();

        Self {
            model: model.to_string(),
            messages,
            temperature: params.temperature,
            top_p: params.top_p,
            max_tokens: params.max_tokens,
            stop: params.stop,
            stream: stream.then_some(true),
            stream_options: stream.then_some(StreamOptions { include_usage: true }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

impl TryFrom<ChatResponse> for GenerateTextResult {
    type Error = ClientError;

    fn try_from(resp: ChatResponse) -> Result<Self, Self::Error> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Provider("response contained no choices".to_string()))?;

        Ok(GenerateTextResult {
            text: choice.message.content.unwrap_or_default(),
            finish_reason: choice
                .finish_reason
                .as_deref()
                .map(FinishReason::from_openai)
                .unwrap_or(FinishReason::Stop),
            usage: resp.usage.map(Usage::from).unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatStreamChunk {
    #[serde(default)]
    choices: Vec<ChatStreamChoice>,
    usage: Option<ApiUsage>,
    /// Mid-stream failure, as sent by OpenRouter and other proxies.
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChatStreamChoice {
    delta: Option<ChatDelta>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatDelta {
    content: Option<String>,
}

impl ChatStreamChunk {
    fn into_parts(self) -> Vec<Result<TextStreamPart, ClientError>> {
        if let Some(error) = self.error {
            return vec![Err(ClientError::Provider(error.into_message()))];
        }

        let mut parts = Vec::new();

        if let Some(choice) = self.choices.into_iter().next() {
            if let Some(content) = choice.delta.and_then(|d| d.content) {
                if !content.is_empty() {
                    parts.push(Ok(TextStreamPart::Delta(content)));
                }
            }
            if let Some(reason) = choice.finish_reason {
                parts.push(Ok(TextStreamPart::Finish(FinishReason::from_openai(&reason))));
            }
        }

        if let Some(usage) = self.usage {
            parts.push(Ok(TextStreamPart::Usage(usage.into())));
        }

        parts
    }
}

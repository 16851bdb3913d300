//! Anthropic Messages API.
//! See: <https://docs.anthropic.com/en/api/messages>

use std::sync::Arc;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::capabilities::LanguageModel;
use crate::client::ClientError;
use crate::http::{error_for_status, Endpoint, RequestBuilderExt, ResponseExt};
use crate::model::{
    FinishReason, GenerateTextParams, GenerateTextResult, Message, Role, TextStream,
    TextStreamPart, Usage,
};
use crate::sse::SseResponseExt;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic requires `max_tokens`; used when the caller leaves it unset.
const DEFAULT_MAX_TOKENS: u32 = 4096;

pub struct AnthropicChatModel {
    provider: String,
    endpoint: Arc<Endpoint>,
    model_id: String,
}

impl AnthropicChatModel {
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

    async fn send(&self, body: &AnthropicRequest) -> Result<reqwest::Response, ClientError> {
        let response = self
            .endpoint
            .post("messages")?
            .json_logged(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_for_status(response, error_message).await);
        }
        Ok(response)
    }

    fn process_stream(response: reqwest::Response) -> TextStream {
        let parts = response.sse().flat_map(|line| {
            let parts = match line
                .and_then(|l| serde_json::from_str::<StreamEvent>(&l).map_err(ClientError::from))
            {
                Ok(event) => event.into_parts(),
                Err(e) => vec![Err(e)],
            };
            stream::iter(parts)
        });
        Box::pin(parts)
    }
}

#[async_trait]
impl LanguageModel for AnthropicChatModel {
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
        let body = AnthropicRequest::new(&self.model_id, params, false);
        let response: AnthropicResponse = self.send(&body).await?.json_logged().await?;
        Ok(response.into())
    }

    async fn do_stream(&self, params: GenerateTextParams) -> Result<TextStream, ClientError> {
        let body = AnthropicRequest::new(&self.model_id, params, true);
        let response = self.send(&body).await?;
        Ok(Self::process_stream(response))
    }
}

fn error_message(body: &str) -> Option<String> {
    let resp = serde_json::from_str::<AnthropicErrorResponse>(body).ok()?;
    Some(format!("{}: {}", resp.error.error_type, resp.error.message))
}

// --- Request Types ---

#[skip_serializing_none]
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
    system: Option<String>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
    stream: Option<bool>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

impl AnthropicRequest {
    /// System turns are hoisted into the top-level `system` field, which is the
    /// only place the Messages API accepts them.
    fn new(model: &str, params: GenerateTextParams, stream: bool) -> Self {
        let (system_turns, turns): (Vec<Message>, Vec<Message>) = params
            .messages
            .into_iter()
            .partition(|m| m.role == Role::System);

        let system = params
            .system
            .into_iter()
            .chain(system_turns.into_iter().map(|m| m.content))
            .filter(|s| !s.is_empty())
            .join("\n");

        let messages = turns
            .into_iter()
            .filter(|m| !m.content.is_empty())
            .map(|m| AnthropicMessage {
                role: if m.role == Role::Assistant { "assistant" } else { "user" },
                content: m.content,
            })
            .collect();

        AnthropicRequest {
            model: model.to_string(),
            messages,
            max_tokens: params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: (!system.is_empty()).then_some(system),
            temperature: params.temperature,
            top_p: params.top_p,
            stop_sequences: params.stop,
            stream: stream.then_some(true),
        }
    }
}

// --- Response Types ---

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct AnthropicUsage {
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorResponse {
    error: AnthropicError,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

impl From<AnthropicResponse> for GenerateTextResult {
    fn from(resp: AnthropicResponse) -> Self {
        let text = resp
            .content
            .into_iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text)
            .join("");

        GenerateTextResult {
            text,
            finish_reason: resp
                .stop_reason
                .as_deref()
                .map(FinishReason::from_openai)
                .unwrap_or(FinishReason::Stop),
            usage: Usage {
                prompt_tokens: resp.usage.input_tokens,
                completion_tokens: resp.usage.output_tokens,
            },
        }
    }
}

// --- Streaming Types ---

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    MessageStart { message: StreamMessage },
    ContentBlockDelta { delta: StreamDelta },
    MessageDelta {
        delta: StreamStop,
        #[serde(default)]
        usage: AnthropicUsage,
    },
    Error { error: AnthropicError },
    #[serde(other)]
    Ignored,
}

#[derive(Debug, Deserialize)]
struct StreamMessage {
    #[serde(default)]
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamStop {
    stop_reason: Option<String>,
}

impl StreamEvent {
    fn into_parts(self) -> Vec<Result<TextStreamPart, ClientError>> {
        match self {
            StreamEvent::MessageStart { message } => vec![Ok(TextStreamPart::Usage(Usage {
                prompt_tokens: message.usage.input_tokens,
                completion_tokens: None,
            }))],
            StreamEvent::ContentBlockDelta { delta } => delta
                .text
                .map(|t| vec![Ok(TextStreamPart::Delta(t))])
                .unwrap_or_default(),
            StreamEvent::MessageDelta { delta, usage } => {
                let mut parts = vec![Ok(TextStreamPart::Usage(Usage {
                    prompt_tokens: None,
                    completion_tokens: usage.output_tokens,
                }))];
                if let Some(reason) = delta.stop_reason {
                    parts.push(Ok(TextStreamPart::Finish(FinishReason::from_openai(&reason))));
                }
                parts
            }
            StreamEvent::Error { error } => vec![Err(ClientError::Provider(format!(
                "{}: {}",
                error.error_type, error.message
            )))],
            StreamEvent::Ignored => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_turns_are_hoisted() {
        let params = GenerateTextParams {
            messages: vec![
                Message::system("rule two"),
                Message::user("hi"),
                Message::assistant(""),
            ],
            system: Some("rule one".into()),
            ..Default::default()
        };
        let req = AnthropicRequest::new("claude-sonnet-4-5", params, false);

        assert_eq!(req.system.as_deref(), Some("rule one\nrule two"));
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn stream_events_map_to_parts() {
        let delta: StreamEvent = serde_json::from_str(
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hi"}}"#,
        )
        .unwrap();
        assert!(matches!(
            delta.into_parts().as_slice(),
            [Ok(TextStreamPart::Delta(t))] if t == "Hi"
        ));

        let ping: StreamEvent = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(ping.into_parts().is_empty());

        let stop: StreamEvent = serde_json::from_str(
            r#"{"type":"message_delta","delta":{"stop_reason":"max_tokens"},"usage":{"output_tokens":7}}"#,
        )
        .unwrap();
        let parts: Vec<_> = stop.into_parts().into_iter().map(|p| p.unwrap()).collect();
        assert_eq!(parts[1], TextStreamPart::Finish(FinishReason::Length));
    }
}

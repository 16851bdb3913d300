//! Speech synthesis and transcription.
//! See: <https://platform.openai.com/docs/api-reference/audio>

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::OpenAiApi;
use crate::capabilities::{SpeechModel, TranscriptionModel};
use crate::client::ClientError;
use crate::http::RequestBuilderExt;
use crate::model::{
    SpeechParams, SpeechResult, TranscriptSegment, TranscriptionParams, TranscriptionResult,
};

const DEFAULT_VOICE: &str = "alloy";

pub struct OpenAiSpeechModel {
    api: Arc<OpenAiApi>,
    model_id: String,
}

impl OpenAiSpeechModel {
    pub fn new(api: Arc<OpenAiApi>, model_id: impl Into<String>) -> Self {
        Self {
            api,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl SpeechModel for OpenAiSpeechModel {
    fn provider(&self) -> &str {
        self.api.provider()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_generate(&self, params: SpeechParams) -> Result<SpeechResult, ClientError> {
        let body = SpeechRequest {
            model: &self.model_id,
            input: &params.text,
            voice: params.voice.as_deref().unwrap_or(DEFAULT_VOICE),
            response_format: params.format.as_deref(),
            speed: params.speed,
            instructions: params.instructions.as_deref(),
        };
        let req = self.api.post(&self.model_id, "audio/speech")?.json_logged(&body);
        let response = self.api.send(req).await?;

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| media_type_for(params.format.as_deref()).to_string());
        let audio = response.bytes().await?;
        tracing::debug!("API response: {} bytes of {}", audio.len(), media_type);

        Ok(SpeechResult { audio, media_type })
    }
}

fn media_type_for(format: Option<&str>) -> &'static str {
    match format {
        Some("wav") => "audio/wav",
        Some("opus") => "audio/opus",
        Some("aac") => "audio/aac",
        Some("flac") => "audio/flac",
        Some("pcm") => "audio/pcm",
        _ => "audio/mpeg",
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: Option<&'a str>,
    speed: Option<f32>,
    instructions: Option<&'a str>,
}

pub struct OpenAiTranscriptionModel {
    api: Arc<OpenAiApi>,
    model_id: String,
}

impl OpenAiTranscriptionModel {
    pub fn new(api: Arc<OpenAiApi>, model_id: impl Into<String>) -> Self {
        Self {
            api,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl TranscriptionModel for OpenAiTranscriptionModel {
    fn provider(&self) -> &str {
        self.api.provider()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_transcribe(
        &self,
        params: TranscriptionParams,
    ) -> Result<TranscriptionResult, ClientError> {
        let file_name = params
            .file_name
            .clone()
            .unwrap_or_else(|| format!("audio.{}", extension_for(&params.media_type)));
        tracing::debug!(
            "API request: transcription upload {} ({} bytes)",
            file_name,
            params.audio.len()
        );

        let file = Part::bytes(params.audio.to_vec())
            .file_name(file_name)
            .mime_str(&params.media_type)
            .map_err(|_| ClientError::Config(format!("Invalid media type: {}", params.media_type)))?;

        let mut form = Form::new()
            .part("file", file)
            .text("model", self.model_id.clone())
            .text("response_format", "json");
        if let Some(language) = params.language {
            form = form.text("language", language);
        }
        if let Some(prompt) = params.prompt {
            form = form.text("prompt", prompt);
        }
        if let Some(temperature) = params.temperature {
            form = form.text("temperature", temperature.to_string());
        }

        let req = self.api.post(&self.model_id, "audio/transcriptions")?.multipart(form);
        let response: TranscriptionResponse = self.api.send_json(req).await?;

        Ok(TranscriptionResult {
            text: response.text,
            language: response.language,
            duration_secs: response.duration,
            segments: response.segments,
        })
    }
}

fn extension_for(media_type: &str) -> &str {
    match media_type {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/webm" => "webm",
        "audio/ogg" => "ogg",
        "audio/flac" => "flac",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
        _ => "bin",
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
    language: Option<String>,
    duration: Option<f64>,
    #[serde(default)]
    segments: Vec<TranscriptSegment>,
}

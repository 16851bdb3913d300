use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Speech-to-text request. The audio travels as a multipart upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptionParams {
    pub audio: Bytes,
    pub media_type: String,
    pub file_name: Option<String>,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub language: Option<String>,
    pub duration_secs: Option<f64>,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

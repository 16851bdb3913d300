use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Text-to-speech request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechParams {
    pub text: String,
    pub voice: Option<String>,
    /// Audio container, e.g. `"mp3"`, `"wav"`.
    pub format: Option<String>,
    pub speed: Option<f32>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechResult {
    pub audio: Bytes,
    /// Content type reported by the vendor.
    pub media_type: String,
}

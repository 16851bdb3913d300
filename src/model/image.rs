//! Image generation types.

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::client::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageResponseFormat {
    Url,
    B64Json,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGenerateParams {
    pub prompt: String,
    pub n: Option<u32>,
    /// e.g. `"1024x1024"`.
    pub size: Option<String>,
    pub quality: Option<String>,
    pub style: Option<String>,
    pub response_format: Option<ImageResponseFormat>,
}

/// A generated image carries either a URL or an inline base64 payload.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub url: Option<String>,
    pub b64_json: Option<String>,
    pub revised_prompt: Option<String>,
}

impl GeneratedImage {
    /// Decode the inline payload, if the vendor returned one.
    pub fn bytes(&self) -> Result<Option<Vec<u8>>, ClientError> {
        self.b64_json
            .as_deref()
            .map(|data| {
                base64::engine::general_purpose::STANDARD
                    .decode(data)
                    .map_err(|e| ClientError::Provider(format!("invalid base64 image: {e}")))
            })
            .transpose()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGenerateResult {
    pub images: Vec<GeneratedImage>,
}

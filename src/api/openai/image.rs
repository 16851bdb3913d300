//! Image generation.
//! See: <https://platform.openai.com/docs/api-reference/images/create>

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::OpenAiApi;
use crate::capabilities::ImageModel;
use crate::client::ClientError;
use crate::http::RequestBuilderExt;
use crate::model::{GeneratedImage, ImageGenerateParams, ImageGenerateResult, ImageResponseFormat};

pub struct OpenAiImageModel {
    api: Arc<OpenAiApi>,
    model_id: String,
}

impl OpenAiImageModel {
    pub fn new(api: Arc<OpenAiApi>, model_id: impl Into<String>) -> Self {
        Self {
            api,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl ImageModel for OpenAiImageModel {
    fn provider(&self) -> &str {
        self.api.provider()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_generate(
        &self,
        params: ImageGenerateParams,
    ) -> Result<ImageGenerateResult, ClientError> {
        let body = ImageRequest {
            model: &self.model_id,
            prompt: &params.prompt,
            n: params.n,
            size: params.size.as_deref(),
            quality: params.quality.as_deref(),
            style: params.style.as_deref(),
            response_format: params.response_format,
        };
        let req = self.api.post(&self.model_id, "images/generations")?.json_logged(&body);
        let response: ImageResponse = self.api.send_json(req).await?;

        Ok(ImageGenerateResult {
            images: response.data,
        })
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: Option<u32>,
    size: Option<&'a str>,
    quality: Option<&'a str>,
    style: Option<&'a str>,
    response_format: Option<ImageResponseFormat>,
}

/// The vendor's image entries already match [`GeneratedImage`] field for field.
#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

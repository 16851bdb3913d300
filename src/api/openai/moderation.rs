use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::OpenAiApi;
use crate::capabilities::ModerationModel;
use crate::client::ClientError;
use crate::http::RequestBuilderExt;
use crate::model::{ModerationParams, ModerationResult, ModerationVerdict};

pub struct OpenAiModerationModel {
    api: Arc<OpenAiApi>,
    model_id: String,
}

impl OpenAiModerationModel {
    pub fn new(api: Arc<OpenAiApi>, model_id: impl Into<String>) -> Self {
        Self {
            api,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl ModerationModel for OpenAiModerationModel {
    fn provider(&self) -> &str {
        self.api.provider()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_moderate(
        &self,
        params: ModerationParams,
    ) -> Result<ModerationResult, ClientError> {
        let body = ModerationRequest {
            model: &self.model_id,
            input: &params.input,
        };
        let req = self.api.post(&self.model_id, "moderations")?.json_logged(&body);
        let response: ModerationResponse = self.api.send_json(req).await?;

        Ok(ModerationResult {
            results: response.results,
        })
    }
}

#[derive(Debug, Serialize)]
struct ModerationRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    results: Vec<ModerationVerdict>,
}

//! Azure OpenAI adapter.
//!
//! Same payloads as OpenAI, but requests are routed per deployment
//! (`{base}/deployments/{model_id}/...`), carry an `api-version` query
//! parameter and authenticate with the `api-key` header. The model id passed
//! to the accessors is the deployment name.

use crate::api::openai::OpenAiApi;
use crate::http::{Auth, Endpoint};
use crate::options::ProviderSettings;
use crate::providers::openai_compatible::OpenAiCompatibleProvider;
use crate::providers::{Capabilities, Vendor};

pub const DEFAULT_API_VERSION: &str = "2024-10-21";

/// Azure has no global endpoint; without a base URL every call fails with a
/// configuration error.
const PLACEHOLDER_BASE_URL: &str = "https://{resource}.openai.azure.com/openai";

pub const CAPABILITIES: Capabilities = Capabilities::CHAT
    .with_embedding()
    .with_image()
    .with_speech()
    .with_transcription();

pub struct Azure;

impl Azure {
    /// Build an adapter pinned to a specific `api-version`.
    pub fn with_api_version(
        settings: &ProviderSettings,
        api_version: &str,
    ) -> OpenAiCompatibleProvider {
        let mut endpoint = Endpoint::new(settings, PLACEHOLDER_BASE_URL, Auth::Header("api-key"))
            .with_query("api-version", api_version);
        if settings.base_url.is_none() {
            endpoint = endpoint.with_fault(
                "Azure OpenAI requires a base URL such as https://<resource>.openai.azure.com/openai",
            );
        }

        let api = OpenAiApi::new(Self::ID, endpoint.shared()).with_deployment_routing();
        OpenAiCompatibleProvider::from_api(Self::ID, "Azure OpenAI", api, CAPABILITIES)
    }
}

impl Vendor for Azure {
    type Provider = OpenAiCompatibleProvider;

    const ID: &'static str = "azure";
    const DESCRIPTION: &'static str = "Azure OpenAI Service (deployment-routed)";

    fn create(settings: ProviderSettings) -> Self::Provider {
        Self::with_api_version(&settings, DEFAULT_API_VERSION)
    }
}

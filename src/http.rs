//! HTTP client utilities shared by the vendor wire implementations.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};

use crate::client::ClientError;
use crate::options::ProviderSettings;

/// How an adapter presents its API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// `Authorization: Bearer <key>`.
    Bearer,
    /// The key goes in a vendor-native header, e.g. `x-api-key`.
    Header(&'static str),
}

/// Everything a model client needs to reach its vendor.
///
/// Built once per adapter instance and shared by every model it hands out,
/// so models bound from the same provider reuse one connection pool.
/// Construction never fails: a bad setting is recorded and reported as
/// [`ClientError::Config`] by the first request.
#[derive(Debug)]
pub struct Endpoint {
    http: Option<Client>,
    base_url: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    fault: Option<String>,
}

impl Endpoint {
    /// Build an endpoint from provider settings.
    ///
    /// An absent API key is not an error here; the vendor rejects the first call.
    pub fn new(settings: &ProviderSettings, default_base_url: &str, auth: Auth) -> Self {
        let mut fault = None;

        let http = match build_http_client(settings) {
            Ok(client) => Some(client),
            Err(e) => {
                fault = Some(format!("failed to build HTTP client: {e}"));
                None
            }
        };

        let mut headers = header_map(&settings.headers).unwrap_or_else(|e| {
            fault.get_or_insert(e);
            HeaderMap::new()
        });

        if let Some(key) = settings.api_key.as_deref().filter(|k| !k.is_empty()) {
            let (name, value) = match auth {
                Auth::Bearer => (Ok(AUTHORIZATION), format!("Bearer {key}")),
                Auth::Header(name) => (HeaderName::from_bytes(name.as_bytes()), key.to_string()),
            };
            match (name, HeaderValue::from_str(&value)) {
                // Explicit headers from settings win over the derived auth header.
                (Ok(name), Ok(value)) if !headers.contains_key(&name) => {
                    headers.insert(name, value);
                }
                (Ok(_), Ok(_)) => {}
                (Err(_), _) => {
                    fault.get_or_insert_with(|| format!("Invalid auth header name: {auth:?}"));
                }
                (_, Err(_)) => {
                    fault.get_or_insert_with(|| "Invalid API key".to_string());
                }
            }
        }

        Self {
            http,
            base_url: settings.base_url_or(default_base_url),
            headers,
            query: Vec::new(),
            fault,
        }
    }

    /// Record a configuration problem to be reported on first use.
    pub fn with_fault(mut self, fault: impl Into<String>) -> Self {
        self.fault.get_or_insert(fault.into());
        self
    }

    /// Append a fixed query parameter to every URL built from this endpoint.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Wrap the endpoint for sharing between models.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Start a POST to `path` (relative to the base URL) with auth and extra headers applied.
    pub fn post(&self, path: &str) -> Result<RequestBuilder, ClientError> {
        let http = match (&self.http, &self.fault) {
            (Some(http), None) => http,
            (_, fault) => {
                return Err(ClientError::Config(
                    fault.clone().unwrap_or_else(|| "HTTP client unavailable".to_string()),
                ))
            }
        };

        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut req = http.post(url).headers(self.headers.clone());
        if !self.query.is_empty() {
            req = req.query(&self.query);
        }
        Ok(req)
    }
}

/// Build a configured HTTP client from provider settings.
pub fn build_http_client(settings: &ProviderSettings) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();

    if let Some(t) = settings.timeout {
        builder = builder.timeout(t);
    }

    builder.build()
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, String> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| format!("Invalid header name: {key}"))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| format!("Invalid value for header {key}"))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Turn a non-success response into a [`ClientError::Api`].
///
/// `extract` pulls the human-readable message out of the vendor's error
/// envelope; when it fails the raw body is used.
pub async fn error_for_status(
    response: reqwest::Response,
    extract: fn(&str) -> Option<String>,
) -> ClientError {
    let status: StatusCode = response.status();
    let body = response.text_logged().await.unwrap_or_default();
    let message = extract(&body).unwrap_or_else(|| {
        if body.is_empty() {
            status.canonical_reason().unwrap_or("unknown error").to_string()
        } else {
            body
        }
    });
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Extension trait for RequestBuilder that logs request body.
pub trait RequestBuilderExt {
    /// Set JSON request body and log it. Returns the RequestBuilder for chaining.
    fn json_logged<T: serde::Serialize + ?Sized>(self, json: &T) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
    fn json_logged<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        if let Ok(req_body) = serde_json::to_string_pretty(json) {
            tracing::debug!("API request body ({} bytes):\n{}", req_body.len(), req_body);
        }

        self.json(json)
    }
}

/// Extension trait for Response that logs response body.
#[async_trait::async_trait]
pub trait ResponseExt {
    /// Get response text and log it. Consumes the response.
    async fn text_logged(self) -> Result<String, reqwest::Error>;

    /// Parse response as JSON and log it. Consumes the response.
    async fn json_logged<T: serde::de::DeserializeOwned>(self) -> Result<T, ClientError>;
}

#[async_trait::async_trait]
impl ResponseExt for reqwest::Response {
    async fn text_logged(self) -> Result<String, reqwest::Error> {
        let text = self.text().await?;
        tracing::debug!("API response ({} bytes):\n{}", text.len(), text);
        Ok(text)
    }

    async fn json_logged<T: serde::de::DeserializeOwned>(self) -> Result<T, ClientError> {
        let bytes = self.bytes().await?;

        if let Ok(text) = std::str::from_utf8(&bytes) {
            tracing::debug!("API response ({} bytes):\n{}", text.len(), text);
        }

        serde_json::from_slice(&bytes).map_err(ClientError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_auth_is_derived_from_api_key() {
        let settings = ProviderSettings::new().with_api_key("sk-test");
        let endpoint = Endpoint::new(&settings, "https://api.example.com/v1/", Auth::Bearer);

        assert_eq!(endpoint.base_url(), "https://api.example.com/v1");
        assert_eq!(endpoint.headers().get(AUTHORIZATION).unwrap(), "Bearer sk-test");
    }

    #[test]
    fn explicit_header_overrides_auth() {
        let settings = ProviderSettings::new()
            .with_api_key("sk-test")
            .with_header("X-Api-Key", "from-settings");
        let endpoint = Endpoint::new(&settings, "https://x", Auth::Header("x-api-key"));

        assert_eq!(endpoint.headers().get("x-api-key").unwrap(), "from-settings");
    }

    #[test]
    fn missing_key_sends_no_auth() {
        let endpoint = Endpoint::new(&ProviderSettings::new(), "https://x", Auth::Bearer);
        assert!(endpoint.headers().get(AUTHORIZATION).is_none());
        assert!(endpoint.post("chat/completions").is_ok());
    }

    #[test]
    fn invalid_header_is_reported_on_first_use() {
        let settings = ProviderSettings::new().with_header("bad header", "v");
        let endpoint = Endpoint::new(&settings, "https://x", Auth::Bearer);

        let err = endpoint.post("chat/completions").unwrap_err();
        assert!(matches!(err, ClientError::Config(msg) if msg.contains("bad header")));
    }

    #[test]
    fn auth_header_name_is_normalized() {
        let settings = ProviderSettings::new().with_api_key("k");
        let endpoint = Endpoint::new(&settings, "https://x", Auth::Header("X-Api-Key"));

        assert_eq!(endpoint.headers().get("x-api-key").unwrap(), "k");
        assert!(endpoint.post("messages").is_ok());
    }

    #[test]
    fn invalid_auth_header_name_is_reported_on_first_use() {
        let settings = ProviderSettings::new().with_api_key("k");
        let endpoint = Endpoint::new(&settings, "https://x", Auth::Header("bad header"));

        let err = endpoint.post("messages").unwrap_err();
        assert!(matches!(err, ClientError::Config(msg) if msg.contains("bad header")));
    }

    #[test]
    fn recorded_fault_blocks_requests() {
        let endpoint = Endpoint::new(&ProviderSettings::new(), "https://x", Auth::Bearer)
            .with_fault("base URL required");
        assert!(matches!(endpoint.post("x"), Err(ClientError::Config(_))));
    }
}

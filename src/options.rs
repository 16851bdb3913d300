//! Provider settings shared by every adapter.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::collections::HashMap;
use std::time::Duration;

use crate::client::ClientError;

/// Connection settings handed to an adapter at construction.
///
/// These are the only options an adapter recognizes. Field names follow the
/// camelCase keys used by dictionary/config storage, so a stored JSON blob
/// deserializes directly.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    /// API key. Sent as a bearer token or a vendor-specific header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Overrides the vendor's default endpoint.
    #[serde(rename = "baseURL", alias = "baseUrl", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Additional HTTP headers to send with every request.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    /// Request timeout, in milliseconds on the wire.
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl ProviderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Read settings from `<PREFIX>_API_KEY`, `<PREFIX>_BASE_URL` and
    /// `<PREFIX>_TIMEOUT_MS`.
    ///
    /// The prefix is upper-cased and `-` becomes `_`, so `"open-router"`
    /// reads `OPEN_ROUTER_API_KEY`. Unset variables leave the field empty.
    pub fn from_env(prefix: &str) -> Result<Self, ClientError> {
        Self::from_lookup(prefix, |key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        prefix: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ClientError> {
        let prefix = prefix.to_ascii_uppercase().replace('-', "_");
        let var = |suffix: &str| {
            lookup(&format!("{prefix}_{suffix}")).filter(|v| !v.trim().is_empty())
        };

        let timeout = match var("TIMEOUT_MS") {
            Some(raw) => {
                let millis = raw.trim().parse::<u64>().map_err(|_| {
                    ClientError::Config(format!("{prefix}_TIMEOUT_MS is not a number: {raw}"))
                })?;
                Some(Duration::from_millis(millis))
            }
            None => None,
        };

        Ok(Self {
            api_key: var("API_KEY"),
            base_url: var("BASE_URL"),
            headers: HashMap::new(),
            timeout,
        })
    }

    /// Base URL with any trailing slash removed, or `default` when unset.
    pub(crate) fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }
}

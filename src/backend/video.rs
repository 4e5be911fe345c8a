use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, ERROR_BODY_EXCERPT, MediaBackend, excerpt, http_client};
use crate::foundation::error::DreamResult;

/// Registry entry for a remote video generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoBackendEntry {
    /// Display name, also used as the backend id in logs.
    pub name: String,
    /// Endpoint receiving `{"prompt": ...}` as JSON.
    pub url: String,
    /// Disabled entries fail immediately without any network traffic.
    #[serde(default)]
    pub enabled: bool,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    120
}

impl VideoBackendEntry {
    /// Disabled entry for `name` at `url`.
    pub fn disabled(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            enabled: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Registry shipped by default: a single, disabled Pika Labs entry.
pub fn default_registry() -> Vec<VideoBackendEntry> {
    vec![VideoBackendEntry::disabled(
        "Pika Labs",
        "https://api.pika.art/generate",
    )]
}

/// [`MediaBackend`] for one registry entry.
#[derive(Debug)]
pub struct RegisteredVideoBackend {
    entry: VideoBackendEntry,
    http: Option<HttpClient>,
}

impl RegisteredVideoBackend {
    /// Backend for `entry`. No HTTP client is built for disabled entries.
    pub fn new(entry: VideoBackendEntry) -> DreamResult<Self> {
        let http = if entry.enabled {
            Some(http_client(Duration::from_secs(entry.timeout_secs))?)
        } else {
            None
        };
        Ok(Self { entry, http })
    }
}

impl MediaBackend for RegisteredVideoBackend {
    fn id(&self) -> &str {
        &self.entry.name
    }

    fn attempt(&self, prompt: &str) -> Result<Vec<u8>, BackendError> {
        let Some(http) = self.http.as_ref().filter(|_| self.entry.enabled) else {
            return Err(BackendError::Disabled {
                name: self.entry.name.clone(),
            });
        };

        let response = http
            .post(&self.entry.url)
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: excerpt(&body, ERROR_BODY_EXCERPT),
            });
        }

        let bytes = response.bytes()?.to_vec();
        if bytes.is_empty() {
            return Err(BackendError::TooSmall { size: 0, min: 1 });
        }
        tracing::debug!(backend = %self.entry.name, size = bytes.len(), "video backend responded");
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/video.rs"]
mod tests;

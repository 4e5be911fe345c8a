//! Runtime configuration.
//!
//! Everything the orchestrators need is carried by an explicit [`DreamConfig`] value. It can be
//! deserialized from JSON or assembled from the process environment (optionally seeded from a
//! `.env` file).

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::backend::video::{VideoBackendEntry, default_registry};
use crate::foundation::core::{Canvas, ClipTiming};
use crate::foundation::error::{DreamError, DreamResult};

/// Hosted Stable Diffusion endpoint used when a credential is configured.
pub const DEFAULT_HOSTED_URL: &str =
    "https://api-inference.huggingface.co/models/runwayml/stable-diffusion-v1-5";
/// Free path-based image endpoint.
pub const DEFAULT_FREE_URL: &str = "https://image.pollinations.ai/prompt/";

/// Environment variable holding the hosted-backend bearer token.
pub const ENV_HOSTED_TOKEN: &str = "HUGGINGFACE_TOKEN";
/// Environment variable overriding the output root directory.
pub const ENV_OUTPUT_ROOT: &str = "DREAMFRAME_OUTPUT_ROOT";
/// Environment variable overriding the hosted endpoint URL.
pub const ENV_HOSTED_URL: &str = "DREAMFRAME_HOSTED_URL";
/// Environment variable overriding the free endpoint URL.
pub const ENV_FREE_URL: &str = "DREAMFRAME_FREE_URL";
/// Environment variable overriding the hosted request timeout (seconds).
pub const ENV_HOSTED_TIMEOUT: &str = "DREAMFRAME_HOSTED_TIMEOUT_SECS";
/// Environment variable overriding the free request timeout (seconds).
pub const ENV_FREE_TIMEOUT: &str = "DREAMFRAME_FREE_TIMEOUT_SECS";

/// Top-level configuration for both orchestrators.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DreamConfig {
    /// Directory under which `generated_images/` and `generated_videos/` live.
    pub output_root: PathBuf,
    /// Hosted inference backend settings.
    pub hosted: HostedConfig,
    /// Free public image endpoint settings.
    pub free: FreeApiConfig,
    /// Image output size.
    pub image: Canvas,
    /// Video output settings.
    pub video: VideoConfig,
}

impl Default for DreamConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            hosted: HostedConfig::default(),
            free: FreeApiConfig::default(),
            image: Canvas::square_512(),
            video: VideoConfig::default(),
        }
    }
}

/// Hosted inference backend settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HostedConfig {
    /// Model endpoint URL.
    pub url: String,
    /// Bearer credential. The backend is skipped entirely when absent.
    #[serde(deserialize_with = "deserialize_optional_secret")]
    pub token: Option<SecretString>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Classifier-free guidance scale sent with each request.
    pub guidance_scale: f32,
    /// Number of diffusion steps sent with each request.
    pub num_inference_steps: u32,
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_HOSTED_URL.to_string(),
            token: None,
            timeout_secs: 60,
            guidance_scale: 7.5,
            num_inference_steps: 25,
        }
    }
}

impl HostedConfig {
    /// The configured credential, ignoring empty values.
    pub fn credential(&self) -> Option<SecretString> {
        let token = self.token.as_ref()?;
        let raw = token.expose_secret().trim();
        if raw.is_empty() {
            return None;
        }
        Some(SecretString::from(raw.to_string()))
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Free public image endpoint settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FreeApiConfig {
    /// Base URL; the encoded prompt is appended as the final path segment.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Bodies smaller than this are rejected before decoding.
    pub min_body_bytes: usize,
}

impl Default for FreeApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FREE_URL.to_string(),
            timeout_secs: 10,
            min_body_bytes: 1000,
        }
    }
}

impl FreeApiConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Video output settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Frame size. Must be even in both dimensions for yuv420p output.
    pub canvas: Canvas,
    /// Clip length and frame rate.
    pub timing: ClipTiming,
    /// Frames composed in parallel before being streamed to the encoder.
    pub chunk_size: usize,
    /// Remote video generators, tried in order before the placeholder.
    pub backends: Vec<VideoBackendEntry>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::square_512(),
            timing: ClipTiming::default(),
            chunk_size: 24,
            backends: default_registry(),
        }
    }
}

impl DreamConfig {
    /// Load `.env` (if present) and read overrides from the process environment.
    pub fn from_env() -> DreamResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from defaults plus whatever `lookup` returns for the known keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DreamResult<Self> {
        let mut cfg = Self::default();

        if let Some(root) = lookup(ENV_OUTPUT_ROOT).filter(|v| !v.trim().is_empty()) {
            cfg.output_root = PathBuf::from(root);
        }
        if let Some(token) = lookup(ENV_HOSTED_TOKEN) {
            cfg.hosted.token = Some(SecretString::from(token));
        }
        if let Some(url) = lookup(ENV_HOSTED_URL).filter(|v| !v.trim().is_empty()) {
            cfg.hosted.url = url;
        }
        if let Some(url) = lookup(ENV_FREE_URL).filter(|v| !v.trim().is_empty()) {
            cfg.free.url = url;
        }
        if let Some(secs) = lookup(ENV_HOSTED_TIMEOUT) {
            cfg.hosted.timeout_secs = parse_secs(ENV_HOSTED_TIMEOUT, &secs)?;
        }
        if let Some(secs) = lookup(ENV_FREE_TIMEOUT) {
            cfg.free.timeout_secs = parse_secs(ENV_FREE_TIMEOUT, &secs)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value ranges that would otherwise surface as confusing render/encode failures.
    pub fn validate(&self) -> DreamResult<()> {
        Canvas::new(self.image.width, self.image.height)?;
        Canvas::new(self.video.canvas.width, self.video.canvas.height)?;
        ClipTiming::new(self.video.timing.duration_secs, self.video.timing.fps)?;
        if !self.video.canvas.width.is_multiple_of(2) || !self.video.canvas.height.is_multiple_of(2) {
            return Err(DreamError::validation(
                "video width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.video.chunk_size == 0 {
            return Err(DreamError::validation("video chunk_size must be > 0"));
        }
        if self.hosted.timeout_secs == 0 || self.free.timeout_secs == 0 {
            return Err(DreamError::validation("request timeouts must be > 0"));
        }
        Ok(())
    }

    /// Whether the hosted backend will be placed at the head of the image chain.
    pub fn has_hosted_credential(&self) -> bool {
        self.hosted.credential().is_some()
    }
}

fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(SecretString::from))
}

fn parse_secs(key: &str, raw: &str) -> DreamResult<u64> {
    raw.trim().parse::<u64>().map_err(|e| {
        DreamError::validation(format!("{key} must be a whole number of seconds: {e}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;

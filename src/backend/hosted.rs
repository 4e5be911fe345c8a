use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};

use crate::backend::{BackendError, ERROR_BODY_EXCERPT, MediaBackend, excerpt, http_client};
use crate::foundation::config::HostedConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::DreamResult;

/// Hosted Stable Diffusion inference endpoint (bearer-authenticated JSON POST).
pub struct HostedBackend {
    url: String,
    token: SecretString,
    guidance_scale: f32,
    num_inference_steps: u32,
    canvas: Canvas,
    http: HttpClient,
}

impl std::fmt::Debug for HostedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedBackend")
            .field("url", &self.url)
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl HostedBackend {
    /// Backend for `cfg`, or `None` when no usable credential is configured.
    pub fn from_config(cfg: &HostedConfig, canvas: Canvas) -> DreamResult<Option<Self>> {
        let Some(token) = cfg.credential() else {
            return Ok(None);
        };
        Ok(Some(Self {
            url: cfg.url.clone(),
            token,
            guidance_scale: cfg.guidance_scale,
            num_inference_steps: cfg.num_inference_steps,
            canvas,
            http: http_client(cfg.timeout())?,
        }))
    }

    /// JSON body sent for `prompt`.
    pub fn payload(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "inputs": prompt,
            "parameters": {
                "guidance_scale": self.guidance_scale,
                "num_inference_steps": self.num_inference_steps,
                "width": self.canvas.width,
                "height": self.canvas.height,
            }
        })
    }
}

impl MediaBackend for HostedBackend {
    fn id(&self) -> &str {
        "hosted"
    }

    fn attempt(&self, prompt: &str) -> Result<Vec<u8>, BackendError> {
        tracing::info!(url = %self.url, "requesting hosted inference");
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(self.token.expose_secret())
            .json(&self.payload(prompt))
            .send()?;

        match response.status() {
            StatusCode::OK => Ok(response.bytes()?.to_vec()),
            StatusCode::SERVICE_UNAVAILABLE => Err(BackendError::WarmingUp),
            status => {
                let body = response.text().unwrap_or_default();
                let body = excerpt(&body, ERROR_BODY_EXCERPT);
                tracing::warn!(status = status.as_u16(), body = %body, "hosted inference rejected");
                Err(BackendError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

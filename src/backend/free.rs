use std::io::Cursor;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;

use crate::backend::{BackendError, ERROR_BODY_EXCERPT, MediaBackend, excerpt, http_client};
use crate::foundation::config::FreeApiConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::DreamResult;

/// Free image endpoint taking the prompt as the last path segment.
#[derive(Debug)]
pub struct FreeApiBackend {
    base_url: String,
    canvas: Canvas,
    min_body_bytes: usize,
    timeout: Duration,
    http: HttpClient,
}

impl FreeApiBackend {
    /// Backend for `cfg` producing `canvas`-sized images.
    pub fn from_config(cfg: &FreeApiConfig, canvas: Canvas) -> DreamResult<Self> {
        Ok(Self {
            base_url: cfg.url.clone(),
            canvas,
            min_body_bytes: cfg.min_body_bytes,
            timeout: cfg.timeout(),
            http: http_client(cfg.timeout())?,
        })
    }

    /// Full request URL for `prompt`.
    pub fn request_url(&self, prompt: &str) -> String {
        build_request_url(&self.base_url, prompt, self.canvas)
    }
}

impl MediaBackend for FreeApiBackend {
    fn id(&self) -> &str {
        "free"
    }

    fn attempt(&self, prompt: &str) -> Result<Vec<u8>, BackendError> {
        let url = self.request_url(prompt);
        tracing::info!(url = %url, timeout_s = self.timeout.as_secs(), "requesting free image api");

        let response = self.http.get(&url).send()?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let bytes = response.bytes()?.to_vec();
        tracing::info!(
            status = status.as_u16(),
            content_type = %content_type,
            size = bytes.len(),
            "free image api responded"
        );

        validate_image_body(status, &bytes, self.min_body_bytes)?;
        Ok(bytes)
    }
}

/// `<base><percent-encoded prompt>?width=W&height=H&nologo=true`.
///
/// The prompt is encoded as a single path segment (space becomes `%20`, comma `%2C`). A missing
/// trailing `/` on `base` is added.
pub fn build_request_url(base: &str, prompt: &str, canvas: Canvas) -> String {
    let sep = if base.ends_with('/') { "" } else { "/" };
    format!(
        "{base}{sep}{}?width={}&height={}&nologo=true",
        urlencoding::encode(prompt),
        canvas.width,
        canvas.height
    )
}

/// Accept a free-API response only if the status is 200, the body has at least `min_bytes`
/// bytes and it carries a readable image header.
///
/// Only the header is parsed here; pixels are decoded once, by the caller that keeps them.
pub fn validate_image_body(
    status: StatusCode,
    body: &[u8],
    min_bytes: usize,
) -> Result<(), BackendError> {
    if body.len() < min_bytes {
        return Err(BackendError::TooSmall {
            size: body.len(),
            min: min_bytes,
        });
    }
    if status != StatusCode::OK {
        return Err(BackendError::Status {
            status: status.as_u16(),
            body: excerpt(&String::from_utf8_lossy(body), ERROR_BODY_EXCERPT),
        });
    }
    let (width, height) = image::ImageReader::new(Cursor::new(body))
        .with_guessed_format()
        .map_err(|e| BackendError::Undecodable(e.to_string()))?
        .into_dimensions()
        .map_err(|e| BackendError::Undecodable(e.to_string()))?;
    tracing::debug!(width, height, "free image api body has a readable header");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/backend/free.rs"]
mod tests;

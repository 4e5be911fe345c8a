//! Remote text-to-media backends.
//!
//! Every backend is a thin blocking HTTP caller that turns a prompt into raw bytes or a typed
//! [`BackendError`]. Backend errors never reach callers: the orchestrators log them and move on to
//! the next stage of their fallback chain.

use std::time::Duration;

use anyhow::Context as _;
use reqwest::blocking::Client as HttpClient;

use crate::foundation::error::DreamResult;

/// Free path-based image endpoint.
pub mod free;
/// Hosted Stable Diffusion inference endpoint.
pub mod hosted;
/// Registered remote video generators.
pub mod video;

/// One stage of a fallback chain.
pub trait MediaBackend: Send + Sync {
    /// Stable identifier used in logs.
    fn id(&self) -> &str;
    /// Try once to produce media bytes for `prompt`.
    fn attempt(&self, prompt: &str) -> Result<Vec<u8>, BackendError>;
}

/// Why a backend did not produce usable bytes.
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    /// The backend is registered but switched off; no request was made.
    #[error("no backend available: '{name}' is disabled")]
    Disabled {
        /// Registry name of the backend.
        name: String,
    },

    /// The hosted model is still loading (HTTP 503).
    #[error("model is warming up (HTTP 503)")]
    WarmingUp,

    /// Any other non-success HTTP status.
    #[error("unexpected HTTP status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// The body is too small to be a real image.
    #[error("response body too small ({size} bytes, need at least {min})")]
    TooSmall {
        /// Received body length.
        size: usize,
        /// Required minimum.
        min: usize,
    },

    /// The body is not a decodable image.
    #[error("response body is not a decodable image: {0}")]
    Undecodable(String),

    /// The request timed out.
    #[error("request timed out")]
    Timeout,

    /// Connection, TLS or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Longest response-body excerpt kept in errors and logs.
pub const ERROR_BODY_EXCERPT: usize = 200;

pub(crate) fn http_client(timeout: Duration) -> DreamResult<HttpClient> {
    let client = HttpClient::builder()
        .timeout(timeout)
        .user_agent(concat!("dreamframe/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;
    Ok(client)
}

/// First `max` characters of `body`.
pub fn excerpt(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/mod.rs"]
mod tests;

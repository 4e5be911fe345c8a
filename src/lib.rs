//! Dreamframe turns a text prompt into a persisted media artifact.
//!
//! Each request walks an ordered chain of remote generation backends and, when every one of them
//! fails, falls back to a deterministic placeholder rendered locally. The result is written
//! atomically under the output root and described by an [`ArtifactDescriptor`] carrying the file
//! path and a `/static/...` URL.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: `prompt + filename hint -> GenerationRequest` (empty prompts never go further)
//! 2. **Remote chain**: hosted inference (only with a credential), then the free image API; for
//!    video, the registered remote generators (disabled by default)
//! 3. **Placeholder**: gradient still image, or an animated clip streamed to the system `ffmpeg`
//! 4. **Persist**: PNG or MP4 under `generated_images/` / `generated_videos/`
//!
//! Remote failures are logged and swallowed. Callers only see an error when the placeholder
//! cannot be rendered or the artifact cannot be written.
//!
//! # Deployment requirements
//!
//! - **`ffmpeg` on `PATH`** (built with `libx264`). The placeholder clip, the last video stage,
//!   is encoded by spawning it. Without it every video request that reaches the placeholder
//!   fails with [`DreamError::Synthesis`] and leaves no file behind. Check with
//!   [`is_ffmpeg_on_path`] at startup.
//! - **Fonts are optional.** Installed system fonts are used when present; otherwise a bundled
//!   public-domain face draws the prompt text.
//! - **Network access is optional.** Unreachable backends fall through to the placeholders.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod artifact;
mod foundation;
mod orchestrator;
mod request;
mod service;

/// Remote generation backends.
pub mod backend;
/// Frame sinks and MP4 encoding.
pub mod encode;
/// Placeholder rendering.
pub mod render;

pub use crate::artifact::store::{ArtifactDescriptor, ArtifactStore, MediaKind, TempFileGuard};
pub use crate::backend::free::{FreeApiBackend, build_request_url, validate_image_body};
pub use crate::backend::hosted::HostedBackend;
pub use crate::backend::video::{RegisteredVideoBackend, VideoBackendEntry, default_registry};
pub use crate::backend::{BackendError, MediaBackend};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkFactory, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig, SinkFactory};
pub use crate::foundation::config::{DreamConfig, FreeApiConfig, HostedConfig, VideoConfig};
pub use crate::foundation::core::{Canvas, ClipTiming, FrameIndex};
pub use crate::foundation::error::{DreamError, DreamResult};
pub use crate::foundation::ids::{IdSource, RandomIdSource, SequenceIdSource};
pub use crate::orchestrator::chain::{BackendAttempt, run_chain};
pub use crate::orchestrator::image::ImageOrchestrator;
pub use crate::orchestrator::video::VideoOrchestrator;
pub use crate::render::placeholder_image::PlaceholderImageRenderer;
pub use crate::render::placeholder_video::PlaceholderVideoRenderer;
pub use crate::render::surface::FrameRGBA;
pub use crate::render::text::FontBook;
pub use crate::request::GenerationRequest;
pub use crate::service::Dreamframe;

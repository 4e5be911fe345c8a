use std::io::Write;
use std::sync::Arc;

use image::ImageEncoder as _;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use crate::artifact::store::{ArtifactDescriptor, ArtifactStore, MediaKind};
use crate::backend::free::FreeApiBackend;
use crate::backend::hosted::HostedBackend;
use crate::backend::{BackendError, MediaBackend};
use crate::foundation::config::DreamConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::{DreamError, DreamResult};
use crate::foundation::ids::{IdSource, RandomIdSource};
use crate::orchestrator::chain::run_chain;
use crate::render::placeholder_image::PlaceholderImageRenderer;
use crate::render::text::FontBook;
use crate::request::GenerationRequest;

/// Still image orchestrator: hosted backend (when credentialed), free API, then placeholder.
pub struct ImageOrchestrator {
    backends: Vec<Box<dyn MediaBackend>>,
    placeholder: PlaceholderImageRenderer,
    store: ArtifactStore,
    ids: Arc<dyn IdSource>,
    canvas: Canvas,
}

impl std::fmt::Debug for ImageOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageOrchestrator")
            .field("backends", &self.backend_ids())
            .field("store", &self.store)
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl ImageOrchestrator {
    /// Build the production chain from `cfg`.
    ///
    /// The hosted backend heads the chain only when a non-empty credential is configured.
    pub fn from_config(cfg: &DreamConfig, fonts: FontBook) -> DreamResult<Self> {
        let mut backends: Vec<Box<dyn MediaBackend>> = Vec::with_capacity(2);
        if let Some(hosted) = HostedBackend::from_config(&cfg.hosted, cfg.image)? {
            backends.push(Box::new(hosted));
        }
        backends.push(Box::new(FreeApiBackend::from_config(&cfg.free, cfg.image)?));

        Ok(Self::new(ArtifactStore::new(&cfg.output_root), cfg.image, fonts).with_backends(backends))
    }

    /// Orchestrator with no remote backends: every call renders the placeholder.
    pub fn new(store: ArtifactStore, canvas: Canvas, fonts: FontBook) -> Self {
        Self {
            backends: Vec::new(),
            placeholder: PlaceholderImageRenderer::new(fonts),
            store,
            ids: Arc::new(RandomIdSource),
            canvas,
        }
    }

    /// Replace the remote chain.
    pub fn with_backends(mut self, backends: Vec<Box<dyn MediaBackend>>) -> Self {
        self.backends = backends;
        self
    }

    /// Replace the filename id source.
    pub fn with_ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    /// Ids of the remote backends, in the order they are tried.
    pub fn backend_ids(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.id()).collect()
    }

    /// Output location.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Produce and persist a PNG for `request`.
    ///
    /// Remote failures are swallowed; only placeholder synthesis or the final write can fail.
    #[tracing::instrument(skip(self, request), fields(prompt = %request.prompt()))]
    pub fn generate(&self, request: &GenerationRequest) -> DreamResult<ArtifactDescriptor> {
        let stem = self
            .store
            .resolve_stem(MediaKind::Image, request.filename_hint(), self.ids.as_ref());

        let image = match run_chain(&self.backends, request.prompt(), decode_rgb) {
            Some((backend, image)) => {
                tracing::info!(backend = %backend, w = image.width(), h = image.height(), "using remote image");
                image
            }
            None => {
                tracing::info!("remote backends exhausted; rendering placeholder image");
                self.placeholder.render(request.prompt(), self.canvas)?
            }
        };

        let descriptor = self
            .store
            .write_with(MediaKind::Image, &stem, self.ids.as_ref(), |w| {
                encode_png(&image, w)
            })?;
        tracing::info!(
            path = %descriptor.file_path.display(),
            url = %descriptor.public_url,
            "image saved"
        );
        Ok(descriptor)
    }
}

/// Decode remote bytes into 8-bit RGB.
pub fn decode_rgb(bytes: Vec<u8>) -> Result<image::RgbImage, BackendError> {
    let decoded =
        image::load_from_memory(&bytes).map_err(|e| BackendError::Undecodable(e.to_string()))?;
    Ok(decoded.into_rgb8())
}

/// Encode `image` as PNG with the strongest compression and adaptive row filtering.
pub fn encode_png(image: &image::RgbImage, out: impl Write) -> DreamResult<()> {
    PngEncoder::new_with_quality(out, CompressionType::Best, FilterType::Adaptive)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| DreamError::persistence(format!("png encoding failed: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/orchestrator/image.rs"]
mod tests;

use std::sync::Arc;

use crate::artifact::store::{ArtifactDescriptor, ArtifactStore, MediaKind};
use crate::backend::MediaBackend;
use crate::backend::video::RegisteredVideoBackend;
use crate::encode::sink::SinkFactory;
use crate::foundation::config::DreamConfig;
use crate::foundation::error::DreamResult;
use crate::foundation::ids::{IdSource, RandomIdSource};
use crate::orchestrator::chain::run_chain;
use crate::render::placeholder_video::PlaceholderVideoRenderer;
use crate::render::text::FontBook;
use crate::request::GenerationRequest;

/// Video orchestrator: registered remote generators, then the placeholder clip.
pub struct VideoOrchestrator {
    backends: Vec<Box<dyn MediaBackend>>,
    placeholder: PlaceholderVideoRenderer,
    store: ArtifactStore,
    ids: Arc<dyn IdSource>,
}

impl std::fmt::Debug for VideoOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoOrchestrator")
            .field("backends", &self.backend_ids())
            .field("placeholder", &self.placeholder)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl VideoOrchestrator {
    /// Build from the registry and placeholder settings in `cfg`.
    pub fn from_config(cfg: &DreamConfig, fonts: FontBook) -> DreamResult<Self> {
        let backends = cfg
            .video
            .backends
            .iter()
            .cloned()
            .map(|entry| {
                RegisteredVideoBackend::new(entry).map(|b| Box::new(b) as Box<dyn MediaBackend>)
            })
            .collect::<DreamResult<Vec<_>>>()?;
        let placeholder =
            PlaceholderVideoRenderer::new(fonts, cfg.video.canvas, cfg.video.timing)
                .with_chunk_size(cfg.video.chunk_size);

        Ok(Self::new(ArtifactStore::new(&cfg.output_root), placeholder).with_backends(backends))
    }

    /// Orchestrator with no remote backends.
    pub fn new(store: ArtifactStore, placeholder: PlaceholderVideoRenderer) -> Self {
        Self {
            backends: Vec::new(),
            placeholder,
            store,
            ids: Arc::new(RandomIdSource),
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

    /// Replace the encoder used for placeholder clips.
    pub fn with_encoder(mut self, encoder: Arc<dyn SinkFactory>) -> Self {
        self.placeholder = self.placeholder.with_encoder(encoder);
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

    /// Produce and persist an MP4 for `request`.
    ///
    /// The placeholder clip is rendered to `temp_<hex8>.mp4` next to its destination and renamed
    /// into place; the temp file is gone afterwards on every path.
    #[tracing::instrument(skip(self, request), fields(prompt = %request.prompt()))]
    pub fn generate(&self, request: &GenerationRequest) -> DreamResult<ArtifactDescriptor> {
        let stem = self
            .store
            .resolve_stem(MediaKind::Video, request.filename_hint(), self.ids.as_ref());

        let descriptor = match run_chain(&self.backends, request.prompt(), Ok) {
            Some((backend, bytes)) => {
                tracing::info!(backend = %backend, size = bytes.len(), "using remote video");
                self.store
                    .write_bytes(MediaKind::Video, &stem, self.ids.as_ref(), &bytes)?
            }
            None => {
                tracing::info!("remote video backends exhausted; rendering placeholder clip");
                let temp = self
                    .placeholder
                    .render(request.prompt(), &self.store, self.ids.as_ref())?;
                self.store.adopt(MediaKind::Video, &stem, &temp)?
            }
        };

        tracing::info!(
            path = %descriptor.file_path.display(),
            url = %descriptor.public_url,
            "video saved"
        );
        Ok(descriptor)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/orchestrator/video.rs"]
mod tests;

use crate::artifact::store::ArtifactDescriptor;
use crate::encode::ffmpeg::is_ffmpeg_on_path;
use crate::foundation::config::DreamConfig;
use crate::foundation::error::DreamResult;
use crate::orchestrator::image::ImageOrchestrator;
use crate::orchestrator::video::VideoOrchestrator;
use crate::render::text::FontBook;
use crate::request::GenerationRequest;

/// Entry point pairing an image and a video orchestrator that share one output root.
///
/// Prompts are validated here, before either orchestrator runs.
#[derive(Debug)]
pub struct Dreamframe {
    images: ImageOrchestrator,
    videos: VideoOrchestrator,
}

impl Dreamframe {
    /// Build both orchestrators from `cfg`, using the system font database (or the bundled
    /// face on hosts without fonts).
    pub fn from_config(cfg: &DreamConfig) -> DreamResult<Self> {
        cfg.validate()?;
        let fonts = FontBook::system();
        if !is_ffmpeg_on_path() {
            tracing::warn!("ffmpeg not found on PATH; placeholder videos will fail to encode");
        }
        Ok(Self::new(
            ImageOrchestrator::from_config(cfg, fonts.clone())?,
            VideoOrchestrator::from_config(cfg, fonts)?,
        ))
    }

    /// Pair already-built orchestrators.
    pub fn new(images: ImageOrchestrator, videos: VideoOrchestrator) -> Self {
        Self { images, videos }
    }

    /// Image orchestrator.
    pub fn images(&self) -> &ImageOrchestrator {
        &self.images
    }

    /// Video orchestrator.
    pub fn videos(&self) -> &VideoOrchestrator {
        &self.videos
    }

    /// Validate `prompt`/`filename` and produce a PNG.
    pub fn generate_image(
        &self,
        prompt: &str,
        filename: Option<&str>,
    ) -> DreamResult<ArtifactDescriptor> {
        let request = GenerationRequest::new(prompt, filename)?;
        self.images.generate(&request)
    }

    /// Validate `prompt`/`filename` and produce an MP4.
    pub fn generate_video(
        &self,
        prompt: &str,
        filename: Option<&str>,
    ) -> DreamResult<ArtifactDescriptor> {
        let request = GenerationRequest::new(prompt, filename)?;
        self.videos.generate(&request)
    }
}

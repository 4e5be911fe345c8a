use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{DreamError, DreamResult};
use crate::foundation::ids::IdSource;

/// Kind of media an artifact holds. Fixes directory, URL prefix and extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// PNG still image.
    Image,
    /// MP4 clip.
    Video,
}

impl MediaKind {
    /// Output directory name, relative to the store root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Image => "generated_images",
            Self::Video => "generated_videos",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Image => "png",
            Self::Video => "mp4",
        }
    }

    /// Prefix of generated filenames when the caller gives no hint.
    pub fn stem_prefix(self) -> &'static str {
        match self {
            Self::Image => "dream",
            Self::Video => "video",
        }
    }

    /// Public URL for a stem. The static file server maps this prefix 1:1 to [`Self::dir_name`].
    pub fn public_url(self, stem: &str) -> String {
        format!("/static/{}/{}.{}", self.dir_name(), stem, self.extension())
    }

    fn url_key(self) -> &'static str {
        match self {
            Self::Image => "image_url",
            Self::Video => "video_url",
        }
    }
}

/// A persisted media file plus its externally reachable reference.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArtifactDescriptor {
    /// What was generated.
    pub kind: MediaKind,
    /// Location of the fully written, non-empty file.
    pub file_path: PathBuf,
    /// Path-derived URL under `/static/`.
    pub public_url: String,
}

impl ArtifactDescriptor {
    /// `{file_path, image_url}` or `{file_path, video_url}` depending on [`Self::kind`].
    pub fn response_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(
            "file_path".to_string(),
            serde_json::Value::String(self.file_path.display().to_string()),
        );
        map.insert(
            self.kind.url_key().to_string(),
            serde_json::Value::String(self.public_url.clone()),
        );
        serde_json::Value::Object(map)
    }
}

/// Removes the wrapped path on drop unless disarmed.
#[derive(Debug)]
pub struct TempFileGuard(Option<PathBuf>);

impl TempFileGuard {
    /// Guard `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Some(path.into()))
    }

    /// Guarded path, if still armed.
    pub fn path(&self) -> Option<&Path> {
        self.0.as_deref()
    }

    /// Keep the file and return its path.
    pub fn disarm(mut self) -> Option<PathBuf> {
        self.0.take()
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Filesystem layout for generated artifacts.
///
/// Files are written to a hidden sibling first and renamed into place, so a reader never sees a
/// partially written file under its final name.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Store rooted at `root`. Nothing is created until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output directory for `kind`.
    pub fn dir(&self, kind: MediaKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Create the output directory for `kind` if missing.
    pub fn ensure_dir(&self, kind: MediaKind) -> DreamResult<PathBuf> {
        let dir = self.dir(kind);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))
            .map_err(|e| DreamError::persistence(format!("{e:#}")))?;
        Ok(dir)
    }

    /// The caller's hint, or `<prefix>_<hex8>` from `ids`.
    pub fn resolve_stem(&self, kind: MediaKind, hint: Option<&str>, ids: &dyn IdSource) -> String {
        match hint {
            Some(hint) => hint.to_string(),
            None => format!("{}_{}", kind.stem_prefix(), ids.next_hex8()),
        }
    }

    /// Final location of `stem`.
    pub fn final_path(&self, kind: MediaKind, stem: &str) -> PathBuf {
        self.dir(kind).join(format!("{stem}.{}", kind.extension()))
    }

    /// A fresh `temp_<hex8>.<ext>` path inside the output directory (created if missing).
    pub fn temp_path(&self, kind: MediaKind, ids: &dyn IdSource) -> DreamResult<PathBuf> {
        let dir = self.ensure_dir(kind)?;
        Ok(dir.join(format!("temp_{}.{}", ids.next_hex8(), kind.extension())))
    }

    /// Stream bytes produced by `write` into `<dir>/<stem>.<ext>`.
    ///
    /// On any error, including an empty result, the partial file is removed before returning.
    pub fn write_with<F>(
        &self,
        kind: MediaKind,
        stem: &str,
        ids: &dyn IdSource,
        write: F,
    ) -> DreamResult<ArtifactDescriptor>
    where
        F: FnOnce(&mut BufWriter<File>) -> DreamResult<()>,
    {
        let dir = self.ensure_dir(kind)?;
        let final_path = self.final_path(kind, stem);
        let partial = dir.join(format!(
            ".{stem}.{}.{}.partial",
            ids.next_hex8(),
            kind.extension()
        ));
        let guard = TempFileGuard::new(&partial);

        let file = File::create(&partial)
            .with_context(|| format!("failed to create '{}'", partial.display()))
            .map_err(|e| DreamError::persistence(format!("{e:#}")))?;
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer
            .flush()
            .with_context(|| format!("failed to flush '{}'", partial.display()))
            .map_err(|e| DreamError::persistence(format!("{e:#}")))?;
        let file = writer
            .into_inner()
            .map_err(|e| DreamError::persistence(format!("failed to flush artifact: {e}")))?;
        file.sync_all()
            .with_context(|| format!("failed to sync '{}'", partial.display()))
            .map_err(|e| DreamError::persistence(format!("{e:#}")))?;
        drop(file);

        ensure_non_empty(&partial)?;
        rename_into_place(&partial, &final_path)?;
        let _ = guard.disarm();

        Ok(self.descriptor(kind, stem))
    }

    /// Write `bytes` atomically as `<dir>/<stem>.<ext>`.
    pub fn write_bytes(
        &self,
        kind: MediaKind,
        stem: &str,
        ids: &dyn IdSource,
        bytes: &[u8],
    ) -> DreamResult<ArtifactDescriptor> {
        self.write_with(kind, stem, ids, |w| {
            w.write_all(bytes)
                .context("failed to write artifact bytes")
                .map_err(|e| DreamError::persistence(format!("{e:#}")))
        })
    }

    /// Move an already rendered file at `temp` to `<dir>/<stem>.<ext>`.
    ///
    /// The file is renamed, never copied. `temp` does not exist afterwards whether or not the
    /// move succeeds.
    pub fn adopt(&self, kind: MediaKind, stem: &str, temp: &Path) -> DreamResult<ArtifactDescriptor> {
        let guard = TempFileGuard::new(temp);
        self.ensure_dir(kind)?;
        let final_path = self.final_path(kind, stem);

        ensure_non_empty(temp)?;
        if temp != final_path {
            rename_into_place(temp, &final_path)?;
        }
        let _ = guard.disarm();

        Ok(self.descriptor(kind, stem))
    }

    fn descriptor(&self, kind: MediaKind, stem: &str) -> ArtifactDescriptor {
        ArtifactDescriptor {
            kind,
            file_path: self.final_path(kind, stem),
            public_url: kind.public_url(stem),
        }
    }
}

fn ensure_non_empty(path: &Path) -> DreamResult<()> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("failed to stat '{}'", path.display()))
        .map_err(|e| DreamError::persistence(format!("{e:#}")))?;
    if meta.len() == 0 {
        return Err(DreamError::persistence(format!(
            "refusing to publish empty artifact '{}'",
            path.display()
        )));
    }
    Ok(())
}

fn rename_into_place(from: &Path, to: &Path) -> DreamResult<()> {
    std::fs::rename(from, to)
        .with_context(|| format!("failed to move '{}' to '{}'", from.display(), to.display()))
        .map_err(|e| DreamError::persistence(format!("{e:#}")))
}

#[cfg(test)]
#[path = "../../tests/unit/artifact/store.rs"]
mod tests;

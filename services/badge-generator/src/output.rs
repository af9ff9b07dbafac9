//! Output directory layout and file writing.

use badge_common::{BadgeError, BadgeResult};
use renderer::png::transcode_to_jpeg;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::OutputFormat;

/// Where badges are written: `<root>/<skin>/<player-id>.<ext>`.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    /// Extension the backend encodes to
    extension: &'static str,
    format: OutputFormat,
    jpeg_quality: u8,
}

impl OutputLayout {
    pub fn new<P: Into<PathBuf>>(root: P, extension: &'static str) -> Self {
        Self {
            root: root.into(),
            extension,
            format: OutputFormat::Png,
            jpeg_quality: renderer::png::DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn with_format(mut self, format: OutputFormat, jpeg_quality: u8) -> Self {
        self.format = format;
        self.jpeg_quality = jpeg_quality;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// JPEG only applies to PNG-producing backends.
    fn transcodes(&self) -> bool {
        self.format == OutputFormat::Jpeg && self.extension == "png"
    }

    /// Extension of the files that end up on disk.
    pub fn final_extension(&self) -> &'static str {
        if self.transcodes() {
            "jpg"
        } else {
            self.extension
        }
    }

    pub fn skin_dir(&self, skin: &str) -> PathBuf {
        self.root.join(skin)
    }

    pub fn path_for(&self, skin: &str, player_id: i64) -> PathBuf {
        self.skin_dir(skin)
            .join(format!("{}.{}", player_id, self.final_extension()))
    }

    /// Create one directory per skin. Runs before any worker starts.
    pub async fn prepare<'a, I>(&self, skins: I) -> BadgeResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for skin in skins {
            let dir = self.skin_dir(skin);
            tokio::fs::create_dir_all(&dir).await?;
            debug!(dir = %dir.display(), "Prepared output directory");
        }
        Ok(())
    }

    /// Write one encoded badge and return the final path.
    ///
    /// For JPEG output the PNG is written first, transcoded, and removed
    /// whether or not the transcode succeeded.
    pub async fn write(&self, skin: &str, player_id: i64, bytes: Vec<u8>) -> BadgeResult<PathBuf> {
        let target = self.path_for(skin, player_id);
        if !self.transcodes() {
            tokio::fs::write(&target, &bytes).await?;
            return Ok(target);
        }

        let intermediate = target.with_extension(self.extension);
        tokio::fs::write(&intermediate, &bytes).await?;

        let result = self.transcode_into(&target, bytes).await;
        if let Err(e) = tokio::fs::remove_file(&intermediate).await {
            warn!(path = %intermediate.display(), error = %e, "Failed to remove intermediate PNG");
        }
        result.map(|()| target)
    }

    async fn transcode_into(&self, target: &Path, png: Vec<u8>) -> BadgeResult<()> {
        let quality = self.jpeg_quality;
        let jpeg = tokio::task::spawn_blocking(move || transcode_to_jpeg(&png, quality))
            .await
            .map_err(|e| BadgeError::EncodeError(e.to_string()))??;
        tokio::fs::write(target, jpeg).await?;
        Ok(())
    }
}

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Container type of finished recordings
pub const RECORDING_MIME_TYPE: &str = "video/webm";

/// A finished video: a named file from disk or an anonymous recording
///
/// Artifacts are never mutated after creation; selecting another video
/// replaces the artifact wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoArtifact {
    data: Vec<u8>,
    file_name: Option<String>,
    mime_type: String,
}

impl VideoArtifact {
    /// A named file whose contents are already in memory
    pub fn file(file_name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            data,
            file_name: Some(file_name.into()),
            mime_type: mime_type.into(),
        }
    }

    /// An anonymous blob produced by the recorder
    pub fn recording(data: Vec<u8>) -> Self {
        Self {
            data,
            file_name: None,
            mime_type: RECORDING_MIME_TYPE.to_string(),
        }
    }

    /// Read a file from disk, guessing its mime type from the extension
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read video file: {}", path.display()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let artifact = Self::file(file_name, guess_mime_type(path), data);

        info!(
            "Loaded {} ({}, {} bytes)",
            path.display(),
            artifact.mime_type,
            artifact.size()
        );

        Ok(artifact)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// File name, `None` for recordings
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn is_recording(&self) -> bool {
        self.file_name.is_none()
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }
}

/// Mime type for common video extensions, `application/octet-stream` otherwise
pub fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

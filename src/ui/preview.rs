use std::fmt;

use crate::artifact::VideoArtifact;

/// Name shown for recordings, which have no file name
pub const RECORDING_DISPLAY_NAME: &str = "Recording.webm";

/// Name and size line shown under a selected video
#[derive(Debug, Clone, PartialEq)]
pub struct VideoPreview {
    pub file_name: String,
    pub size_bytes: usize,
}

impl VideoPreview {
    pub fn new(artifact: &VideoArtifact) -> Self {
        Self {
            file_name: artifact
                .file_name()
                .unwrap_or(RECORDING_DISPLAY_NAME)
                .to_string(),
            size_bytes: artifact.size(),
        }
    }

    /// Size in megabytes, two decimals
    pub fn size_mb(&self) -> String {
        format!("{:.2}", self.size_bytes as f64 / (1024.0 * 1024.0))
    }
}

impl fmt::Display for VideoPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} MB)", self.file_name, self.size_mb())
    }
}

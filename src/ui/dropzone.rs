use tracing::{debug, info};

use crate::artifact::VideoArtifact;

/// File selection by drag-and-drop or browsing
///
/// Each interaction yields at most one artifact: the first file offered.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dropzone;

impl Dropzone {
    pub fn new() -> Self {
        Self
    }

    /// Files dropped onto the zone
    ///
    /// Only a video is accepted; anything else is ignored without an error.
    pub fn drop_files(&self, files: Vec<VideoArtifact>) -> Option<VideoArtifact> {
        let first = files.into_iter().next()?;

        if !first.is_video() {
            debug!(
                "Ignoring dropped file {} ({})",
                first.file_name().unwrap_or("<unnamed>"),
                first.mime_type()
            );
            return None;
        }

        info!("Video dropped: {}", first.file_name().unwrap_or("<unnamed>"));
        Some(first)
    }

    /// Files picked in the browse dialog; accepted whatever their type
    pub fn browse(&self, files: Vec<VideoArtifact>) -> Option<VideoArtifact> {
        let first = files.into_iter().next()?;
        info!("Video selected: {}", first.file_name().unwrap_or("<unnamed>"));
        Some(first)
    }
}

use serde::{Deserialize, Serialize};

/// Response body of `POST /analyze`
///
/// When the service cannot analyze the videos it answers with only `error`
/// set, so every other field defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    /// Coaching feedback text
    pub feedback: String,
    /// Frames analyzed in the reference video
    pub reference_frames: u32,
    /// Frames analyzed in the user's video
    pub user_frames: u32,
    /// Analysis-level failure reported alongside a successful status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

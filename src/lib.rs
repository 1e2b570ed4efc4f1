pub mod api;
pub mod artifact;
pub mod capture;
pub mod config;
pub mod ui;

pub use api::{AnalysisClient, AnalysisResult, HttpAnalysisClient};
pub use artifact::VideoArtifact;
pub use capture::{
    CaptureConstraints, CaptureDevice, CaptureSession, CaptureState, DeviceFactory, DeviceSource,
    Fragment, MediaStream,
};
pub use config::Config;
pub use ui::{Dropzone, FeedbackTone, FormCheck, Outcome, Phase, ResponseView, Slot, VideoPreview};

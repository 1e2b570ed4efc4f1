//! Selection, submission and result presentation
//!
//! - `Dropzone`: picks a video by drop or browse
//! - `VideoPreview`: name and size of a selected video
//! - `ResponseView`: renders the analysis outcome
//! - `FormCheck`: holds both videos and drives the submit/reset flow

mod dropzone;
mod orchestrator;
mod preview;
mod response;

pub use dropzone::Dropzone;
pub use orchestrator::{FormCheck, Outcome, Phase, Slot};
pub use preview::{VideoPreview, RECORDING_DISPLAY_NAME};
pub use response::{FeedbackTone, ResponseView};

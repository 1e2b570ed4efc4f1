use thiserror::Error;

/// Message shown when the camera or microphone cannot be acquired
pub const DEVICE_ACCESS_MESSAGE: &str = "Could not access camera. Please allow camera permissions.";

/// Capture session errors
#[derive(Error, Debug)]
pub enum Error {
    /// Permission denied or no device available
    #[error("Could not access camera. Please allow camera permissions.")]
    DeviceAccess { device: String, reason: String },

    /// The stream's recorder refused to start
    #[error("Recorder failed to start: {0}")]
    Recorder(String),
}

pub type Result<T> = std::result::Result<T, Error>;

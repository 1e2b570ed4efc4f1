use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::config::CaptureConfig;

/// A piece of encoded media pushed by a recorder while it runs
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Encoded container bytes
    pub data: Vec<u8>,
    /// Milliseconds since the recorder started
    pub timestamp_ms: u64,
}

/// What to ask the device for when opening a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// Video width in pixels
    pub width: u32,
    /// Video height in pixels
    pub height: u32,
    /// Also capture a microphone track
    pub audio: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            audio: true,
        }
    }
}

/// Capture device trait
///
/// Implementations:
/// - Replay: streams an existing video file (batch use and testing)
/// - Camera: platform camera + microphone (not bundled)
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Acquire a live stream matching `constraints`
    ///
    /// Fails on permission denial or when no device is available. On failure
    /// nothing stays acquired.
    async fn open(&self, constraints: &CaptureConstraints) -> Result<Box<dyn MediaStream>>;

    /// Device name for logging
    fn name(&self) -> &str;
}

/// A live audio/video stream with its hardware tracks and recorder
pub trait MediaStream: Send {
    /// Stream identifier for logging
    fn id(&self) -> &str;

    /// Number of tracks still holding hardware
    fn live_tracks(&self) -> usize;

    /// Start the recorder
    ///
    /// Fragments arrive on the returned receiver in emission order. The
    /// channel closes once the recorder has flushed after `stop_recorder`.
    fn start_recorder(&mut self, mime_type: &str) -> Result<mpsc::Receiver<Fragment>>;

    /// Ask the recorder to flush and close its fragment channel
    fn stop_recorder(&mut self);

    /// Stop every track and release the hardware
    fn stop_tracks(&mut self);
}

/// Capture device source
#[derive(Debug, Clone)]
pub enum DeviceSource {
    /// Camera + microphone
    Camera,
    /// Replay an existing video file as if it were recorded live
    Replay(PathBuf),
}

/// Capture device factory
pub struct DeviceFactory;

impl DeviceFactory {
    /// Create a capture device for `source`
    pub fn create(source: DeviceSource, config: &CaptureConfig) -> Box<dyn CaptureDevice> {
        match source {
            DeviceSource::Camera => Box::new(UnavailableCamera),
            DeviceSource::Replay(path) => Box::new(super::replay::ReplayDevice::new(
                path,
                config.fragment_size,
                config.fragment_buffer,
            )),
        }
    }
}

/// Stand-in for platforms without a bundled camera backend
///
/// Every `open` fails, which the session reports like a denied permission.
struct UnavailableCamera;

#[async_trait::async_trait]
impl CaptureDevice for UnavailableCamera {
    async fn open(&self, _constraints: &CaptureConstraints) -> Result<Box<dyn MediaStream>> {
        anyhow::bail!("No camera backend is available on this platform")
    }

    fn name(&self) -> &str {
        "camera (unavailable)"
    }
}

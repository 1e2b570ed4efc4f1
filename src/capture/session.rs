use std::ops::{Deref, DerefMut};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::device::{CaptureConstraints, CaptureDevice, Fragment, MediaStream};
use super::error::{Error, Result, DEVICE_ACCESS_MESSAGE};
use crate::artifact::VideoArtifact;
use crate::config::CaptureConfig;

/// Observable state of a capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    /// No stream held
    Idle,
    /// Live stream available for display
    Previewing,
    /// Live stream being recorded
    Recording,
    /// Last acquisition failed; `start_preview` retries
    Error(String),
}

/// Owns camera/microphone access and the recording lifecycle
///
/// The stream lives inside the state, so recording without a stream cannot
/// be represented. Tracks are stopped whenever the stream leaves the state,
/// including when the session itself is dropped.
pub struct CaptureSession {
    device: Box<dyn CaptureDevice>,
    constraints: CaptureConstraints,
    mime_type: String,
    state: State,
    finished: Option<VideoArtifact>,
}

enum State {
    Idle,
    Previewing(ActiveStream),
    Recording {
        stream: ActiveStream,
        collector: JoinHandle<Vec<Fragment>>,
    },
    Error(String),
}

impl CaptureSession {
    pub fn new(device: Box<dyn CaptureDevice>, config: &CaptureConfig) -> Self {
        Self {
            device,
            constraints: config.constraints(),
            mime_type: config.mime_type.clone(),
            state: State::Idle,
            finished: None,
        }
    }

    /// Acquire the camera and microphone and enter `Previewing`
    ///
    /// On failure the session enters `Error` with a user-facing message and
    /// holds no stream. Ignored while a stream is already held.
    pub async fn start_preview(&mut self) -> Result<()> {
        if matches!(self.state, State::Previewing(_) | State::Recording { .. }) {
            warn!("Preview already active on {}", self.device.name());
            return Ok(());
        }

        if let Some(stale) = self.finished.take() {
            warn!(
                "Discarding undelivered recording ({} bytes) before new capture",
                stale.size()
            );
        }

        info!(
            "Requesting {}x{} capture (audio={}) from {}",
            self.constraints.width,
            self.constraints.height,
            self.constraints.audio,
            self.device.name()
        );

        match self.device.open(&self.constraints).await {
            Ok(stream) => {
                info!(
                    "Preview started: stream {} ({} tracks)",
                    stream.id(),
                    stream.live_tracks()
                );
                self.state = State::Previewing(ActiveStream(stream));
                Ok(())
            }
            Err(e) => {
                error!("Error accessing media devices on {}: {:#}", self.device.name(), e);
                self.state = State::Error(DEVICE_ACCESS_MESSAGE.to_string());
                Err(Error::DeviceAccess {
                    device: self.device.name().to_string(),
                    reason: format!("{:#}", e),
                })
            }
        }
    }

    /// Release the stream and return to `Idle`
    ///
    /// A recording in progress is cancelled and its fragments discarded.
    pub fn stop_preview(&mut self) {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Previewing(stream) => {
                info!("Preview stopped");
                drop(stream);
            }
            State::Recording { stream, collector } => {
                warn!("Preview stopped during recording; discarding fragments");
                collector.abort();
                drop(stream);
            }
            other => {
                self.state = other;
            }
        }
    }

    /// Start recording the live stream
    ///
    /// No-op unless previewing. Each recording starts with an empty fragment
    /// buffer. Spawns the fragment collector, so it must run inside a tokio
    /// runtime.
    pub fn start_recording(&mut self) -> Result<()> {
        let mut stream = match std::mem::replace(&mut self.state, State::Idle) {
            State::Previewing(stream) => stream,
            other => {
                if matches!(other, State::Recording { .. }) {
                    debug!("Recording already in progress");
                } else {
                    warn!("Cannot start recording without an active stream");
                }
                self.state = other;
                return Ok(());
            }
        };

        match stream.start_recorder(&self.mime_type) {
            Ok(rx) => {
                info!("Recording started on stream {} ({})", stream.id(), self.mime_type);
                let collector = tokio::spawn(collect_fragments(rx));
                self.state = State::Recording { stream, collector };
                Ok(())
            }
            Err(e) => {
                error!("Failed to start recorder on stream {}: {:#}", stream.id(), e);
                self.state = State::Previewing(stream);
                Err(Error::Recorder(format!("{:#}", e)))
            }
        }
    }

    /// Finish the recording, release the stream and keep the artifact for
    /// `take_recording`
    ///
    /// No-op unless recording. Waits for the recorder to flush its last
    /// fragment before assembling the artifact.
    pub async fn stop_recording(&mut self) {
        let (mut stream, collector) = match std::mem::replace(&mut self.state, State::Idle) {
            State::Recording { stream, collector } => (stream, collector),
            other => {
                debug!("Not recording; stop ignored");
                self.state = other;
                return;
            }
        };

        stream.stop_recorder();

        match collector.await {
            Ok(fragments) => {
                let artifact = VideoArtifact::recording(assemble(&fragments));
                info!(
                    "Recording finished: {} fragments, {} bytes",
                    fragments.len(),
                    artifact.size()
                );
                self.finished = Some(artifact);
            }
            Err(e) => {
                error!("Fragment collector failed: {}", e);
            }
        }

        drop(stream);
    }

    /// Hand the finished recording to the caller
    ///
    /// Returns `Some` at most once per recording.
    pub fn take_recording(&mut self) -> Option<VideoArtifact> {
        let artifact = self.finished.take();
        if let Some(a) = &artifact {
            debug!("Recording delivered ({} bytes)", a.size());
        }
        artifact
    }

    /// Peek at the finished recording without taking it
    pub fn finished_recording(&self) -> Option<&VideoArtifact> {
        self.finished.as_ref()
    }

    pub fn state(&self) -> CaptureState {
        match &self.state {
            State::Idle => CaptureState::Idle,
            State::Previewing(_) => CaptureState::Previewing,
            State::Recording { .. } => CaptureState::Recording,
            State::Error(msg) => CaptureState::Error(msg.clone()),
        }
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self.state, State::Previewing(_) | State::Recording { .. })
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, State::Recording { .. })
    }

    /// User-facing message of the last failed acquisition
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            State::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Hardware tracks held by this session
    pub fn live_tracks(&self) -> usize {
        match &self.state {
            State::Previewing(stream) | State::Recording { stream, .. } => stream.live_tracks(),
            _ => 0,
        }
    }

    /// ID of the live stream, if any
    pub fn stream_id(&self) -> Option<&str> {
        match &self.state {
            State::Previewing(stream) | State::Recording { stream, .. } => Some(stream.id()),
            _ => None,
        }
    }

    pub fn device_name(&self) -> &str {
        self.device.name()
    }
}

/// Stops every track when dropped
struct ActiveStream(Box<dyn MediaStream>);

impl Deref for ActiveStream {
    type Target = dyn MediaStream;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for ActiveStream {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

impl Drop for ActiveStream {
    fn drop(&mut self) {
        self.0.stop_recorder();
        self.0.stop_tracks();
        info!("Stream {} released", self.0.id());
    }
}

/// Drain the recorder until it closes the channel, keeping arrival order
async fn collect_fragments(mut rx: mpsc::Receiver<Fragment>) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    while let Some(fragment) = rx.recv().await {
        if fragment.data.is_empty() {
            continue;
        }
        debug!(
            "Fragment {} captured at {}ms ({} bytes)",
            fragments.len(),
            fragment.timestamp_ms,
            fragment.data.len()
        );
        fragments.push(fragment);
    }

    fragments
}

/// Concatenate fragments in emission order
fn assemble(fragments: &[Fragment]) -> Vec<u8> {
    let total = fragments.iter().map(|f| f.data.len()).sum();
    let mut data = Vec::with_capacity(total);
    for fragment in fragments {
        data.extend_from_slice(&fragment.data);
    }
    data
}

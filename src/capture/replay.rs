// Replay capture device
//
// Streams an existing video file through the recorder interface so the
// capture session can be driven without camera hardware.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::device::{CaptureConstraints, CaptureDevice, Fragment, MediaStream};

/// Capture device backed by a video file
pub struct ReplayDevice {
    path: PathBuf,
    fragment_size: usize,
    buffer: usize,
}

impl ReplayDevice {
    pub fn new(path: PathBuf, fragment_size: usize, buffer: usize) -> Self {
        Self {
            path,
            fragment_size: fragment_size.max(1),
            buffer: buffer.max(1),
        }
    }
}

#[async_trait::async_trait]
impl CaptureDevice for ReplayDevice {
    async fn open(&self, constraints: &CaptureConstraints) -> Result<Box<dyn MediaStream>> {
        let meta = tokio::fs::metadata(&self.path)
            .await
            .with_context(|| format!("Replay source not found: {}", self.path.display()))?;

        if !meta.is_file() {
            bail!("Replay source is not a file: {}", self.path.display());
        }

        // One video track, plus audio when requested
        let tracks = if constraints.audio { 2 } else { 1 };

        let stream = ReplayStream {
            id: uuid::Uuid::new_v4().to_string(),
            path: self.path.clone(),
            fragment_size: self.fragment_size,
            buffer: self.buffer,
            live_tracks: tracks,
            stop_flag: Arc::new(AtomicBool::new(false)),
            recording: false,
        };

        info!(
            "Replay stream {} opened from {} ({}x{}, {} tracks)",
            stream.id,
            self.path.display(),
            constraints.width,
            constraints.height,
            tracks
        );

        Ok(Box::new(stream))
    }

    fn name(&self) -> &str {
        "replay"
    }
}

struct ReplayStream {
    id: String,
    path: PathBuf,
    fragment_size: usize,
    buffer: usize,
    live_tracks: usize,
    stop_flag: Arc<AtomicBool>,
    recording: bool,
}

impl MediaStream for ReplayStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn live_tracks(&self) -> usize {
        self.live_tracks
    }

    fn start_recorder(&mut self, mime_type: &str) -> Result<mpsc::Receiver<Fragment>> {
        if self.live_tracks == 0 {
            bail!("Stream {} has no live tracks", self.id);
        }
        if self.recording {
            bail!("Recorder already running on stream {}", self.id);
        }

        info!("Replay recorder started on {} ({})", self.id, mime_type);

        let (tx, rx) = mpsc::channel(self.buffer);
        let stop_flag = Arc::new(AtomicBool::new(false));
        self.stop_flag = Arc::clone(&stop_flag);
        self.recording = true;

        let path = self.path.clone();
        let fragment_size = self.fragment_size;

        tokio::spawn(async move {
            if let Err(e) = replay_file(path, fragment_size, stop_flag, tx).await {
                error!("Replay recorder failed: {}", e);
            }
        });

        Ok(rx)
    }

    fn stop_recorder(&mut self) {
        if self.recording {
            self.stop_flag.store(true, Ordering::SeqCst);
            self.recording = false;
        }
    }

    fn stop_tracks(&mut self) {
        self.stop_recorder();
        self.live_tracks = 0;
    }
}

impl Drop for ReplayStream {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}

/// Push the file as fragments until EOF or until stopped
///
/// Dropping `tx` on return closes the channel, which is the recorder's
/// completion signal.
async fn replay_file(
    path: PathBuf,
    fragment_size: usize,
    stop_flag: Arc<AtomicBool>,
    tx: mpsc::Sender<Fragment>,
) -> Result<()> {
    let mut file = tokio::fs::File::open(&path)
        .await
        .with_context(|| format!("Failed to open replay source: {}", path.display()))?;

    let started = Instant::now();
    let mut sent = 0usize;

    while !stop_flag.load(Ordering::SeqCst) {
        let mut buf = vec![0u8; fragment_size];
        let n = file.read(&mut buf).await.context("Failed to read replay source")?;
        if n == 0 {
            break;
        }
        buf.truncate(n);

        let fragment = Fragment {
            data: buf,
            timestamp_ms: started.elapsed().as_millis() as u64,
        };

        if tx.send(fragment).await.is_err() {
            // Receiver gone; the session cancelled the recording
            break;
        }
        sent += 1;
        debug!("Replay fragment {} sent ({} bytes)", sent, n);
    }

    info!("Replay recorder finished after {} fragments", sent);

    Ok(())
}

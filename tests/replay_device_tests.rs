// Integration tests for the file replay capture device

use anyhow::Result;
use form_check::capture::{
    CaptureConstraints, CaptureDevice, CaptureSession, CaptureState, DeviceFactory, DeviceSource,
    MediaStream, DEVICE_ACCESS_MESSAGE,
};
use form_check::config::CaptureConfig;
use std::time::Duration;
use tempfile::TempDir;

fn small_fragments() -> CaptureConfig {
    CaptureConfig {
        fragment_size: 100,
        fragment_buffer: 4,
        ..CaptureConfig::default()
    }
}

#[tokio::test]
async fn test_replay_emits_file_in_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("clip.webm");
    let contents: Vec<u8> = (0..1050u32).map(|i| (i % 251) as u8).collect();
    std::fs::write(&path, &contents)?;

    let config = small_fragments();
    let device = DeviceFactory::create(DeviceSource::Replay(path), &config);
    let mut stream = device.open(&CaptureConstraints::default()).await?;
    assert_eq!(stream.live_tracks(), 2);

    let mut rx = stream.start_recorder(&config.mime_type)?;

    // Buffer is smaller than the fragment count, so draining must keep up
    let mut received = Vec::new();
    let mut fragments = 0;
    while let Some(fragment) = rx.recv().await {
        received.extend_from_slice(&fragment.data);
        fragments += 1;
    }

    assert_eq!(received, contents);
    assert!(fragments >= 11, "1050 bytes in 100-byte fragments");

    stream.stop_tracks();
    assert_eq!(stream.live_tracks(), 0);

    Ok(())
}

#[tokio::test]
async fn test_replay_recorder_cannot_start_twice() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("clip.webm");
    std::fs::write(&path, vec![1u8; 10])?;

    let device = DeviceFactory::create(DeviceSource::Replay(path), &small_fragments());
    let mut stream = device.open(&CaptureConstraints::default()).await?;

    let _rx = stream.start_recorder("video/webm")?;
    assert!(stream.start_recorder("video/webm").is_err());

    stream.stop_recorder();
    stream.stop_tracks();
    assert!(stream.start_recorder("video/webm").is_err(), "no tracks left");

    Ok(())
}

#[tokio::test]
async fn test_missing_replay_file_is_device_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("missing.webm");

    let config = small_fragments();
    let device = DeviceFactory::create(DeviceSource::Replay(path), &config);
    let mut session = CaptureSession::new(device, &config);

    assert!(session.start_preview().await.is_err());
    assert_eq!(
        session.state(),
        CaptureState::Error(DEVICE_ACCESS_MESSAGE.to_string())
    );

    Ok(())
}

#[tokio::test]
async fn test_camera_unavailable_surfaces_permission_message() {
    let config = CaptureConfig::default();
    let device = DeviceFactory::create(DeviceSource::Camera, &config);
    let mut session = CaptureSession::new(device, &config);

    assert!(session.start_preview().await.is_err());
    assert_eq!(session.error(), Some(DEVICE_ACCESS_MESSAGE));
    assert_eq!(session.live_tracks(), 0);
}

#[tokio::test]
async fn test_session_records_replay_to_artifact() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("attempt.mp4");
    let contents = vec![42u8; 777];
    std::fs::write(&path, &contents)?;

    let config = small_fragments();
    let device = DeviceFactory::create(DeviceSource::Replay(path), &config);
    let mut session = CaptureSession::new(device, &config);

    session.start_preview().await?;
    session.start_recording()?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    session.stop_recording().await;

    assert_eq!(session.state(), CaptureState::Idle);
    let artifact = session.take_recording().expect("recording");
    assert_eq!(artifact.bytes(), contents.as_slice());
    assert_eq!(artifact.mime_type(), "video/webm");

    Ok(())
}

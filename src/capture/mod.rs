//! Camera/microphone capture and recording
//!
//! This module provides the `CaptureSession` that manages:
//! - Acquiring a live stream from a capture device
//! - Recording the stream into ordered fragments
//! - Assembling fragments into a finished video artifact
//! - Releasing every hardware track on each exit path

mod device;
mod error;
mod replay;
mod session;

pub use device::{
    CaptureConstraints, CaptureDevice, DeviceFactory, DeviceSource, Fragment, MediaStream,
};
pub use error::{Error, Result, DEVICE_ACCESS_MESSAGE};
pub use replay::ReplayDevice;
pub use session::{CaptureSession, CaptureState};

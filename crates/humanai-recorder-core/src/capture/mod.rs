mod manager;
mod provider;
mod session;

pub use {
    manager::CaptureManager,
    provider::{AudioConstraints, DeviceCapture, DisplayCapture, DisplayRequest, UserMediaRequest},
    session::{CaptureSession, CaptureSource, SourceRole},
};

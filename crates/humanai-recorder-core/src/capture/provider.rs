//! Collaborator contracts for the platform's capture APIs.
//!
//! The core never talks to a device directly. A display-capture provider
//! hands out the screen (plus any system audio the user shares with it) and
//! a device-capture provider hands out cameras and microphones.

use crate::{CoreResult, media::MediaStream};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Processing hints for a requested audio track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConstraints {
    /// Ask the device to cancel speaker echo.
    pub echo_cancellation: bool,
    /// Ask the device to suppress background noise.
    pub noise_suppression: bool,
    /// Preferred sample rate in Hz.
    pub sample_rate: Option<u32>,
}

impl AudioConstraints {
    /// Voice-oriented processing at 44.1kHz, used by the screen-only recorder.
    pub fn voice() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            sample_rate: Some(44_100),
        }
    }
}

/// Request for a screen or window capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRequest {
    /// Capture the display's video.
    pub video: bool,
    /// Capture system/tab audio with these constraints, if wanted.
    pub audio: Option<AudioConstraints>,
}

/// Request for camera and/or microphone capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserMediaRequest {
    /// Capture a camera.
    pub video: bool,
    /// Capture a microphone with these constraints, if wanted.
    pub audio: Option<AudioConstraints>,
}

/// Screen capture provider. The user picks the screen or window.
#[async_trait]
pub trait DisplayCapture: Send + Sync {
    /// Ask for a display capture.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` if refused, `UserCancelled` if the picker was
    /// dismissed, `DeviceUnavailable` if nothing can be captured.
    async fn request_display_capture(&self, request: DisplayRequest) -> CoreResult<MediaStream>;
}

/// Camera and microphone provider.
#[async_trait]
pub trait DeviceCapture: Send + Sync {
    /// Ask for camera and/or microphone tracks.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` if refused, `DeviceUnavailable` if no matching
    /// device exists.
    async fn request_user_media(&self, request: UserMediaRequest) -> CoreResult<MediaStream>;
}

use crate::config::{
    default_display_height, default_display_width, default_system_audio, default_webcam_height,
    default_webcam_width,
};

use std::fmt;

use serde::{Deserialize, Serialize};

/// A synthetic capture device that can be configured to refuse access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureDevice {
    /// The display picker.
    Screen,
    /// The camera.
    Webcam,
    /// The microphone.
    Microphone,
}

impl CaptureDevice {
    /// Lowercase name used in config and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureDevice::Screen => "screen",
            CaptureDevice::Webcam => "webcam",
            CaptureDevice::Microphone => "microphone",
        }
    }
}

impl fmt::Display for CaptureDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synthetic capture device configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Width of the synthetic display.
    #[serde(default = "default_display_width")]
    pub display_width: u32,
    /// Height of the synthetic display.
    #[serde(default = "default_display_height")]
    pub display_height: u32,
    /// Width of the synthetic webcam.
    #[serde(default = "default_webcam_width")]
    pub webcam_width: u32,
    /// Height of the synthetic webcam.
    #[serde(default = "default_webcam_height")]
    pub webcam_height: u32,
    /// Whether the display share includes a system audio track.
    #[serde(default = "default_system_audio")]
    pub system_audio: bool,
    /// Devices that refuse permission.
    #[serde(default)]
    pub deny: Vec<CaptureDevice>,
}

impl CaptureConfig {
    /// Whether `device` is configured to refuse access.
    pub fn is_denied(&self, device: CaptureDevice) -> bool {
        self.deny.contains(&device)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            display_width: default_display_width(),
            display_height: default_display_height(),
            webcam_width: default_webcam_width(),
            webcam_height: default_webcam_height(),
            system_audio: default_system_audio(),
            deny: Vec::new(),
        }
    }
}

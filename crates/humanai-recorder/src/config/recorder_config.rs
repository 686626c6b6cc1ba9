use crate::config::{default_finalize_timeout_ms, default_show_webcam};

use humanai_recorder_core::{Corner, RecorderOptions, RecorderProfile};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Recorder behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Recorder variant: `combined` (screen + webcam overlay) or `screen-only`.
    #[serde(default)]
    pub profile: RecorderProfile,
    /// Corner the webcam overlay starts in.
    #[serde(default)]
    pub webcam_corner: Corner,
    /// Whether the webcam overlay starts visible.
    #[serde(default = "default_show_webcam")]
    pub show_webcam: bool,
    /// How long to wait for the encoder to finalize after stop.
    #[serde(default = "default_finalize_timeout_ms")]
    pub finalize_timeout_ms: u64,
}

impl RecorderConfig {
    /// Controller options for this configuration.
    pub fn recorder_options(&self) -> RecorderOptions {
        RecorderOptions {
            profile: self.profile,
            webcam_corner: self.webcam_corner,
            show_webcam: self.show_webcam,
            finalize_timeout: Duration::from_millis(self.finalize_timeout_ms),
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            profile: RecorderProfile::default(),
            webcam_corner: Corner::default(),
            show_webcam: default_show_webcam(),
            finalize_timeout_ms: default_finalize_timeout_ms(),
        }
    }
}

use crate::{capture::AudioConstraints, compositor::Corner};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Encoder slice interval for the webcam compositing recorder.
const COMBINED_TIMESLICE: Duration = Duration::from_millis(500);

/// Video bitrate hint for the webcam compositing recorder.
const COMBINED_VIDEO_BITS_PER_SECOND: u32 = 1_500_000;

/// How long `stop()` waits for the encoder to flush.
const DEFAULT_FINALIZE_TIMEOUT: Duration = Duration::from_secs(5);

/// Which recorder to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecorderProfile {
    /// Screen + webcam overlay + microphone, composited on a canvas.
    #[default]
    Combined,
    /// Screen + microphone, screen video recorded as-is.
    ScreenOnly,
}

impl RecorderProfile {
    /// Whether a webcam is acquired and composited.
    pub fn uses_webcam(&self) -> bool {
        matches!(self, RecorderProfile::Combined)
    }

    /// Whether the video track comes from the compositing canvas.
    pub fn uses_compositor(&self) -> bool {
        matches!(self, RecorderProfile::Combined)
    }

    /// Constraints for the audio shared alongside the display.
    pub fn screen_audio(&self) -> AudioConstraints {
        match self {
            RecorderProfile::Combined => AudioConstraints::default(),
            RecorderProfile::ScreenOnly => AudioConstraints::voice(),
        }
    }

    /// Constraints for the microphone.
    pub fn microphone_audio(&self) -> AudioConstraints {
        self.screen_audio()
    }

    /// Encoder slice interval; `None` leaves slicing to the encoder.
    pub fn timeslice(&self) -> Option<Duration> {
        match self {
            RecorderProfile::Combined => Some(COMBINED_TIMESLICE),
            RecorderProfile::ScreenOnly => None,
        }
    }

    /// Video bitrate hint for the encoder.
    pub fn video_bits_per_second(&self) -> Option<u32> {
        match self {
            RecorderProfile::Combined => Some(COMBINED_VIDEO_BITS_PER_SECOND),
            RecorderProfile::ScreenOnly => None,
        }
    }
}

/// Options for a [`RecordingController`](crate::RecordingController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderOptions {
    /// Recorder variant.
    pub profile: RecorderProfile,
    /// Initial webcam overlay corner.
    pub webcam_corner: Corner,
    /// Whether the webcam overlay starts visible.
    pub show_webcam: bool,
    /// Upper bound on waiting for encoder finalization.
    pub finalize_timeout: Duration,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        Self {
            profile: RecorderProfile::default(),
            webcam_corner: Corner::default(),
            show_webcam: true,
            finalize_timeout: DEFAULT_FINALIZE_TIMEOUT,
        }
    }
}

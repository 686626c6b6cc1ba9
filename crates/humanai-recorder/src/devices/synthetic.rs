//! Capture providers backed by generated test patterns.

use crate::{
    config::{CaptureConfig, CaptureDevice},
    devices::pattern::{display_pattern, webcam_pattern},
};

use humanai_recorder_core::{
    AudioConstraints, CoreResult, DeviceCapture, DisplayCapture, DisplayRequest, MediaStream,
    MediaTrack, RecorderError, TrackSettings, UserMediaRequest,
};

use std::{panic::Location, sync::Arc, time::Duration};

use async_trait::async_trait;
use error_location::ErrorLocation;
use image::RgbaImage;
use tokio::{sync::watch, time::MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

/// Frame rate of the synthetic cameras and display.
const DEVICE_FRAME_RATE: u32 = 30;

const DEFAULT_SAMPLE_RATE: u32 = 48_000;

type Pattern = fn(u32, u32, u64) -> RgbaImage;

/// Start a task that publishes `pattern` frames until the track is stopped.
fn spawn_video_track(label: &str, width: u32, height: u32, pattern: Pattern) -> MediaTrack {
    let (frame_tx, frame_rx) = watch::channel(None);
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let task_label = label.to_string();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(1) / DEVICE_FRAME_RATE);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut frame_index: u64 = 0;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    frame_tx.send_replace(Some(Arc::new(pattern(width, height, frame_index))));
                    frame_index += 1;
                }
                // Also fires if the track was dropped without being stopped.
                _ = stop_rx.changed() => break,
            }
        }

        debug!(label = %task_label, frames = frame_index, "Synthetic video source stopped");
    });

    MediaTrack::video(
        label,
        TrackSettings::video(width, height),
        frame_rx,
        move || {
            let _ = stop_tx.send(true);
        },
    )
}

fn silent_audio_track(label: &str, constraints: AudioConstraints) -> MediaTrack {
    let sample_rate = constraints.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
    let stopped_label = label.to_string();

    MediaTrack::audio(label, TrackSettings::audio(sample_rate), move || {
        debug!(label = %stopped_label, "Synthetic audio source stopped");
    })
}

#[track_caller]
fn check_permission(config: &CaptureConfig, device: CaptureDevice) -> CoreResult<()> {
    if config.is_denied(device) {
        warn!(device = %device, "Synthetic device refused permission");
        return Err(RecorderError::PermissionDenied {
            device: device.to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(())
}

/// Display picker that always shares a scrolling color-bar screen.
pub(crate) struct SyntheticDisplay {
    config: CaptureConfig,
}

impl SyntheticDisplay {
    pub(crate) fn new(config: CaptureConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DisplayCapture for SyntheticDisplay {
    #[instrument(skip(self))]
    async fn request_display_capture(&self, request: DisplayRequest) -> CoreResult<MediaStream> {
        check_permission(&self.config, CaptureDevice::Screen)?;

        if !request.video {
            return Err(RecorderError::DeviceUnavailable {
                device: CaptureDevice::Screen.to_string(),
                reason: "display capture without video is not supported".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut stream = MediaStream::new(vec![spawn_video_track(
            "synthetic-display",
            self.config.display_width,
            self.config.display_height,
            display_pattern,
        )]);

        if let Some(constraints) = request.audio
            && self.config.system_audio
        {
            stream.add_track(silent_audio_track("synthetic-system-audio", constraints));
        }

        info!(
            width = self.config.display_width,
            height = self.config.display_height,
            tracks = stream.tracks().len(),
            "Synthetic display shared"
        );

        Ok(stream)
    }
}

/// Camera and microphone provider: a checkerboard webcam and a silent mic.
pub(crate) struct SyntheticDevices {
    config: CaptureConfig,
}

impl SyntheticDevices {
    pub(crate) fn new(config: CaptureConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DeviceCapture for SyntheticDevices {
    #[instrument(skip(self))]
    async fn request_user_media(&self, request: UserMediaRequest) -> CoreResult<MediaStream> {
        if request.video {
            check_permission(&self.config, CaptureDevice::Webcam)?;
        }
        if request.audio.is_some() {
            check_permission(&self.config, CaptureDevice::Microphone)?;
        }

        let mut stream = MediaStream::new(Vec::new());

        if request.video {
            stream.add_track(spawn_video_track(
                "synthetic-webcam",
                self.config.webcam_width,
                self.config.webcam_height,
                webcam_pattern,
            ));
        }
        if let Some(constraints) = request.audio {
            stream.add_track(silent_audio_track("synthetic-microphone", constraints));
        }

        debug!(tracks = stream.tracks().len(), "Synthetic user media granted");

        Ok(stream)
    }
}

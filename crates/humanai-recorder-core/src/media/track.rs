use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use image::RgbaImage;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

/// A decoded video frame shared between producer and consumers.
pub type VideoFrame = Arc<RgbaImage>;

/// Kind of media carried by a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    /// Video frames.
    Video,
    /// Audio samples.
    Audio,
}

/// Settings reported by the device that produced a track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackSettings {
    /// Native frame width, if the device reported one.
    pub width: Option<u32>,
    /// Native frame height, if the device reported one.
    pub height: Option<u32>,
    /// Audio sample rate, if the device reported one.
    pub sample_rate: Option<u32>,
}

impl TrackSettings {
    /// Settings for a video track of known resolution.
    pub fn video(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            sample_rate: None,
        }
    }

    /// Settings for an audio track of known sample rate.
    pub fn audio(sample_rate: u32) -> Self {
        Self {
            width: None,
            height: None,
            sample_rate: Some(sample_rate),
        }
    }
}

/// Device-side handle that releases the hardware behind a track.
pub trait TrackControl: Send + Sync {
    /// Release the underlying device. Called at most once per track.
    fn stop(&self);
}

impl<F> TrackControl for F
where
    F: Fn() + Send + Sync,
{
    fn stop(&self) {
        self()
    }
}

struct TrackInner {
    id: Uuid,
    kind: TrackKind,
    label: String,
    settings: TrackSettings,
    ended: AtomicBool,
    control: Box<dyn TrackControl>,
    frames: Option<watch::Receiver<Option<VideoFrame>>>,
}

/// Handle to one live capture track.
///
/// Clones share the same underlying track: stopping any clone ends the track
/// for all of them, and the device is released exactly once.
#[derive(Clone)]
pub struct MediaTrack {
    inner: Arc<TrackInner>,
}

impl MediaTrack {
    /// Create a video track fed by `frames`.
    ///
    /// The receiver holds `None` until the device has produced its first frame.
    pub fn video(
        label: impl Into<String>,
        settings: TrackSettings,
        frames: watch::Receiver<Option<VideoFrame>>,
        control: impl TrackControl + 'static,
    ) -> Self {
        Self::new(TrackKind::Video, label.into(), settings, Some(frames), control)
    }

    /// Create an audio track.
    pub fn audio(
        label: impl Into<String>,
        settings: TrackSettings,
        control: impl TrackControl + 'static,
    ) -> Self {
        Self::new(TrackKind::Audio, label.into(), settings, None, control)
    }

    fn new(
        kind: TrackKind,
        label: String,
        settings: TrackSettings,
        frames: Option<watch::Receiver<Option<VideoFrame>>>,
        control: impl TrackControl + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(TrackInner {
                id: Uuid::new_v4(),
                kind,
                label,
                settings,
                ended: AtomicBool::new(false),
                control: Box::new(control),
                frames,
            }),
        }
    }

    /// Unique track id.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Whether this track carries video or audio.
    pub fn kind(&self) -> TrackKind {
        self.inner.kind
    }

    /// Human-readable device label.
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Settings reported by the device.
    pub fn settings(&self) -> TrackSettings {
        self.inner.settings
    }

    /// False once the track has been stopped.
    pub fn is_live(&self) -> bool {
        !self.inner.ended.load(Ordering::Acquire)
    }

    /// Stop the track and release its device.
    ///
    /// Returns `true` if this call ended the track, `false` if it was
    /// already stopped.
    pub fn stop(&self) -> bool {
        if self.inner.ended.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.inner.control.stop();
        debug!(track_id = %self.inner.id, label = %self.inner.label, "Track stopped");

        true
    }

    /// Most recent decodable frame, or `None` if the track has not produced
    /// one yet, has ended, or is not a video track.
    pub fn latest_frame(&self) -> Option<VideoFrame> {
        if !self.is_live() {
            return None;
        }

        self.inner.frames.as_ref()?.borrow().clone()
    }
}

impl fmt::Debug for MediaTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaTrack")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .field("label", &self.inner.label)
            .field("live", &self.is_live())
            .finish()
    }
}

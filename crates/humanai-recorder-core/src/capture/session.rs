use crate::media::{MediaStream, MediaTrack};

use std::fmt;

use tracing::{debug, info};
use uuid::Uuid;

/// Which part of the recording a source feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceRole {
    /// Display video plus any shared system audio.
    Screen,
    /// Camera video.
    Webcam,
    /// Microphone audio.
    Microphone,
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceRole::Screen => "screen",
            SourceRole::Webcam => "webcam",
            SourceRole::Microphone => "microphone",
        })
    }
}

/// One acquired live source and the stream it was granted.
#[derive(Debug)]
pub struct CaptureSource {
    role: SourceRole,
    stream: MediaStream,
}

impl CaptureSource {
    pub(crate) fn new(role: SourceRole, stream: MediaStream) -> Self {
        Self { role, stream }
    }

    /// Role of this source.
    pub fn role(&self) -> SourceRole {
        self.role
    }

    /// The granted stream.
    pub fn stream(&self) -> &MediaStream {
        &self.stream
    }
}

/// The live sources of one recording session.
///
/// Owns every acquired device. Releasing (or dropping) the session stops all
/// of their tracks; sources that were never acquired are simply absent.
#[derive(Debug)]
pub struct CaptureSession {
    id: Uuid,
    screen: Option<CaptureSource>,
    webcam: Option<CaptureSource>,
    microphone: Option<CaptureSource>,
}

impl CaptureSession {
    pub(crate) fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            screen: None,
            webcam: None,
            microphone: None,
        }
    }

    pub(crate) fn attach(&mut self, source: CaptureSource) {
        debug!(
            session_id = %self.id,
            role = %source.role,
            tracks = source.stream.tracks().len(),
            "Source attached"
        );

        let slot = match source.role {
            SourceRole::Screen => &mut self.screen,
            SourceRole::Webcam => &mut self.webcam,
            SourceRole::Microphone => &mut self.microphone,
        };
        *slot = Some(source);
    }

    /// Session id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The screen source, if acquired.
    pub fn screen(&self) -> Option<&CaptureSource> {
        self.screen.as_ref()
    }

    /// The webcam source, if acquired.
    pub fn webcam(&self) -> Option<&CaptureSource> {
        self.webcam.as_ref()
    }

    /// The microphone source, if acquired.
    pub fn microphone(&self) -> Option<&CaptureSource> {
        self.microphone.as_ref()
    }

    fn sources(&self) -> impl Iterator<Item = &CaptureSource> {
        [&self.screen, &self.webcam, &self.microphone]
            .into_iter()
            .flatten()
    }

    /// First video track of the screen source.
    pub fn screen_video_track(&self) -> Option<&MediaTrack> {
        self.screen.as_ref()?.stream.video_tracks().next()
    }

    /// First video track of the webcam source.
    pub fn webcam_video_track(&self) -> Option<&MediaTrack> {
        self.webcam.as_ref()?.stream.video_tracks().next()
    }

    /// Screen audio tracks followed by microphone audio tracks.
    pub fn audio_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        [&self.screen, &self.microphone]
            .into_iter()
            .flatten()
            .flat_map(|source| source.stream.audio_tracks())
    }

    /// Number of tracks across all sources that are still live.
    pub fn live_track_count(&self) -> usize {
        self.sources()
            .map(|source| source.stream.live_track_count())
            .sum()
    }

    /// Stop every track on every acquired source.
    ///
    /// Safe to call repeatedly and on partially acquired sessions. Returns
    /// the number of tracks this call actually stopped.
    pub fn release(&mut self) -> usize {
        let stopped: usize = self
            .sources()
            .map(|source| source.stream.stop_all())
            .sum();

        if stopped > 0 {
            info!(session_id = %self.id, stopped_tracks = stopped, "Capture session released");
        }

        stopped
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release();
    }
}

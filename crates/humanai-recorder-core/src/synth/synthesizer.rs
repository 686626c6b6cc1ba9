use crate::{
    capture::CaptureSession,
    media::{MediaStream, MediaTrack, TrackKind},
};

use tracing::{info, instrument};
use uuid::Uuid;

/// Rate at which the composited canvas is sampled into the video track.
pub const CANVAS_FRAME_RATE: u32 = 30;

/// The single stream handed to the encoder.
///
/// Always exactly one video track; zero or more audio tracks.
#[derive(Debug, Clone)]
pub struct OutputStream {
    id: Uuid,
    video: MediaTrack,
    audio: Vec<MediaTrack>,
    frame_rate: u32,
}

impl OutputStream {
    /// Stream id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The video track.
    pub fn video_track(&self) -> &MediaTrack {
        &self.video
    }

    /// The audio tracks, screen audio first, then microphone.
    pub fn audio_tracks(&self) -> &[MediaTrack] {
        &self.audio
    }

    /// Always 1.
    pub fn video_track_count(&self) -> usize {
        1
    }

    /// Number of audio tracks.
    pub fn audio_track_count(&self) -> usize {
        self.audio.len()
    }

    /// Video sampling rate in frames per second.
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// All tracks as a plain stream, video first.
    pub fn to_media_stream(&self) -> MediaStream {
        let mut stream = MediaStream::new(vec![self.video.clone()]);
        for track in &self.audio {
            stream.add_track(track.clone());
        }
        stream
    }
}

/// Builds the recordable stream from a video track and the session's audio.
pub struct StreamSynthesizer;

impl StreamSynthesizer {
    /// Combine `video` with every audio track of `session`.
    ///
    /// `video` is normally the compositor's canvas track; the screen-only
    /// recorder passes the screen's own video track instead.
    #[instrument(skip_all, fields(session_id = %session.id()))]
    pub fn synthesize(video: MediaTrack, session: &CaptureSession) -> OutputStream {
        debug_assert_eq!(video.kind(), TrackKind::Video);

        let audio: Vec<MediaTrack> = session.audio_tracks().cloned().collect();

        info!(
            video_track = %video.label(),
            audio_tracks = audio.len(),
            frame_rate = CANVAS_FRAME_RATE,
            "Output stream synthesized"
        );

        OutputStream {
            id: Uuid::new_v4(),
            video,
            audio,
            frame_rate: CANVAS_FRAME_RATE,
        }
    }
}

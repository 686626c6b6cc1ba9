use crate::media::{MediaTrack, TrackKind};

use uuid::Uuid;

/// An ordered set of tracks granted together by one capture request.
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: Uuid,
    tracks: Vec<MediaTrack>,
}

impl MediaStream {
    /// Create a stream from tracks, preserving their order.
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tracks,
        }
    }

    /// Unique stream id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// All tracks in insertion order.
    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    /// Append a track.
    pub fn add_track(&mut self, track: MediaTrack) {
        self.tracks.push(track);
    }

    /// Video tracks in insertion order.
    pub fn video_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks
            .iter()
            .filter(|track| track.kind() == TrackKind::Video)
    }

    /// Audio tracks in insertion order.
    pub fn audio_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks
            .iter()
            .filter(|track| track.kind() == TrackKind::Audio)
    }

    /// Number of tracks that have not been stopped.
    pub fn live_track_count(&self) -> usize {
        self.tracks.iter().filter(|track| track.is_live()).count()
    }

    /// Stop every track. Returns how many tracks this call actually ended.
    pub fn stop_all(&self) -> usize {
        self.tracks.iter().filter(|track| track.stop()).count()
    }
}

mod blob;
mod stream;
mod track;

pub use {
    blob::{MediaBlob, ObjectUrl, ObjectUrlStore},
    stream::MediaStream,
    track::{MediaTrack, TrackControl, TrackKind, TrackSettings, VideoFrame},
};

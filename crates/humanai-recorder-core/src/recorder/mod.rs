mod artifact;
mod controller;
mod download;
mod encoder;
mod options;
mod state;

pub use {
    artifact::{RecordingArtifact, SealedArtifact},
    controller::RecordingController,
    download::{FileSaver, artifact_filename},
    encoder::{
        EncoderEvent, EncoderOptions, EncoderSink, FALLBACK_MIME_TYPE, MIME_CANDIDATES,
        container_extension, select_mime_type,
    },
    options::{RecorderOptions, RecorderProfile},
    state::{ArtifactStatus, RecorderEvent, RecorderPhase},
};
